//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D `u8` buffer with an explicit
//! stride, so a crop is a zero-copy view into the same backing slice.
//! `OwnedImage` is a contiguous buffer the pipeline allocates for resized or
//! cropped intermediates. Captures stay owned by the caller; the core only
//! ever reads them through views.

use crate::geom::Rect;
use crate::util::{GridError, GridResult};

pub mod ops;

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D grayscale view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> GridResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if stride < width {
            return Err(GridError::InvalidStride { width, stride });
        }
        let needed = (height - 1)
            .checked_mul(stride)
            .and_then(|v| v.checked_add(width))
            .ok_or(GridError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(GridError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    /// Returns a zero-copy view of the rectangle inside this view.
    ///
    /// The rectangle must lie fully inside the image.
    pub fn roi(&self, rect: Rect) -> GridResult<ImageView<'a>> {
        let (x, y) = (rect.x as usize, rect.y as usize);
        let (width, height) = (rect.w as usize, rect.h as usize);
        let oob = || GridError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(oob)?;
        let end_y = y.checked_add(height).ok_or_else(oob)?;
        if end_x > self.width || end_y > self.height {
            return Err(oob());
        }
        let start = y * self.stride + x;
        ImageView::new(&self.data[start..], width, height, self.stride)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(GridError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(GridError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into an owned contiguous image.
    pub fn from_view(view: ImageView<'_>) -> Self {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            data.extend_from_slice(view.row(y).expect("row within view bounds"));
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing pixel buffer in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};
    use crate::geom::Rect;
    use crate::util::GridError;

    #[test]
    fn rejects_undersized_buffer() {
        let data = vec![0u8; 5];
        let err = ImageView::from_slice(&data, 3, 2).unwrap_err();
        assert!(matches!(err, GridError::BufferTooSmall { needed: 6, got: 5 }));
    }

    #[test]
    fn roi_is_zero_copy_and_strided() {
        let data: Vec<u8> = (0..20).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let roi = view.roi(Rect::new(1, 1, 3, 2)).unwrap();
        assert_eq!(roi.row(0).unwrap(), &[6, 7, 8]);
        assert_eq!(roi.row(1).unwrap(), &[11, 12, 13]);
        assert_eq!(roi.stride(), 5);
    }

    #[test]
    fn roi_past_edge_is_rejected() {
        let data = vec![0u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        assert!(view.roi(Rect::new(2, 2, 3, 3)).is_err());
    }

    #[test]
    fn from_view_compacts_stride() {
        let data: Vec<u8> = (0..20).collect();
        let view = ImageView::from_slice(&data, 5, 4).unwrap();
        let owned = OwnedImage::from_view(view.roi(Rect::new(2, 0, 2, 3)).unwrap());
        assert_eq!(owned.data(), &[2, 3, 7, 8, 12, 13]);
    }
}
