//! Region extraction and resampling primitives.

use crate::geom::Rect;
use crate::image::{ImageView, OwnedImage};
use crate::util::{GridError, GridResult};

/// Returns the smallest rectangle enclosing every `true` pixel of the mask.
///
/// The mask is row-major with `width * height` entries. Callers must
/// guarantee at least one foreground pixel; an all-background mask is
/// reported as [`GridError::EmptyMask`].
pub fn bounding_box(mask: &[bool], width: usize, height: usize) -> GridResult<Rect> {
    let needed = width
        .checked_mul(height)
        .ok_or(GridError::InvalidDimensions { width, height })?;
    if mask.len() != needed {
        return Err(GridError::BufferTooSmall {
            needed,
            got: mask.len(),
        });
    }

    let mut min_x = width;
    let mut max_x = 0usize;
    let mut min_y = height;
    let mut max_y = 0usize;
    for y in 0..height {
        let row = &mask[y * width..(y + 1) * width];
        for (x, &fg) in row.iter().enumerate() {
            if fg {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }
    if min_x > max_x {
        return Err(GridError::EmptyMask);
    }
    Ok(Rect::new(
        min_x as u32,
        min_y as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

/// Copies the rectangle out of the image into an owned contiguous buffer.
pub fn crop(img: ImageView<'_>, rect: Rect) -> GridResult<OwnedImage> {
    Ok(OwnedImage::from_view(img.roi(rect)?))
}

/// Trims away the border of pixels equal to `background`.
///
/// Computes the bounding box of all non-background pixels and crops to it, so
/// cropping an already-tight region returns it unchanged. Fails with
/// [`GridError::EmptyMask`] when the whole image is background.
pub fn autocrop(img: ImageView<'_>, background: u8) -> GridResult<OwnedImage> {
    let width = img.width();
    let height = img.height();
    let mut mask = vec![false; width * height];
    for y in 0..height {
        let row = img.row(y).expect("row within view bounds");
        for (x, &value) in row.iter().enumerate() {
            mask[y * width + x] = value != background;
        }
    }
    let rect = bounding_box(&mask, width, height)?;
    crop(img, rect)
}

/// Surrounds the image with a constant-valued border of `margin` pixels.
pub fn pad(img: ImageView<'_>, margin: usize, value: u8) -> OwnedImage {
    let width = img.width() + 2 * margin;
    let height = img.height() + 2 * margin;
    let mut data = vec![value; width * height];
    for y in 0..img.height() {
        let src = img.row(y).expect("row within view bounds");
        let start = (y + margin) * width + margin;
        data[start..start + img.width()].copy_from_slice(src);
    }
    OwnedImage::new(data, width, height).expect("padded buffer is exact")
}

/// Resizes the image to `dst_width x dst_height` with bilinear sampling.
///
/// Destination pixel centers are mapped back to source coordinates with the
/// half-pixel convention `src = (dst + 0.5) * scale - 0.5`, clamped to the
/// source bounds, so shrinking and growing are both well defined.
pub fn resize(img: ImageView<'_>, dst_width: usize, dst_height: usize) -> GridResult<OwnedImage> {
    if dst_width == 0 || dst_height == 0 {
        return Err(GridError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }

    let src_width = img.width();
    let src_height = img.height();
    if dst_width == src_width && dst_height == src_height {
        return Ok(OwnedImage::from_view(img));
    }

    let scale_x = src_width as f32 / dst_width as f32;
    let scale_y = src_height as f32 / dst_height as f32;
    let max_x = src_width as f32 - 1.0;
    let max_y = src_height as f32 - 1.0;

    let mut data = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        let src_y = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        let y0 = src_y.floor() as usize;
        let y1 = (y0 + 1).min(src_height - 1);
        let fy = src_y - y0 as f32;
        let row0 = img.row(y0).expect("row within view bounds");
        let row1 = img.row(y1).expect("row within view bounds");

        for x in 0..dst_width {
            let src_x = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
            let x0 = src_x.floor() as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let fx = src_x - x0 as f32;

            let a = row0[x0] as f32;
            let b = row0[x1] as f32;
            let c = row1[x0] as f32;
            let d = row1[x1] as f32;
            let top = a + (b - a) * fx;
            let bottom = c + (d - c) * fx;
            let value = top + (bottom - top) * fy;
            data.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }
    OwnedImage::new(data, dst_width, dst_height)
}

/// Resizes the image by uniform-per-axis factors, rounding the output size.
pub fn resize_by(img: ImageView<'_>, fx: f32, fy: f32) -> GridResult<OwnedImage> {
    let dst_width = ((img.width() as f32 * fx).round() as usize).max(1);
    let dst_height = ((img.height() as f32 * fy).round() as usize).max(1);
    resize(img, dst_width, dst_height)
}
