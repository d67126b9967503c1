//! Error types for numgrid.

use thiserror::Error;

/// Result alias for numgrid operations.
pub type GridResult<T> = std::result::Result<T, GridError>;

/// Errors that can occur while locating and reading a number grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Image dimensions are zero or overflow the address space.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },
    /// The row stride is smaller than the image width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride {
        /// Image width in pixels.
        width: usize,
        /// Stride in elements between row starts.
        stride: usize,
    },
    /// The backing buffer is too small for the requested dimensions.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall {
        /// Minimum number of elements required.
        needed: usize,
        /// Number of elements provided.
        got: usize,
    },
    /// A requested region does not fit inside the image.
    #[error("roi {width}x{height} at ({x}, {y}) out of bounds for {img_width}x{img_height} image")]
    RoiOutOfBounds {
        /// ROI origin column.
        x: usize,
        /// ROI origin row.
        y: usize,
        /// ROI width in pixels.
        width: usize,
        /// ROI height in pixels.
        height: usize,
        /// Image width in pixels.
        img_width: usize,
        /// Image height in pixels.
        img_height: usize,
    },
    /// A bounding box was requested for a mask with no foreground pixel.
    #[error("mask contains no foreground pixel")]
    EmptyMask,
    /// The scene is smaller than the template so no placement exists.
    #[error("scene {scene_width}x{scene_height} is smaller than template {tpl_width}x{tpl_height}")]
    SceneTooSmall {
        /// Scene width in pixels.
        scene_width: usize,
        /// Scene height in pixels.
        scene_height: usize,
        /// Template width in pixels.
        tpl_width: usize,
        /// Template height in pixels.
        tpl_height: usize,
    },
    /// No placement of the reference grid cleared the correlation threshold.
    #[error("unable to locate the grid in the scene")]
    GridNotFound,
    /// The template scan contains fewer glyph components than labels.
    #[error("unable to analyze template scan: found {found} glyphs, expected at least {expected}")]
    TemplateComponents {
        /// Number of glyph components detected in the scan.
        found: usize,
        /// Number of labels supplied for the scan.
        expected: usize,
    },
    /// One or more labels were left without a matching component.
    #[error("following numbers could not be found: {}", format_labels(.0))]
    MissingLabels(Vec<u32>),
    /// A label file token could not be parsed as an integer.
    #[error("invalid label token {token:?}")]
    LabelParse {
        /// The offending token.
        token: String,
    },
    /// A resource file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding failed.
    #[cfg(feature = "image-io")]
    #[error("image i/o failed: {reason}")]
    ImageIo {
        /// Decoder error message.
        reason: String,
    },
}

fn format_labels(labels: &[u32]) -> String {
    labels
        .iter()
        .map(|label| label.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::GridError;

    #[test]
    fn missing_labels_are_listed_verbatim() {
        let err = GridError::MissingLabels(vec![3, 7, 41]);
        assert_eq!(
            err.to_string(),
            "following numbers could not be found: 3; 7; 41"
        );
    }

    #[test]
    fn template_component_count_reports_both_counts() {
        let err = GridError::TemplateComponents {
            found: 24,
            expected: 25,
        };
        let msg = err.to_string();
        assert!(msg.contains("found 24"));
        assert!(msg.contains("at least 25"));
    }
}
