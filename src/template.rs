//! Labeled glyph template sets.
//!
//! A template set is built once at startup from a raw template scan and an
//! ordered label list, and stays immutable for the rest of the run. The scan
//! is trimmed of surrounding background, re-padded with a constant white
//! border, and segmented; the glyph components in reading order are then
//! paired with the labels.

use crate::image::ops::{autocrop, crop, pad};
use crate::image::{ImageView, OwnedImage};
use crate::segment::{component_rects, sort_reading_order, SegmentConfig};
use crate::util::{GridError, GridResult};
use std::path::Path;

/// Background intensity of template scans.
const SCAN_BACKGROUND: u8 = 255;

/// Constant border re-added around the trimmed scan, in pixels.
const SCAN_MARGIN: usize = 15;

/// An immutable set of labeled glyph reference images.
#[derive(Debug)]
pub struct TemplateSet {
    scan: OwnedImage,
    labels: Vec<u32>,
    glyphs: Vec<OwnedImage>,
}

impl TemplateSet {
    /// Builds a template set from a raw scan and its labels in reading order.
    ///
    /// The scan must contain at least as many glyph components as there are
    /// labels; extra components past the label count are ignored, a shortfall
    /// is a fatal configuration error carrying both counts.
    pub fn from_scan(scan: ImageView<'_>, labels: Vec<u32>) -> GridResult<Self> {
        let trimmed = autocrop(scan, SCAN_BACKGROUND)?;
        let normalized = pad(trimmed.view(), SCAN_MARGIN, SCAN_BACKGROUND);

        let rects = sort_reading_order(component_rects(
            normalized.view(),
            &SegmentConfig::default(),
        ));
        if rects.len() < labels.len() {
            return Err(GridError::TemplateComponents {
                found: rects.len(),
                expected: labels.len(),
            });
        }

        let glyphs = rects[..labels.len()]
            .iter()
            .map(|&rect| crop(normalized.view(), rect))
            .collect::<GridResult<Vec<_>>>()?;
        Ok(Self {
            scan: normalized,
            labels,
            glyphs,
        })
    }

    /// The normalized (trimmed and re-padded) scan the locator searches for.
    pub fn scan(&self) -> ImageView<'_> {
        self.scan.view()
    }

    /// Labels in the order glyphs were read from the scan.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of labeled glyphs.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the set holds no glyphs.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Reference image of the glyph at `idx` (same order as [`labels`](Self::labels)).
    pub fn glyph(&self, idx: usize) -> ImageView<'_> {
        self.glyphs[idx].view()
    }
}

/// Reads a whitespace-separated list of integer labels from a file.
pub fn read_labels<P: AsRef<Path>>(path: P) -> GridResult<Vec<u32>> {
    let text = std::fs::read_to_string(path)?;
    text.split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| GridError::LabelParse {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Loads a template set from an image file and a label file.
#[cfg(feature = "image-io")]
pub fn load_template_set<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    labels_path: Q,
) -> GridResult<TemplateSet> {
    let scan = crate::image::io::load_gray_image(image_path)?;
    let labels = read_labels(labels_path)?;
    TemplateSet::from_scan(scan.view(), labels)
}
