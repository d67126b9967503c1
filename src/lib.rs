//! numgrid locates a rectangular grid of numbered tiles inside a grayscale
//! screen capture and reports the pixel center of each number.
//!
//! The pipeline is scale-invariant template localization, connected-component
//! glyph segmentation, and correlation-based classification against a small
//! labeled template set, finished by a greedy conflict-free assignment that
//! yields a complete one-to-one label-to-coordinate mapping. Everything runs
//! single-threaded and synchronously; capture timing, pointer control, and
//! retry policy belong to the caller.

pub mod correlate;
pub mod geom;
pub mod image;
pub mod locate;
pub mod recognize;
pub mod resolve;
pub mod segment;
pub mod template;
pub mod util;

pub(crate) mod trace;

pub use correlate::{best_offset, correlate, Offset};
pub use geom::Rect;
pub use image::ops::{autocrop, bounding_box, crop, pad, resize, resize_by};
pub use image::{ImageView, OwnedImage};
pub use locate::{locate, LocateConfig, Placement};
pub use recognize::{recognize, recognize_in_rect, GridReading};
pub use resolve::{resolve_labels, ScoreTable};
pub use segment::{component_rects, sort_reading_order, SegmentConfig};
pub use template::{read_labels, TemplateSet};
pub use util::{GridError, GridResult};

#[cfg(feature = "image-io")]
pub use template::load_template_set;
