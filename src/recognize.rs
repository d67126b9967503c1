//! Full pipeline: locate the grid in a capture, then read its numbers.

use crate::geom::Rect;
use crate::image::ops::{crop, resize};
use crate::image::ImageView;
use crate::locate::{locate, LocateConfig};
use crate::resolve::resolve_labels;
use crate::segment::{component_rects, SegmentConfig};
use crate::template::TemplateSet;
use crate::trace::{trace_event, trace_span};
use crate::util::{GridError, GridResult};
use std::collections::BTreeMap;

/// Result of reading one grid out of a scene capture.
///
/// `coords` are in normalized (template-scale) region space;
/// [`scene_coord`](Self::scene_coord) maps them back into the capture.
#[derive(Clone, Debug)]
pub struct GridReading {
    /// Region of the scene the grid was read from.
    pub rect: Rect,
    /// Horizontal factor that rescaled the cropped region to template scale.
    pub scale_x: f32,
    /// Vertical factor that rescaled the cropped region to template scale.
    pub scale_y: f32,
    /// Center coordinate per label, in normalized region space.
    pub coords: BTreeMap<u32, (f32, f32)>,
}

impl GridReading {
    /// Maps a label's center back into scene (capture) coordinates.
    pub fn scene_coord(&self, label: u32) -> Option<(f32, f32)> {
        self.coords.get(&label).map(|&(x, y)| {
            (
                x / self.scale_x + self.rect.x as f32,
                y / self.scale_y + self.rect.y as f32,
            )
        })
    }
}

/// Locates the template grid in the scene and reads its numbers.
///
/// Fails with [`GridError::GridNotFound`] when no placement clears the
/// configured correlation threshold; the caller decides whether to capture a
/// fresh scene and try again. On success the mapping is complete: one center
/// per template label.
pub fn recognize(
    scene: ImageView<'_>,
    set: &TemplateSet,
    cfg: &LocateConfig,
) -> GridResult<GridReading> {
    let placement = locate(set.scan(), scene, cfg)?.ok_or(GridError::GridNotFound)?;
    trace_event!(
        "grid_located",
        x = placement.rect.x,
        y = placement.rect.y,
        score = placement.score
    );
    recognize_in_rect(scene, set, placement.rect)
}

/// Reads the grid out of a known scene rectangle, skipping localization.
///
/// Used for follow-up passes where the grid position is already known from an
/// earlier [`recognize`] call and only the tile contents changed.
pub fn recognize_in_rect(
    scene: ImageView<'_>,
    set: &TemplateSet,
    rect: Rect,
) -> GridResult<GridReading> {
    let _span = trace_span!("recognize", x = rect.x, y = rect.y).entered();

    let cropped = crop(scene, rect)?;
    let scale_x = set.scan().width() as f32 / rect.w as f32;
    let scale_y = set.scan().height() as f32 / rect.h as f32;
    let region = resize(cropped.view(), set.scan().width(), set.scan().height())?;

    let rects = component_rects(region.view(), &SegmentConfig::default());
    let coords = resolve_labels(region.view(), &rects, set)?;
    Ok(GridReading {
        rect,
        scale_x,
        scale_y,
        coords,
    })
}
