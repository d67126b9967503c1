//! Scale-invariant localization of a reference image inside a scene.

use crate::correlate::best_offset;
use crate::geom::Rect;
use crate::image::ops::resize_by;
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::GridResult;

/// Search parameters for [`locate`].
#[derive(Clone, Copy, Debug)]
pub struct LocateConfig {
    /// Minimum correlation a placement must reach to count as found.
    pub min_correlation: f32,
    /// Number of scale steps tested on each side of the original size.
    pub scale_steps: i32,
    /// Size of one scale step as a fraction of the original size.
    pub scale_step: f32,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            min_correlation: 0.95,
            scale_steps: 10,
            scale_step: 0.05,
        }
    }
}

/// A placement of the scaled reference image inside the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Matched region in scene coordinates, sized as the scaled reference.
    pub rect: Rect,
    /// Scale factor applied to the reference for this placement.
    pub scale: f32,
    /// Correlation score of the placement.
    pub score: f32,
}

/// Finds the best-correlating placement and scale of `template` inside `scene`.
///
/// Scale factors `1 + step * k` for `k` in `[-steps, steps]` are tested in
/// that fixed order (the defaults span 50%-150% in 5% increments). At each
/// factor the template is resized bilinear and every placement in the scene
/// is scored; the best placement found so far is overwritten whenever a later
/// scale reaches at least the current best score, so among equally good
/// scales the later-tested factor wins. A score at or above `1.0` stops the
/// search immediately. Returns `None` when no scale reaches
/// `min_correlation`. Callers wanting robustness against scrolled-away
/// content retry with fresh captures; no retry happens here.
pub fn locate(
    template: ImageView<'_>,
    scene: ImageView<'_>,
    cfg: &LocateConfig,
) -> GridResult<Option<Placement>> {
    let _span = trace_span!(
        "locate",
        scene_w = scene.width(),
        scene_h = scene.height()
    )
    .entered();

    let mut best_score = cfg.min_correlation;
    let mut found: Option<Placement> = None;

    for k in -cfg.scale_steps..=cfg.scale_steps {
        let factor = 1.0 + cfg.scale_step * k as f32;
        if factor <= 0.0 {
            continue;
        }
        let resized = resize_by(template, factor, factor)?;
        if resized.width() > scene.width() || resized.height() > scene.height() {
            // This scale cannot be placed inside the scene at all.
            continue;
        }

        let hit = best_offset(scene, resized.view())?;
        trace_event!("scale_scanned", factor = factor, score = hit.score);
        if hit.score >= best_score {
            found = Some(Placement {
                rect: Rect::new(
                    hit.x as u32,
                    hit.y as u32,
                    resized.width() as u32,
                    resized.height() as u32,
                ),
                scale: factor,
                score: hit.score,
            });
            best_score = hit.score;
            if hit.score >= 1.0 {
                break;
            }
        }
    }

    Ok(found)
}
