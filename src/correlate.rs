//! Normalized cross-correlation between grayscale images.
//!
//! Scores follow the `cross-correlation normalized` definition:
//! `sum(a*b) / sqrt(sum(a^2) * sum(b^2))`, evaluated in `f64` and reported as
//! `f32` in `[-1, 1]` (non-negative for `u8` data). A score at or above `1.0`
//! is treated as a certain match by the callers.

use crate::image::ops::resize;
use crate::image::ImageView;
use crate::util::{GridError, GridResult};

/// Best-scoring placement of a template inside a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    /// Column of the placement's top-left corner.
    pub x: usize,
    /// Row of the placement's top-left corner.
    pub y: usize,
    /// Normalized cross-correlation score at the placement.
    pub score: f32,
}

/// Correlates two images that may differ in size.
///
/// Both images are first resized (bilinear) to the smaller of the two widths
/// and the smaller of the two heights, which makes the score robust to scale
/// differences between a template scan and a captured component. A visually
/// perfect match therefore scores slightly below `1.0` unless the sizes
/// already coincide.
pub fn correlate(a: ImageView<'_>, b: ImageView<'_>) -> GridResult<f32> {
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let a = resize(a, width, height)?;
    let b = resize(b, width, height)?;

    let mut dot = 0.0f64;
    let mut sum_a2 = 0.0f64;
    let mut sum_b2 = 0.0f64;
    for (&pa, &pb) in a.data().iter().zip(b.data().iter()) {
        let va = pa as f64;
        let vb = pb as f64;
        dot += va * vb;
        sum_a2 += va * va;
        sum_b2 += vb * vb;
    }

    let denom = (sum_a2 * sum_b2).sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / denom) as f32)
}

/// Scans every placement of the template inside the scene and returns the
/// single best-scoring offset.
///
/// This is an exhaustive per-offset evaluation, not an FFT approximation.
/// Ties keep the first offset encountered in row-major order. Fails with
/// [`GridError::SceneTooSmall`] when the template does not fit.
pub fn best_offset(scene: ImageView<'_>, tpl: ImageView<'_>) -> GridResult<Offset> {
    let scene_width = scene.width();
    let scene_height = scene.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if scene_width < tpl_width || scene_height < tpl_height {
        return Err(GridError::SceneTooSmall {
            scene_width,
            scene_height,
            tpl_width,
            tpl_height,
        });
    }

    let mut sum_t2 = 0.0f64;
    for ty in 0..tpl_height {
        for &value in tpl.row(ty).expect("row within template bounds") {
            let v = value as f64;
            sum_t2 += v * v;
        }
    }

    let mut best = Offset {
        x: 0,
        y: 0,
        score: f32::NEG_INFINITY,
    };
    for y in 0..=scene_height - tpl_height {
        for x in 0..=scene_width - tpl_width {
            let mut dot = 0.0f64;
            let mut sum_i2 = 0.0f64;
            for ty in 0..tpl_height {
                let tpl_row = tpl.row(ty).expect("row within template bounds");
                let img_row = &scene.row(y + ty).expect("row within scene bounds")[x..x + tpl_width];
                for (&tv, &iv) in tpl_row.iter().zip(img_row.iter()) {
                    let t = tv as f64;
                    let i = iv as f64;
                    dot += t * i;
                    sum_i2 += i * i;
                }
            }

            let denom = (sum_t2 * sum_i2).sqrt();
            if denom == 0.0 {
                continue;
            }
            let score = (dot / denom) as f32;
            if score > best.score {
                best = Offset { x, y, score };
            }
        }
    }
    Ok(best)
}
