//! Glyph component extraction and reading-order sorting.
//!
//! A captured region is binarized (dark pixels are glyph foreground), cleaned
//! with a morphological opening so thin noise disappears and touching glyphs
//! separate, and decomposed into 8-connected components. Each component's
//! bounding rectangle stands in for one glyph instance.

use crate::geom::Rect;
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};

/// Binarization and cleanup parameters for [`component_rects`].
#[derive(Clone, Copy, Debug)]
pub struct SegmentConfig {
    /// Intensity below which a pixel counts as glyph foreground.
    pub threshold: u8,
    /// Radius of the elliptical structuring element used for opening.
    pub open_radius: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            open_radius: 7,
        }
    }
}

/// Extracts one bounding rectangle per connected glyph component.
///
/// The returned order follows component discovery and carries no spatial
/// meaning; run the result through [`sort_reading_order`] before pairing
/// rectangles with anything ordered.
pub fn component_rects(region: ImageView<'_>, cfg: &SegmentConfig) -> Vec<Rect> {
    let _span = trace_span!(
        "segment",
        width = region.width(),
        height = region.height()
    )
    .entered();

    let width = region.width();
    let height = region.height();
    let mut mask = vec![false; width * height];
    for y in 0..height {
        let row = region.row(y).expect("row within view bounds");
        for (x, &value) in row.iter().enumerate() {
            mask[y * width + x] = value < cfg.threshold;
        }
    }

    if cfg.open_radius > 0 {
        mask = open(&mask, width, height, cfg.open_radius);
    }

    let rects = label_components(&mask, width, height);
    trace_event!("components_found", count = rects.len());
    rects
}

/// Morphological opening (erosion then dilation) with a disc structuring element.
///
/// Erosion treats out-of-bounds neighbors as foreground and dilation treats
/// them as background, so blobs touching the image border keep their extent.
fn open(mask: &[bool], width: usize, height: usize, radius: usize) -> Vec<bool> {
    let disc = disc_offsets(radius as i32);
    let eroded = erode(mask, width, height, &disc);
    dilate(&eroded, width, height, &disc)
}

fn disc_offsets(radius: i32) -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

fn erode(mask: &[bool], width: usize, height: usize, disc: &[(i32, i32)]) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let keep = disc.iter().all(|&(dx, dy)| {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    return true;
                }
                mask[ny as usize * width + nx as usize]
            });
            out[y as usize * width + x as usize] = keep;
        }
    }
    out
}

fn dilate(mask: &[bool], width: usize, height: usize, disc: &[(i32, i32)]) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let hit = disc.iter().any(|&(dx, dy)| {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    return false;
                }
                mask[ny as usize * width + nx as usize]
            });
            out[y as usize * width + x as usize] = hit;
        }
    }
    out
}

/// Labels 8-connected foreground blobs and returns their bounding rectangles.
fn label_components(mask: &[bool], width: usize, height: usize) -> Vec<Rect> {
    let mut visited = vec![false; mask.len()];
    let mut rects = Vec::new();
    let mut stack = Vec::new();

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }

        let mut min_x = usize::MAX;
        let mut max_x = 0usize;
        let mut min_y = usize::MAX;
        let mut max_y = 0usize;
        visited[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let nidx = ny as usize * width + nx as usize;
                    if mask[nidx] && !visited[nidx] {
                        visited[nidx] = true;
                        stack.push(nidx);
                    }
                }
            }
        }

        rects.push(Rect::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ));
    }
    rects
}

/// Orders rectangles left-to-right, top-to-bottom the way a human reads a grid.
///
/// Greedy nearest-neighbor walk rather than a row/column sort, so slightly
/// misaligned row baselines do not shuffle the order. An anchor rectangle
/// continues its row with the candidate closest to the previous center among
/// those starting at or past its right edge; when no candidate remains to the
/// right, the walk restarts a new row from the rectangle closest to the
/// image origin.
pub fn sort_reading_order(mut rects: Vec<Rect>) -> Vec<Rect> {
    fn closest(rects: &[Rect], origin: (f32, f32)) -> Rect {
        *rects
            .iter()
            .min_by(|a, b| {
                a.corner_dist_sq(origin)
                    .total_cmp(&b.corner_dist_sq(origin))
            })
            .expect("rects is not empty")
    }

    let mut out = Vec::with_capacity(rects.len());
    let mut origin = (0.0f32, 0.0f32);
    let mut anchor: Option<Rect> = None;

    while !rects.is_empty() {
        let next = match anchor {
            Some(prev) => {
                let row_rest: Vec<Rect> = rects
                    .iter()
                    .copied()
                    .filter(|r| r.x >= prev.right())
                    .collect();
                if row_rest.is_empty() {
                    origin = (0.0, 0.0);
                    closest(&rects, origin)
                } else {
                    closest(&row_rest, origin)
                }
            }
            None => closest(&rects, origin),
        };

        let pos = rects
            .iter()
            .position(|r| *r == next)
            .expect("next came from rects");
        rects.remove(pos);
        origin = next.center();
        anchor = Some(next);
        out.push(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{component_rects, sort_reading_order, SegmentConfig};
    use crate::geom::Rect;
    use crate::image::ImageView;

    /// White canvas with dark `size`x`size` blobs laid out `cols` x `rows`.
    fn blob_grid(cols: usize, rows: usize, size: usize, pitch: usize, margin: usize) -> Vec<u8> {
        let width = 2 * margin + (cols - 1) * pitch + size;
        let height = 2 * margin + (rows - 1) * pitch + size;
        let mut data = vec![255u8; width * height];
        for r in 0..rows {
            for c in 0..cols {
                let x0 = margin + c * pitch;
                let y0 = margin + r * pitch;
                for y in y0..y0 + size {
                    for x in x0..x0 + size {
                        data[y * width + x] = 20;
                    }
                }
            }
        }
        data
    }

    #[test]
    fn five_by_five_grid_yields_25_uniform_components() {
        let data = blob_grid(5, 5, 20, 30, 12);
        let width = 2 * 12 + 4 * 30 + 20;
        let view = ImageView::from_slice(&data, width, width).unwrap();

        let rects = component_rects(view, &SegmentConfig::default());
        assert_eq!(rects.len(), 25);
        for rect in &rects {
            assert_eq!((rect.w, rect.h), (20, 20));
        }
    }

    #[test]
    fn opening_removes_thin_noise() {
        // A 3px-wide line cannot survive a radius-7 opening; a 20px blob can.
        let mut data = vec![255u8; 80 * 80];
        for y in 10..13 {
            for x in 5..75 {
                data[y * 80 + x] = 0;
            }
        }
        for y in 40..60 {
            for x in 30..50 {
                data[y * 80 + x] = 0;
            }
        }
        let view = ImageView::from_slice(&data, 80, 80).unwrap();

        let rects = component_rects(view, &SegmentConfig::default());
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect::new(30, 40, 20, 20));
    }

    #[test]
    fn touching_glyphs_separate_after_opening() {
        // Two 24px blobs joined by a 4px bridge segment into two components.
        let mut data = vec![255u8; 100 * 60];
        for y in 18..42 {
            for x in 10..34 {
                data[y * 100 + x] = 0;
            }
            for x in 60..84 {
                data[y * 100 + x] = 0;
            }
        }
        for y in 28..32 {
            for x in 34..60 {
                data[y * 100 + x] = 0;
            }
        }
        let view = ImageView::from_slice(&data, 100, 60).unwrap();

        let rects = component_rects(view, &SegmentConfig::default());
        assert_eq!(rects.len(), 2);
    }

    #[test]
    fn reading_order_matches_human_scanning() {
        let rects = vec![
            Rect::new(0, 10, 10, 10),
            Rect::new(0, 0, 10, 10),
            Rect::new(0, 20, 10, 10),
            Rect::new(10, 10, 10, 10),
        ];
        let ordered = sort_reading_order(rects);
        assert_eq!(
            ordered,
            vec![
                Rect::new(0, 0, 10, 10),
                Rect::new(10, 10, 10, 10),
                Rect::new(0, 10, 10, 10),
                Rect::new(0, 20, 10, 10),
            ]
        );
    }

    #[test]
    fn reading_order_tolerates_uneven_baselines() {
        // Two rows of three, with the middle items nudged vertically.
        let rects = vec![
            Rect::new(40, 3, 10, 10),
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 5, 10, 10),
            Rect::new(20, 33, 10, 10),
            Rect::new(0, 30, 10, 10),
            Rect::new(40, 28, 10, 10),
        ];
        let ordered = sort_reading_order(rects);
        let xs: Vec<u32> = ordered.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0, 20, 40, 0, 20, 40]);
        assert!(ordered[..3].iter().all(|r| r.y < 15));
        assert!(ordered[3..].iter().all(|r| r.y >= 25));
    }

    #[test]
    fn reading_order_of_empty_input_is_empty() {
        assert!(sort_reading_order(Vec::new()).is_empty());
    }
}
