//! Correlation-table construction and greedy label assignment.
//!
//! Every detected component is correlated against every template glyph, then
//! labels are assigned best-first: the single highest-scoring
//! (component, label) pair still available is consumed, removing both from
//! further consideration, until components or labels run out. Greedy rather
//! than bipartite-optimal assignment is a deliberate simplification; it is
//! correct as long as true matches score distinctly higher than false ones,
//! which holds for well-separated glyph templates.

use crate::correlate::correlate;
use crate::geom::Rect;
use crate::image::ImageView;
use crate::template::TemplateSet;
use crate::trace::{trace_event, trace_span};
use crate::util::{GridError, GridResult};
use std::collections::BTreeMap;

/// Dense component-by-label correlation matrix with consumption markers.
///
/// Built fresh per resolution pass and dropped on completion. Consumed rows
/// and columns are flagged rather than physically removed.
pub struct ScoreTable {
    rects: Vec<Rect>,
    labels: Vec<u32>,
    scores: Vec<f32>,
    rect_used: Vec<bool>,
    label_used: Vec<bool>,
}

impl ScoreTable {
    /// Correlates every component crop against every template glyph.
    pub fn build(
        region: ImageView<'_>,
        rects: &[Rect],
        set: &TemplateSet,
    ) -> GridResult<Self> {
        let _span = trace_span!("score_table", components = rects.len(), labels = set.len())
            .entered();

        let mut scores = Vec::with_capacity(rects.len() * set.len());
        for &rect in rects {
            let component = region.roi(rect)?;
            for j in 0..set.len() {
                scores.push(correlate(set.glyph(j), component)?);
            }
        }
        Ok(Self {
            rects: rects.to_vec(),
            labels: set.labels().to_vec(),
            scores,
            rect_used: vec![false; rects.len()],
            label_used: vec![false; set.len()],
        })
    }

    fn score(&self, rect_idx: usize, label_idx: usize) -> f32 {
        self.scores[rect_idx * self.labels.len() + label_idx]
    }

    /// Picks the best unconsumed (component, label) pair, or `None` when
    /// either side is exhausted.
    ///
    /// Ties keep the first pair in table iteration order; a certain match
    /// (score `>= 1.0`) stops the scan early.
    fn take_best(&mut self) -> Option<(Rect, u32)> {
        let mut best: Option<(usize, usize)> = None;
        let mut best_score = f32::NEG_INFINITY;

        'rows: for i in 0..self.rects.len() {
            if self.rect_used[i] {
                continue;
            }
            let mut row_best: Option<usize> = None;
            let mut row_score = f32::NEG_INFINITY;
            for j in 0..self.labels.len() {
                if self.label_used[j] {
                    continue;
                }
                let score = self.score(i, j);
                if score > row_score {
                    row_best = Some(j);
                    row_score = score;
                }
            }
            let Some(j) = row_best else {
                // No labels left to assign.
                break;
            };
            if row_score > best_score {
                best = Some((i, j));
                best_score = row_score;
                if best_score >= 1.0 {
                    break 'rows;
                }
            }
        }

        let (i, j) = best?;
        self.rect_used[i] = true;
        self.label_used[j] = true;
        Some((self.rects[i], self.labels[j]))
    }
}

/// Assigns a label to each component and returns the label's center coordinate.
///
/// The mapping is one-to-one and complete: every label of the template set
/// must end up with a coordinate, otherwise the whole pass fails with the
/// missing labels listed and no partial mapping is returned. Coordinates are
/// in `region` pixel space.
pub fn resolve_labels(
    region: ImageView<'_>,
    rects: &[Rect],
    set: &TemplateSet,
) -> GridResult<BTreeMap<u32, (f32, f32)>> {
    let _span = trace_span!("resolve", components = rects.len(), labels = set.len()).entered();

    let mut table = ScoreTable::build(region, rects, set)?;
    let mut coords = BTreeMap::new();
    while let Some((rect, label)) = table.take_best() {
        coords.insert(label, rect.center());
    }

    let missing: Vec<u32> = set
        .labels()
        .iter()
        .copied()
        .filter(|label| !coords.contains_key(label))
        .collect();
    if !missing.is_empty() {
        return Err(GridError::MissingLabels(missing));
    }
    trace_event!("labels_resolved", count = coords.len());
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::resolve_labels;
    use crate::image::ImageView;
    use crate::segment::{component_rects, sort_reading_order, SegmentConfig};
    use crate::template::TemplateSet;
    use crate::util::GridError;

    /// Dark two-tone texture unique per glyph index; local coordinates so a
    /// blob renders identically wherever it is placed.
    fn glyph_pixel(idx: usize, lx: usize, ly: usize) -> u8 {
        if (lx * (idx + 2) + ly * (2 * idx + 1)) % 7 < 3 {
            15
        } else {
            95
        }
    }

    /// White canvas with 20x20 textured blobs in a `cols` x `rows` layout;
    /// `glyphs[k]` gives the texture index of the k-th blob in reading order.
    fn render_grid(cols: usize, rows: usize, glyphs: &[usize]) -> (Vec<u8>, usize, usize) {
        let size = 20;
        let pitch = 32;
        let margin = 12;
        let width = 2 * margin + (cols - 1) * pitch + size;
        let height = 2 * margin + (rows - 1) * pitch + size;
        let mut data = vec![255u8; width * height];
        for (k, &idx) in glyphs.iter().enumerate() {
            let x0 = margin + (k % cols) * pitch;
            let y0 = margin + (k / cols) * pitch;
            for ly in 0..size {
                for lx in 0..size {
                    data[(y0 + ly) * width + (x0 + lx)] = glyph_pixel(idx, lx, ly);
                }
            }
        }
        (data, width, height)
    }

    fn set_from_grid(cols: usize, rows: usize, labels: Vec<u32>) -> TemplateSet {
        let order: Vec<usize> = (0..labels.len()).collect();
        let (data, width, height) = render_grid(cols, rows, &order);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        TemplateSet::from_scan(view, labels).unwrap()
    }

    #[test]
    fn full_grid_resolves_every_label_once() {
        let labels: Vec<u32> = (1..=25).collect();
        let set = set_from_grid(5, 5, labels.clone());

        // Read the numbers back off the normalized scan itself.
        let region = set.scan();
        let rects = component_rects(region, &SegmentConfig::default());
        assert_eq!(rects.len(), 25);

        let coords = resolve_labels(region, &rects, &set).unwrap();
        assert_eq!(coords.len(), 25);
        for label in labels {
            assert!(coords.contains_key(&label), "label {label} missing");
        }

        // One component per label: all 25 centers are distinct.
        let mut centers: Vec<(u32, u32)> = coords
            .values()
            .map(|&(x, y)| (x as u32, y as u32))
            .collect();
        centers.sort_unstable();
        centers.dedup();
        assert_eq!(centers.len(), 25);
    }

    #[test]
    fn labels_land_on_their_own_glyphs() {
        let set = set_from_grid(3, 1, vec![4, 5, 6]);
        let region = set.scan();
        let rects = sort_reading_order(component_rects(region, &SegmentConfig::default()));
        assert_eq!(rects.len(), 3);

        let coords = resolve_labels(region, &rects, &set).unwrap();
        assert_eq!(coords[&4], rects[0].center());
        assert_eq!(coords[&5], rects[1].center());
        assert_eq!(coords[&6], rects[2].center());
    }

    #[test]
    fn missing_labels_fail_the_whole_pass() {
        let set = set_from_grid(3, 1, vec![7, 8, 9]);

        // Region shows only the first and third glyphs.
        let (data, width, height) = render_grid(2, 1, &[0, 2]);
        let region = ImageView::from_slice(&data, width, height).unwrap();
        let rects = component_rects(region, &SegmentConfig::default());
        assert_eq!(rects.len(), 2);

        let err = resolve_labels(region, &rects, &set).unwrap_err();
        match err {
            GridError::MissingLabels(missing) => assert_eq!(missing, vec![8]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolution_is_deterministic_across_runs() {
        let set = set_from_grid(4, 2, (1..=8).collect());
        let region = set.scan();
        let rects = component_rects(region, &SegmentConfig::default());

        let first = resolve_labels(region, &rects, &set).unwrap();
        let second = resolve_labels(region, &rects, &set).unwrap();
        assert_eq!(first, second);
    }
}
