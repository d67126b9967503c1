//! Geometry primitives.

/// Axis-aligned rectangle in pixel coordinates, origin at the top-left.
///
/// `w` and `h` are always positive: every constructor in this crate derives
/// rectangles from at least one pixel. Compared and hashed by value so a
/// rectangle can key a score table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge column.
    pub x: u32,
    /// Top edge row.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl Rect {
    /// Creates a rectangle. `w` and `h` must be positive.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        debug_assert!(w > 0 && h > 0, "rect must have positive extent");
        Self { x, y, w, h }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    /// Column just past the right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Squared Euclidean distance from this rectangle's top-left corner to a point.
    pub(crate) fn corner_dist_sq(&self, point: (f32, f32)) -> f32 {
        let dx = self.x as f32 - point.0;
        let dy = self.y as f32 - point.1;
        dx * dx + dy * dy
    }
}
