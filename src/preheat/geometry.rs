//! Axis-aligned rectangles in the scrolling surface's coordinate space,
//! and the port the surface implements to map regions to item positions.

use std::collections::BTreeSet;

/// An axis-aligned rectangle `(x, y, width, height)`.
///
/// Negative or NaN sizes are normalized to zero on construction, so a
/// rectangle reported before the first layout pass is simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// The zero rectangle at the origin
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// A band spanning `[min_y, max_y)` with this rectangle's horizontal extent
    pub fn vertical_band(&self, min_y: f64, max_y: f64) -> Self {
        Self::new(self.x, min_y, self.width, max_y - min_y)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    ///
    /// Negative insets grow the rectangle. Shrinking past zero yields an
    /// empty rectangle rather than a negative size.
    pub fn inset(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    /// True when both rectangles are non-empty and share some area.
    ///
    /// Touching edges do not count, and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }
}

/// Layout knowledge owned by the display surface.
///
/// Given a rectangle, report the positions of items whose laid-out cell
/// intersects it. Positions beyond the index are tolerated downstream.
pub trait GeometryProvider {
    fn positions_in_rect(&self, rect: Rect) -> BTreeSet<usize>;
}

impl<F> GeometryProvider for F
where
    F: Fn(Rect) -> BTreeSet<usize>,
{
    fn positions_in_rect(&self, rect: Rect) -> BTreeSet<usize> {
        self(rect)
    }
}
