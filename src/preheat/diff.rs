//! Vertical difference between two preheat rectangles.
//!
//! Both rectangles are assumed to share their horizontal extent, so only
//! the top and bottom edges are compared. Bands are half-open `[min, max)`.

use super::geometry::Rect;

/// Bands that entered and left the window between two updates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectDifference {
    pub added: Vec<Rect>,
    pub removed: Vec<Rect>,
}

/// Compute the bands that became part of `new` and the bands that left `old`.
///
/// Disjoint rectangles get no overlap credit: all of `new` is added and all
/// of `old` is removed. Overlapping rectangles produce up to four bands, one
/// per edge that moved.
pub fn compute_difference(old: Rect, new: Rect) -> RectDifference {
    let mut diff = RectDifference::default();

    if !new.intersects(&old) {
        if !new.is_empty() {
            diff.added.push(new);
        }
        if !old.is_empty() {
            diff.removed.push(old);
        }
        return diff;
    }

    let (old_min_y, old_max_y) = (old.min_y(), old.max_y());
    let (new_min_y, new_max_y) = (new.min_y(), new.max_y());

    // grew downward
    if new_max_y > old_max_y {
        diff.added.push(new.vertical_band(old_max_y, new_max_y));
    }
    // grew upward
    if old_min_y > new_min_y {
        diff.added.push(new.vertical_band(new_min_y, old_min_y));
    }
    // shrank from the bottom
    if new_max_y < old_max_y {
        diff.removed.push(new.vertical_band(new_max_y, old_max_y));
    }
    // shrank from the top
    if old_min_y < new_min_y {
        diff.removed.push(new.vertical_band(old_min_y, new_min_y));
    }

    diff
}
