//! Preheat window tracking.
//!
//! The preheat window is the visible rectangle expanded above and below so
//! that thumbnails just off-screen are warm before they scroll into view.
//! [`PreheatTracker::update`] compares the new window against the last one
//! it recorded and reports which items entered and which left.
//!
//! The tracker never knows what is actually cached. It only emits deltas,
//! so the cache controller on the other end has to be idempotent.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::diff::compute_difference;
use super::geometry::{GeometryProvider, Rect};
use crate::state::data::Item;
use crate::state::index::OrderedItemIndex;
use crate::state::settings::PreheatSettings;

/// Items that entered and left the preheat window in one update.
///
/// Both lists are in ascending position order, hold no duplicates, and
/// never share an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreheatDelta {
    pub added: Vec<Item>,
    pub removed: Vec<Item>,
}

impl PreheatDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added_identifiers(&self) -> BTreeSet<String> {
        self.added.iter().map(|i| i.identifier.clone()).collect()
    }

    pub fn removed_identifiers(&self) -> BTreeSet<String> {
        self.removed.iter().map(|i| i.identifier.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WindowState {
    /// No window recorded; the next update treats everything as new
    Idle,
    /// Last preheat rectangle that produced a recomputation
    Tracking { preheat_rect: Rect },
}

/// Tracks the preheat window of one display surface.
#[derive(Debug, Clone)]
pub struct PreheatTracker {
    index: Arc<OrderedItemIndex>,
    settings: PreheatSettings,
    state: WindowState,
}

impl PreheatTracker {
    /// Create a tracker with the default policy: a window twice the visible
    /// height, recomputed once its centre moves more than a third of it.
    pub fn new(index: Arc<OrderedItemIndex>) -> Self {
        Self::with_settings(index, PreheatSettings::default())
    }

    pub fn with_settings(index: Arc<OrderedItemIndex>, settings: PreheatSettings) -> Self {
        Self {
            index,
            settings,
            state: WindowState::Idle,
        }
    }

    pub fn index(&self) -> &Arc<OrderedItemIndex> {
        &self.index
    }

    /// True once a window has been recorded since creation or the last reset
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, WindowState::Tracking { .. })
    }

    /// The recorded preheat rectangle, or the zero rectangle when idle
    pub fn previous_preheat_rect(&self) -> Rect {
        match self.state {
            WindowState::Idle => Rect::ZERO,
            WindowState::Tracking { preheat_rect } => preheat_rect,
        }
    }

    /// The preheat rectangle derived from a visible rectangle
    pub fn preheat_rect_for(&self, visible: Rect) -> Rect {
        let visible = normalize(visible);
        visible.inset(0.0, -self.settings.expansion * visible.height)
    }

    /// Record `preheat_rect` as the current window without emitting a delta.
    ///
    /// Used after the cache was brought in line with that window by other
    /// means, so the next update diffs against what is actually cached.
    /// An empty rectangle returns the tracker to idle.
    pub fn rebase(&mut self, preheat_rect: Rect) {
        let preheat_rect = normalize(preheat_rect);
        self.state = if preheat_rect.is_empty() {
            WindowState::Idle
        } else {
            WindowState::Tracking { preheat_rect }
        };
    }

    /// Forget the recorded window so the next update adds the whole window
    pub fn reset(&mut self) {
        self.state = WindowState::Idle;
    }

    /// Recompute the window for a new visible rectangle.
    ///
    /// Returns an empty delta when the window has not moved far enough to
    /// matter, when the visible rectangle covers no area, or when the index
    /// is empty.
    pub fn update<G>(&mut self, visible: Rect, geometry: &G) -> PreheatDelta
    where
        G: GeometryProvider + ?Sized,
    {
        let visible = normalize(visible);
        let preheat_rect = self.preheat_rect_for(visible);
        if preheat_rect.is_empty() {
            return PreheatDelta::default();
        }

        let previous = self.previous_preheat_rect();
        if self.is_tracking() {
            let delta = preheat_rect.mid_y() - previous.mid_y();
            let threshold = self.settings.threshold(visible.height);
            if delta.abs() <= threshold {
                return PreheatDelta::default();
            }
            debug!(delta, threshold, "preheat window moved");
        }

        let diff = compute_difference(previous, preheat_rect);

        let mut added_positions = BTreeSet::new();
        for band in &diff.added {
            added_positions.extend(self.index.positions_in_vertical_band(*band, geometry));
        }
        let mut removed_positions = BTreeSet::new();
        for band in &diff.removed {
            removed_positions.extend(self.index.positions_in_vertical_band(*band, geometry));
        }
        // an item worth adding is never dropped in the same update
        removed_positions.retain(|p| !added_positions.contains(p));

        self.state = WindowState::Tracking { preheat_rect };

        let delta = PreheatDelta {
            added: self.index.resolve(&added_positions),
            removed: self.index.resolve(&removed_positions),
        };
        debug!(
            added_bands = diff.added.len(),
            removed_bands = diff.removed.len(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            "preheat window updated"
        );
        delta
    }
}

fn normalize(rect: Rect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width, rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// One full-width row per item, `row_height` tall, starting at y = 0
    struct Rows {
        row_height: f64,
        count: usize,
    }

    impl GeometryProvider for Rows {
        fn positions_in_rect(&self, rect: Rect) -> BTreeSet<usize> {
            let first = (rect.min_y().max(0.0) / self.row_height).floor() as usize;
            let last = (rect.max_y() / self.row_height).ceil().max(0.0) as usize;
            (first..last.min(self.count)).collect()
        }
    }

    fn index(count: usize) -> Arc<OrderedItemIndex> {
        Arc::new(OrderedItemIndex::from_items(
            (0..count).map(|i| (format!("photo-{i:03}"), Utc.timestamp_opt(i as i64, 0).unwrap())),
        ))
    }

    fn positions(items: &[Item]) -> Vec<usize> {
        items.iter().map(|i| i.position).collect()
    }

    #[test]
    fn test_first_update_adds_whole_window() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));

        let delta = tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        assert_eq!(positions(&delta.added), vec![0, 1, 2, 3, 4]);
        assert!(delta.removed.is_empty());
        assert_eq!(
            tracker.previous_preheat_rect(),
            Rect::new(0.0, -150.0, 100.0, 600.0)
        );
    }

    #[test]
    fn test_scroll_down_scenario() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        let delta = tracker.update(Rect::new(0.0, 500.0, 100.0, 300.0), &geometry);

        // added band [450, 950), removed band [-150, 350)
        assert_eq!(positions(&delta.added), vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(positions(&delta.removed), vec![0, 1, 2, 3]);
        assert_eq!(
            tracker.previous_preheat_rect(),
            Rect::new(0.0, 350.0, 100.0, 600.0)
        );
    }

    #[test]
    fn test_small_moves_are_damped() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        for y in [10.0, 50.0, 100.0, -100.0, 0.0, 99.0] {
            let delta = tracker.update(Rect::new(0.0, y, 100.0, 300.0), &geometry);
            assert!(delta.is_empty(), "move to {y} should be damped");
        }
        assert_eq!(
            tracker.previous_preheat_rect(),
            Rect::new(0.0, -150.0, 100.0, 600.0)
        );
    }

    #[test]
    fn test_upward_moves_are_not_damped() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        tracker.update(Rect::new(0.0, 1000.0, 100.0, 300.0), &geometry);

        let delta = tracker.update(Rect::new(0.0, 800.0, 100.0, 300.0), &geometry);

        // old [850, 1450), new [650, 1250); row 12 straddles the removed band
        assert_eq!(positions(&delta.added), vec![6, 7, 8]);
        assert_eq!(positions(&delta.removed), vec![12, 13, 14]);
    }

    #[test]
    fn test_repeated_rect_is_idempotent() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        let rect = Rect::new(0.0, 700.0, 100.0, 300.0);

        assert!(!tracker.update(rect, &geometry).is_empty());
        assert!(tracker.update(rect, &geometry).is_empty());
    }

    #[test]
    fn test_disjoint_jump_swaps_windows() {
        let geometry = Rows { row_height: 100.0, count: 50 };
        let mut tracker = PreheatTracker::new(index(50));
        tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        let delta = tracker.update(Rect::new(0.0, 3000.0, 100.0, 300.0), &geometry);

        // new window [2850, 3450)
        assert_eq!(positions(&delta.added), (28..35).collect::<Vec<_>>());
        assert_eq!(positions(&delta.removed), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reset_readds_whole_window() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        let rect = Rect::new(0.0, 0.0, 100.0, 300.0);
        tracker.update(rect, &geometry);

        tracker.reset();
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.previous_preheat_rect(), Rect::ZERO);

        let delta = tracker.update(rect, &geometry);
        assert_eq!(positions(&delta.added), vec![0, 1, 2, 3, 4]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_reset_bypasses_damping_near_origin() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));

        // window centred at y = 50, closer to the zero rect than the threshold
        let delta = tracker.update(Rect::new(0.0, -100.0, 100.0, 300.0), &geometry);

        assert_eq!(positions(&delta.added), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rebase_moves_the_recorded_window() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));
        tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        let window = tracker.preheat_rect_for(Rect::new(0.0, 90.0, 100.0, 300.0));
        tracker.rebase(window);
        assert_eq!(tracker.previous_preheat_rect(), window);

        // old [-60, 540), new [540, 1140): disjoint once rebased
        let delta = tracker.update(Rect::new(0.0, 690.0, 100.0, 300.0), &geometry);
        assert_eq!(positions(&delta.added), vec![5, 6, 7, 8, 9, 10, 11]);
        // row 5 straddles both windows and stays added
        assert_eq!(positions(&delta.removed), vec![0, 1, 2, 3, 4]);

        tracker.rebase(Rect::ZERO);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_item_spanning_both_bands_stays_added() {
        let geometry = Rows { row_height: 1000.0, count: 3 };
        let mut tracker = PreheatTracker::new(index(3));
        tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        let delta = tracker.update(Rect::new(0.0, 500.0, 100.0, 300.0), &geometry);

        assert_eq!(positions(&delta.added), vec![0]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_degenerate_rects_produce_nothing() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(index(20));

        assert!(tracker.update(Rect::ZERO, &geometry).is_empty());
        let negative = Rect { x: 0.0, y: 0.0, width: 100.0, height: -300.0 };
        assert!(tracker.update(negative, &geometry).is_empty());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_empty_index_produces_nothing() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let mut tracker = PreheatTracker::new(Arc::new(OrderedItemIndex::new()));

        assert!(tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry).is_empty());
        assert!(tracker.update(Rect::new(0.0, 5000.0, 100.0, 300.0), &geometry).is_empty());
    }

    #[test]
    fn test_stale_layout_positions_are_skipped() {
        // layout believes there are more items than the index holds
        let geometry = Rows { row_height: 100.0, count: 100 };
        let mut tracker = PreheatTracker::new(index(3));

        let delta = tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);

        assert_eq!(positions(&delta.added), vec![0, 1, 2]);
    }

    #[test]
    fn test_added_and_removed_never_overlap() {
        let geometry = Rows { row_height: 70.0, count: 200 };
        let mut tracker = PreheatTracker::new(index(200));

        for y in [0.0, 130.0, 420.0, 380.0, 2000.0, 1900.0, 50.0, 7000.0, 6800.0] {
            let delta = tracker.update(Rect::new(0.0, y, 100.0, 300.0), &geometry);
            let added = delta.added_identifiers();
            assert!(
                delta.removed_identifiers().is_disjoint(&added),
                "overlap after scrolling to {y}"
            );
        }
    }

    #[test]
    fn test_custom_policy() {
        let geometry = Rows { row_height: 100.0, count: 20 };
        let settings = PreheatSettings {
            expansion: 0.0,
            damping_divisor: 1.0,
        };
        let mut tracker = PreheatTracker::with_settings(index(20), settings);

        let delta = tracker.update(Rect::new(0.0, 0.0, 100.0, 300.0), &geometry);
        assert_eq!(positions(&delta.added), vec![0, 1, 2]);

        // a full-height move is still within the threshold
        assert!(tracker.update(Rect::new(0.0, 300.0, 100.0, 300.0), &geometry).is_empty());
    }
}
