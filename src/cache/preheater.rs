//! Surface-side glue between the preheat window and a cache controller.
//!
//! One preheater per display surface. It owns the tracker and the
//! controller it feeds; the surface passes in its current layout on each
//! call because only the surface knows where cells are.

use std::sync::Arc;

use tracing::debug;

use super::{CacheController, ThumbnailSize};
use crate::preheat::geometry::{GeometryProvider, Rect};
use crate::preheat::tracker::{PreheatDelta, PreheatTracker};
use crate::state::index::OrderedItemIndex;
use crate::state::settings::PreheatSettings;

#[derive(Debug)]
pub struct ThumbnailPreheater<C> {
    tracker: PreheatTracker,
    controller: C,
    target_size: ThumbnailSize,
}

impl<C: CacheController> ThumbnailPreheater<C> {
    pub fn new(
        index: Arc<OrderedItemIndex>,
        controller: C,
        target_size: ThumbnailSize,
        settings: PreheatSettings,
    ) -> Self {
        Self {
            tracker: PreheatTracker::with_settings(index, settings),
            controller,
            target_size,
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn tracker(&self) -> &PreheatTracker {
        &self.tracker
    }

    pub fn target_size(&self) -> ThumbnailSize {
        self.target_size
    }

    /// Change the thumbnail size, e.g. after a rotation changed the cell size.
    ///
    /// Everything cached at the old size is dropped and the window is
    /// rebuilt on the next scroll.
    pub fn set_target_size(&mut self, target_size: ThumbnailSize) {
        if target_size != self.target_size {
            self.target_size = target_size;
            self.appear();
        }
    }

    /// The surface's content was (re)shown: drop the cache and start over
    pub fn appear(&mut self) {
        self.controller.stop_caching_all();
        self.tracker.reset();
    }

    /// The visible rectangle changed; forward any window delta to the controller
    pub fn scroll<G>(&mut self, visible: Rect, geometry: &G) -> PreheatDelta
    where
        G: GeometryProvider + ?Sized,
    {
        let delta = self.tracker.update(visible, geometry);
        if !delta.is_empty() {
            self.controller
                .start_caching(&delta.added_identifiers(), self.target_size);
            self.controller
                .stop_caching(&delta.removed_identifiers(), self.target_size);
        }
        delta
    }

    /// Hand the controller the full membership expected for `visible`.
    ///
    /// Deltas alone drift if an update is ever missed; calling this now and
    /// then lets the controller correct itself. The tracker is rebased onto
    /// the reconciled window so later deltas start from what is cached.
    pub fn reconcile<G>(&mut self, visible: Rect, geometry: &G)
    where
        G: GeometryProvider + ?Sized,
    {
        let window = self.tracker.preheat_rect_for(visible);
        let index = self.tracker.index();
        let positions = index.positions_in_vertical_band(window, geometry);
        let expected = index
            .resolve(&positions)
            .into_iter()
            .map(|item| item.identifier)
            .collect();
        debug!(expected = positions.len(), "reconciling preheat window");
        self.controller.reconcile(&expected, self.target_size);
        self.tracker.rebase(window);
    }

    pub fn into_controller(self) -> C {
        self.controller
    }
}
