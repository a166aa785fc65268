//! Visible-region driven thumbnail preheating for scrolling photo grids.
//!
//! As a grid scrolls, [`preheat::PreheatTracker`] works out which photos
//! just came near the visible region and which drifted far away, and a
//! [`cache::ThumbnailPreheater`] forwards those batches to whatever
//! actually caches thumbnails. Photos are ordered by creation time in a
//! [`state::index::OrderedItemIndex`], usually loaded from the SQLite
//! catalog in [`state::library`].
//!
//! [`preheat::GridLayout`] is a ready-made layout for fixed-column grids,
//! including the scroll offset that centres a photo, and
//! [`state::cursor::PhotoCursor`] steps through photos one at a time for a
//! single-photo view that keeps the grid in sync.

pub mod cache;
pub mod error;
pub mod logging;
pub mod preheat;
pub mod state;
