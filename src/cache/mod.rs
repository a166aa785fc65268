/// Thumbnail cache control
///
/// This module handles:
/// - The port the preheat window talks to (`CacheController`)
/// - An in-memory, idempotent caching manager
/// - The surface-side preheater that drives the controller on scroll
///
/// Fetching and decoding thumbnails is the controller's business; the
/// preheat window only decides which identifiers belong in the cache.

pub mod manager;
pub mod preheater;

use std::collections::BTreeSet;
use std::fmt;

pub use manager::{CachingManager, ReconcileReport};
pub use preheater::ThumbnailPreheater;

/// Pixel size thumbnails are requested at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Receives start/stop batches from the preheat window.
///
/// Implementations must be idempotent: starting an identifier that is
/// already cached, or stopping one that is not, does nothing. Empty
/// batches are no-ops.
pub trait CacheController {
    /// Begin caching thumbnails for `identifiers` at `target` size
    fn start_caching(&mut self, identifiers: &BTreeSet<String>, target: ThumbnailSize);

    /// Stop caching thumbnails for `identifiers` at `target` size
    fn stop_caching(&mut self, identifiers: &BTreeSet<String>, target: ThumbnailSize);

    /// Drop everything, at every size
    fn stop_caching_all(&mut self);

    /// Bring membership at `target` in line with `expected`.
    ///
    /// The default can only add what is missing; controllers that know
    /// their membership should also stop what is extraneous.
    fn reconcile(&mut self, expected: &BTreeSet<String>, target: ThumbnailSize) {
        self.start_caching(expected, target);
    }
}
