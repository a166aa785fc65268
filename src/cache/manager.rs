//! In-memory caching manager.
//!
//! Tracks which identifiers are being cached at which size. Membership is
//! all it keeps; a real backend would hang thumbnail requests off the
//! `start` and `stop` transitions reported here.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::{CacheController, ThumbnailSize};

/// What a reconciliation pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub started: usize,
    pub stopped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CachingManager {
    cached: HashMap<ThumbnailSize, HashSet<String>>,
}

impl CachingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cached(&self, identifier: &str, target: ThumbnailSize) -> bool {
        self.cached
            .get(&target)
            .is_some_and(|set| set.contains(identifier))
    }

    /// Number of identifiers cached at `target`
    pub fn cached_count(&self, target: ThumbnailSize) -> usize {
        self.cached.get(&target).map_or(0, HashSet::len)
    }

    /// Identifiers cached at `target`, sorted
    pub fn cached_identifiers(&self, target: ThumbnailSize) -> BTreeSet<String> {
        self.cached
            .get(&target)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Explicit reconciliation returning what changed
    pub fn reconcile_with(
        &mut self,
        expected: &BTreeSet<String>,
        target: ThumbnailSize,
    ) -> ReconcileReport {
        let current = self.cached_identifiers(target);
        let missing: BTreeSet<String> = expected.difference(&current).cloned().collect();
        let extra: BTreeSet<String> = current.difference(expected).cloned().collect();

        self.start_caching(&missing, target);
        self.stop_caching(&extra, target);

        let report = ReconcileReport {
            started: missing.len(),
            stopped: extra.len(),
        };
        if report != ReconcileReport::default() {
            info!(
                %target,
                started = report.started,
                stopped = report.stopped,
                "cache membership drifted, reconciled"
            );
        }
        report
    }
}

impl CacheController for CachingManager {
    fn start_caching(&mut self, identifiers: &BTreeSet<String>, target: ThumbnailSize) {
        if identifiers.is_empty() {
            return;
        }
        let set = self.cached.entry(target).or_default();
        let before = set.len();
        set.extend(identifiers.iter().cloned());
        debug!(%target, requested = identifiers.len(), started = set.len() - before, "start caching");
    }

    fn stop_caching(&mut self, identifiers: &BTreeSet<String>, target: ThumbnailSize) {
        if identifiers.is_empty() {
            return;
        }
        let Some(set) = self.cached.get_mut(&target) else {
            return;
        };
        let before = set.len();
        set.retain(|id| !identifiers.contains(id));
        debug!(%target, requested = identifiers.len(), stopped = before - set.len(), "stop caching");
        if set.is_empty() {
            self.cached.remove(&target);
        }
    }

    fn stop_caching_all(&mut self) {
        self.cached.clear();
    }

    fn reconcile(&mut self, expected: &BTreeSet<String>, target: ThumbnailSize) {
        self.reconcile_with(expected, target);
    }
}
