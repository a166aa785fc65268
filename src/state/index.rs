/// Ordered snapshot of the photo collection
///
/// Every item gets a zero-based position by ascending creation time.
/// The index is read-only once built; refreshing means building a new one.
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::data::Item;
use crate::error::IndexError;
use crate::preheat::geometry::{GeometryProvider, Rect};

#[derive(Debug, Clone, Default)]
pub struct OrderedItemIndex {
    items: Vec<Item>,
    positions: HashMap<String, usize>,
}

impl OrderedItemIndex {
    /// Create an empty index (nothing loaded yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from `(identifier, created_at)` pairs in any order.
    ///
    /// Items are sorted by creation time, ties broken by identifier so the
    /// order is stable across loads. Duplicate identifiers keep the first
    /// occurrence after sorting.
    pub fn from_items<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DateTime<Utc>)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, DateTime<Utc>)> = entries
            .into_iter()
            .map(|(identifier, created_at)| (identifier.into(), created_at))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut items = Vec::with_capacity(entries.len());
        let mut positions = HashMap::with_capacity(entries.len());
        for (identifier, created_at) in entries {
            if positions.contains_key(&identifier) {
                continue;
            }
            let position = items.len();
            positions.insert(identifier.clone(), position);
            items.push(Item {
                identifier,
                position,
                created_at,
            });
        }

        Self { items, positions }
    }

    /// Total number of items; 0 for an empty collection
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the item at `position`
    pub fn identifier_at(&self, position: usize) -> Result<&Item, IndexError> {
        self.items.get(position).ok_or(IndexError::OutOfRange {
            position,
            count: self.items.len(),
        })
    }

    /// Reverse lookup from identifier to position
    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.positions.get(identifier).copied()
    }

    /// Positions of laid-out cells intersecting `band`.
    ///
    /// The layout knowledge lives in the display surface; this only forwards
    /// the query so callers can resolve the result against this index.
    pub fn positions_in_vertical_band<G>(&self, band: Rect, geometry: &G) -> BTreeSet<usize>
    where
        G: GeometryProvider + ?Sized,
    {
        if self.is_empty() || band.is_empty() {
            return BTreeSet::new();
        }
        geometry.positions_in_rect(band)
    }

    /// Resolve positions to items, skipping any that are out of range.
    ///
    /// A stale position from the layout must not drop the whole batch.
    pub fn resolve<'a, I>(&self, positions: I) -> Vec<Item>
    where
        I: IntoIterator<Item = &'a usize>,
    {
        let mut resolved = Vec::new();
        for &position in positions {
            match self.identifier_at(position) {
                Ok(item) => resolved.push(item.clone()),
                Err(err) => debug!(%err, "skipping unresolvable position"),
            }
        }
        resolved
    }

    /// Iterate items in position order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}
