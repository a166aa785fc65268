/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog, the ordered index and the preheat window.
use chrono::{DateTime, Utc};

/// Represents a single photo in the ordered index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Stable, opaque, unique identifier
    pub identifier: String,
    /// Zero-based position in ascending creation order
    pub position: usize,
    /// When the photo was taken or created
    pub created_at: DateTime<Utc>,
}

/// A photo as stored in the catalog, before it has a position
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    /// Unique database ID
    pub id: i64,
    /// Stable identifier handed to the cache controller
    pub identifier: String,
    /// Full path to the photo file
    pub path: String,
    /// Filename only (e.g., "IMG_0001.JPG")
    pub filename: String,
    /// Creation time used for ordering
    pub created_at: DateTime<Utc>,
    /// File status: 'exists' or 'deleted'
    pub file_status: String,
}
