/// Preheat window module
///
/// This module decides which thumbnails should be warm as a grid scrolls:
/// - Rectangles and the layout port (geometry.rs)
/// - Vertical difference between two windows (diff.rs)
/// - The window tracker itself (tracker.rs)
/// - A fixed-column grid layout (layout.rs)

pub mod diff;
pub mod geometry;
pub mod layout;
pub mod tracker;

pub use geometry::{GeometryProvider, Rect};
pub use layout::GridLayout;
pub use tracker::{PreheatDelta, PreheatTracker};
