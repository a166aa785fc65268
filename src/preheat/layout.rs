//! Fixed-column thumbnail grid.
//!
//! Implements [`GeometryProvider`] for a vertically scrolling grid of square
//! cells, the layout a photo browser shows its library in.

use std::collections::BTreeSet;

use super::geometry::{GeometryProvider, Rect};
use crate::cache::ThumbnailSize;
use crate::state::settings::GridSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    settings: GridSettings,
    view_width: f64,
    item_count: usize,
}

impl GridLayout {
    pub fn new(settings: GridSettings, view_width: f64, item_count: usize) -> Self {
        Self {
            settings,
            view_width: view_width.max(0.0),
            item_count,
        }
    }

    fn columns(&self) -> usize {
        self.settings.columns.max(1)
    }

    fn rows(&self) -> usize {
        self.item_count.div_ceil(self.columns())
    }

    /// Side length of a square cell in points
    pub fn item_side(&self) -> f64 {
        (self.view_width / self.columns() as f64 - self.settings.padding).max(0.0)
    }

    /// Pixel size to request thumbnails at
    pub fn thumbnail_target_size(&self) -> ThumbnailSize {
        let side = (self.item_side() * self.settings.screen_scale).round().max(0.0) as u32;
        ThumbnailSize::new(side, side)
    }

    /// Total scrollable height of the grid
    pub fn content_height(&self) -> f64 {
        let rows = self.rows();
        if rows == 0 {
            return 0.0;
        }
        self.settings.top_inset
            + rows as f64 * self.item_side()
            + (rows - 1) as f64 * self.settings.line_spacing
    }

    /// Frame of the cell at `position`, if it exists
    pub fn cell_frame(&self, position: usize) -> Option<Rect> {
        if position >= self.item_count {
            return None;
        }
        let side = self.item_side();
        let row = position / self.columns();
        let col = position % self.columns();
        Some(Rect::new(
            col as f64 * (side + self.settings.interitem_spacing),
            self.settings.top_inset + row as f64 * (side + self.settings.line_spacing),
            side,
            side,
        ))
    }

    /// Scroll offset that centres the cell at `position` in a viewport of
    /// `viewport_height`, clamped to the scrollable range.
    pub fn offset_centering(&self, position: usize, viewport_height: f64) -> Option<f64> {
        let frame = self.cell_frame(position)?;
        let max_offset = (self.content_height() - viewport_height).max(0.0);
        Some((frame.mid_y() - viewport_height / 2.0).clamp(0.0, max_offset))
    }
}

impl GeometryProvider for GridLayout {
    fn positions_in_rect(&self, rect: Rect) -> BTreeSet<usize> {
        let side = self.item_side();
        if rect.is_empty() || side <= 0.0 || self.item_count == 0 {
            return BTreeSet::new();
        }

        let pitch = side + self.settings.line_spacing;
        let top = self.settings.top_inset;
        let first_row = ((rect.min_y() - top) / pitch).floor().max(0.0) as usize;
        let last_row = (((rect.max_y() - top) / pitch).ceil().max(0.0) as usize).min(self.rows());

        let columns = self.columns();
        let mut positions = BTreeSet::new();
        for row in first_row..last_row {
            for col in 0..columns {
                let position = row * columns + col;
                match self.cell_frame(position) {
                    Some(frame) if frame.intersects(&rect) => {
                        positions.insert(position);
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 400pt wide: cells are 97pt, rows every 99pt starting at y = 10
    fn layout(count: usize) -> GridLayout {
        GridLayout::new(GridSettings::default(), 400.0, count)
    }

    #[test]
    fn test_cell_geometry() {
        let grid = layout(10);
        assert_eq!(grid.item_side(), 97.0);
        assert_eq!(grid.cell_frame(0), Some(Rect::new(0.0, 10.0, 97.0, 97.0)));
        assert_eq!(grid.cell_frame(5), Some(Rect::new(98.0, 109.0, 97.0, 97.0)));
        assert_eq!(grid.cell_frame(10), None);
        assert_eq!(grid.content_height(), 10.0 + 3.0 * 97.0 + 2.0 * 2.0);
    }

    #[test]
    fn test_target_size_uses_scale() {
        assert_eq!(layout(1).thumbnail_target_size(), ThumbnailSize::new(194, 194));
    }

    #[test]
    fn test_positions_in_rect() {
        let grid = layout(10);
        let full_width = |min_y: f64, max_y: f64| Rect::new(0.0, min_y, 400.0, max_y - min_y);

        // first row only
        assert_eq!(
            grid.positions_in_rect(full_width(0.0, 100.0)),
            (0..4).collect::<BTreeSet<_>>()
        );
        // the top inset holds nothing
        assert!(grid.positions_in_rect(full_width(0.0, 10.0)).is_empty());
        // gap between rows holds nothing
        assert!(grid.positions_in_rect(full_width(107.0, 109.0)).is_empty());
        // last row is partial
        assert_eq!(
            grid.positions_in_rect(full_width(250.0, 1000.0)),
            [8, 9].into_iter().collect::<BTreeSet<_>>()
        );
        // beyond the content
        assert!(grid.positions_in_rect(full_width(2000.0, 3000.0)).is_empty());
    }

    #[test]
    fn test_narrow_rect_hits_one_column() {
        let grid = layout(10);
        let positions = grid.positions_in_rect(Rect::new(100.0, 0.0, 10.0, 400.0));
        assert_eq!(positions, [1, 5, 9].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_degenerate_layouts() {
        let everything = Rect::new(0.0, 0.0, 400.0, 1000.0);
        assert!(layout(0).positions_in_rect(everything).is_empty());
        assert!(GridLayout::new(GridSettings::default(), 0.0, 10)
            .positions_in_rect(everything)
            .is_empty());
        let zero_columns = GridSettings {
            columns: 0,
            ..GridSettings::default()
        };
        assert_eq!(GridLayout::new(zero_columns, 100.0, 2).item_side(), 97.0);
    }

    #[test]
    fn test_offset_centering() {
        let grid = layout(40);
        // near the top: clamped to 0
        assert_eq!(grid.offset_centering(0, 300.0), Some(0.0));
        // row 5 centre is at 10 + 5 * 99 + 48.5
        assert_eq!(grid.offset_centering(20, 300.0), Some(10.0 + 495.0 + 48.5 - 150.0));
        // last row: clamped to the bottom
        let max = grid.content_height() - 300.0;
        assert_eq!(grid.offset_centering(39, 300.0), Some(max));
        assert_eq!(grid.offset_centering(40, 300.0), None);
    }
}
