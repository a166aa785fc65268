/// Position cursor for the single-photo detail view
///
/// Swiping moves one photo forward or back and stops at either end.
use crate::error::IndexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoCursor {
    position: usize,
    count: usize,
}

impl PhotoCursor {
    /// Open the detail view at `position` in a collection of `count` photos
    pub fn new(position: usize, count: usize) -> Result<Self, IndexError> {
        if position >= count {
            return Err(IndexError::OutOfRange { position, count });
        }
        Ok(Self { position, count })
    }

    pub fn current(&self) -> usize {
        self.position
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Jump straight to `position`, e.g. from the thumbnail strip
    pub fn select(&mut self, position: usize) -> Result<usize, IndexError> {
        if position >= self.count {
            return Err(IndexError::OutOfRange {
                position,
                count: self.count,
            });
        }
        self.position = position;
        Ok(position)
    }

    /// Move to the next (newer) photo; `None` when already at the last one
    pub fn next(&mut self) -> Option<usize> {
        if self.position + 1 >= self.count {
            return None;
        }
        self.position += 1;
        Some(self.position)
    }

    /// Move to the previous (older) photo; `None` when already at the first one
    pub fn previous(&mut self) -> Option<usize> {
        self.position = self.position.checked_sub(1)?;
        Some(self.position)
    }
}
