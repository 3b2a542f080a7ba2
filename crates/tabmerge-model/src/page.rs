//! Row windows for paginated browsing.

use serde::{Deserialize, Serialize};

/// A bounded row window: rows `[offset, offset + limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Start row and length of the window clipped to a table of `height` rows.
    pub fn clip(&self, height: usize) -> (usize, usize) {
        let start = self.offset.min(height);
        let len = self.limit.min(height - start);
        (start, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside() {
        assert_eq!(Page::new(2, 3).clip(10), (2, 3));
    }

    #[test]
    fn test_clip_tail() {
        assert_eq!(Page::new(8, 5).clip(10), (8, 2));
    }

    #[test]
    fn test_clip_past_end() {
        assert_eq!(Page::new(20, 5).clip(10), (10, 0));
    }
}
