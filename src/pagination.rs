//! Page arithmetic for question listings.

use std::ops::Range;

/// Fixed number of questions returned by one listing page.
pub const QUESTIONS_PER_PAGE: i64 = 10;

/// A 1-indexed page of the question listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(number: i64) -> Self {
        Self(number)
    }

    pub fn number(&self) -> i64 {
        self.0
    }

    /// Half-open range of row positions covered by this page.
    ///
    /// Pages below 1 and pages whose offset does not fit in an `i64` cover
    /// nothing and yield `None`.
    pub fn bounds(&self) -> Option<Range<i64>> {
        if self.0 < 1 {
            return None;
        }
        let start = (self.0 - 1).checked_mul(QUESTIONS_PER_PAGE)?;
        let end = start.checked_add(QUESTIONS_PER_PAGE)?;
        Some(start..end)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pages() {
        assert_eq!(Page::default().bounds(), Some(0..10));
        assert_eq!(Page::new(2).bounds(), Some(10..20));
        assert_eq!(Page::new(3).bounds(), Some(20..30));
    }

    #[test]
    fn pages_below_one_cover_nothing() {
        assert_eq!(Page::new(0).bounds(), None);
        assert_eq!(Page::new(-4).bounds(), None);
    }

    #[test]
    fn overflowing_offset_covers_nothing() {
        assert_eq!(Page::new(i64::MAX).bounds(), None);
        assert!(Page::new(i64::MAX / QUESTIONS_PER_PAGE).bounds().is_some());
    }
}
