//! LIMIT/OFFSET pagination helpers.

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Page number, clamped to at least 1.
    pub number: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Page {
    /// Create a page request from an optional query parameter.
    ///
    /// `None` and `0` both mean the first page.
    #[must_use]
    pub fn new(number: Option<u32>, per_page: u32) -> Self {
        Self {
            number: number.unwrap_or(1).max(1),
            per_page,
        }
    }

    /// SQL LIMIT value.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// SQL OFFSET value.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.number as i64 - 1) * self.per_page as i64
    }
}

/// Pagination state for templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page (1-based).
    pub current: u32,
    /// Total number of pages (at least 1, even when empty).
    pub total: u32,
}

impl PageInfo {
    /// Compute page info from a page request and a total item count.
    #[must_use]
    pub fn new(page: Page, total_items: u64) -> Self {
        let per_page = u64::from(page.per_page.max(1));
        let total = total_items.div_ceil(per_page).max(1);
        Self {
            current: page.number,
            total: u32::try_from(total).unwrap_or(u32::MAX),
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Previous page number (saturating at 1).
    #[must_use]
    pub const fn prev(&self) -> u32 {
        if self.current > 1 { self.current - 1 } else { 1 }
    }

    /// Next page number (saturating at the last page).
    #[must_use]
    pub const fn next(&self) -> u32 {
        if self.current < self.total {
            self.current + 1
        } else {
            self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_first() {
        assert_eq!(Page::new(None, 4).number, 1);
        assert_eq!(Page::new(Some(0), 4).number, 1);
        assert_eq!(Page::new(Some(3), 4).number, 3);
    }

    #[test]
    fn test_limit_offset() {
        let page = Page::new(Some(3), 4);
        assert_eq!(page.limit(), 4);
        assert_eq!(page.offset(), 8);

        let first = Page::new(None, 4);
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn test_page_info_totals() {
        // 9 items at 4 per page = 3 pages
        let info = PageInfo::new(Page::new(Some(1), 4), 9);
        assert_eq!(info.total, 3);
        assert!(!info.has_prev());
        assert!(info.has_next());

        // Empty listing still has one page
        let empty = PageInfo::new(Page::new(None, 4), 0);
        assert_eq!(empty.total, 1);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_page_info_navigation() {
        let info = PageInfo::new(Page::new(Some(2), 4), 12);
        assert_eq!(info.prev(), 1);
        assert_eq!(info.next(), 3);

        let last = PageInfo::new(Page::new(Some(3), 4), 12);
        assert!(!last.has_next());
        assert_eq!(last.next(), 3);
    }
}
