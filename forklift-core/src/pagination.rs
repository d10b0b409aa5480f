//! Page arithmetic for list views

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Position of one page within a list of `total` rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
}

impl Pagination {
    /// Build pagination for the requested page.
    ///
    /// `page` is clamped to `1..=total_pages` (at least 1) and `size` to
    /// `1..=100`; missing values fall back to page 1 of 20.
    pub fn new(page: Option<i64>, size: Option<i64>, total: i64) -> Self {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let total = total.max(0);
        let total_pages = total.saturating_add(size - 1) / size;
        let page = page.unwrap_or(1).clamp(1, total_pages.max(1));

        let has_next = page < total_pages;
        let has_prev = page > 1;

        Self {
            page,
            size,
            total,
            total_pages,
            has_next,
            has_prev,
            next_page: has_next.then(|| page + 1),
            prev_page: has_prev.then(|| page - 1),
        }
    }

    /// Rows to skip for this page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::new(None, None, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.size, 20);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_clamps_out_of_range_input() {
        let p = Pagination::new(Some(-3), Some(500), 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.size, 100);

        let p = Pagination::new(Some(2), Some(0), 10);
        assert_eq!(p.size, 1);
        assert_eq!(p.offset(), 1);
    }

    #[test]
    fn test_middle_page_links() {
        let p = Pagination::new(Some(2), Some(20), 45);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.next_page, Some(3));
        assert_eq!(p.prev_page, Some(1));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let p = Pagination::new(Some(3), Some(20), 45);
        assert!(!p.has_next);
        assert_eq!(p.next_page, None);
        assert_eq!(p.prev_page, Some(2));
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let p = Pagination::new(Some(i64::MAX), Some(20), 10);
        assert_eq!(p.page, 1);
        assert!(!p.has_next);
        assert_eq!(p.next_page, None);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(i64::MAX), Some(20), 45);
        assert_eq!(p.page, 3);
        assert_eq!(p.prev_page, Some(2));
        assert_eq!(p.offset(), 40);
    }
}
