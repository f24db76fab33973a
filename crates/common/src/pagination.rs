//! Pagination utilities shared by the service and server layers.
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs,
//! plus the `Page` container returned by list operations.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Build from optional query values, filling in defaults.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    /// Clamp to sane defaults and convert to `u64` (0-based page index, page size)
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// One page of results plus the numbers needed to render pagination controls.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    /// `page_idx` is 0-based, as returned by [`Pagination::normalize`].
    pub fn new(items: Vec<T>, total: u64, page_idx: u64, per_page: u64) -> Self {
        let pages = if per_page == 0 { 0 } else { total.div_ceil(per_page) };
        Self { items, total, page: page_idx + 1, per_page, pages }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
        }
    }

    pub fn has_next(&self) -> bool { self.page < self.pages }

    pub fn has_prev(&self) -> bool { self.page > 1 }
}

#[cfg(test)]
mod tests {
    use super::{Page, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
        let q = Pagination::from_query(None, Some(5));
        assert_eq!((q.page, q.per_page), (1, 5));
    }

    #[test]
    fn page_counts_partial_last_page() {
        let p = Page::new(vec![1, 2], 7, 3, 2);
        assert_eq!(p.page, 4);
        assert_eq!(p.pages, 4);
        assert!(!p.has_next());
        assert!(p.has_prev());

        let empty: Page<u8> = Page::new(vec![], 0, 0, 20);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_prev());
    }
}
