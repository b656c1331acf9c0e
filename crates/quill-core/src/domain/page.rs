use serde::{Deserialize, Serialize};

/// Posts shown per listing page.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Build a request, clamping page numbers below 1 up to the first page.
    ///
    /// Page numbers are capped so the row offset always fits a signed
    /// 64-bit SQL `OFFSET`.
    pub fn new(page: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let last_page = i64::MAX as u64 / per_page;
        Self {
            page: page.clamp(1, last_page.max(1)),
            per_page,
        }
    }

    /// Request for `page` with the default page size.
    pub fn page(page: u64) -> Self {
        Self::new(page, DEFAULT_PER_PAGE)
    }

    /// Zero-based row offset of the first item.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::page(1)
    }
}

/// One page of a listing plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages: total_items.div_ceil(request.per_page),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
