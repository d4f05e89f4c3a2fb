//! Offset pagination

use serde::Serialize;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Build a request from optional parameters, clamping both to sane bounds
    pub fn new(page: Option<u32>, page_size: Option<u32>, default_page_size: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(default_page_size)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to skip
    pub fn skip(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// Whether rows remain past this page, given the total matching count
    pub fn has_more(&self, total: i64) -> bool {
        total > self.skip() + self.limit()
    }

    /// Limit to request when the next page is detected by over-fetching
    pub fn lookahead_limit(&self) -> i64 {
        self.limit() + 1
    }

    /// Trim an over-fetched result to this page and report whether more exist
    pub fn split_lookahead<T>(&self, mut items: Vec<T>) -> (Vec<T>, bool) {
        let page_size = self.page_size as usize;
        let has_more = items.len() > page_size;
        items.truncate(page_size);
        (items, has_more)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}
