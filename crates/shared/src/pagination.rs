//! Offset-based pagination utilities.

use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Number of numbered links shown before ellipses kick in.
const MAX_VISIBLE_PAGES: u32 = 5;

/// A normalized page request (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Builds a page request from optional query values, clamping out-of-range input.
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned with list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Number of pages needed for `total` records.
pub fn total_pages(total: usize, per_page: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    total.div_ceil(per_page as usize) as u32
}

/// Slices `items` according to the page request.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let data = items
        .into_iter()
        .skip(request.offset())
        .take(request.per_page as usize)
        .collect();

    Page {
        data,
        pagination: Pagination {
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: total_pages(total, request.per_page),
        },
    }
}

/// An entry in a page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "page")]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

/// Computes the navigation links for a list view.
///
/// Up to five pages are listed in full. Beyond that the first and last page are
/// always shown, with the current page and its neighbours in between and an
/// ellipsis wherever pages are skipped.
pub fn page_links(current: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageLink::Page).collect();
    }

    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total_pages - 1);
    for page in start..=end {
        links.push(PageLink::Page(page));
    }

    if current + 2 < total_pages {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total_pages));
    links
}
