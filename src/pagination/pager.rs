//! Core pager type
//!
//! Owns the collection being paged and derives everything else (total pages,
//! current slice, item range) from current length and page size on every
//! read, so the derived values can never go stale.

use super::tokens::{page_tokens, PageToken};
use std::fmt;

/// Page sizes offered by the portal's per-page selector
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based display range of the current page ("Showing X to Y of Z")
///
/// `start` and `end` are inclusive; all three fields are 0 for an empty
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemRange {
    /// First item on the page, 1-based
    pub start: usize,
    /// Last item on the page, 1-based inclusive
    pub end: usize,
    /// Total items across all pages
    pub total: usize,
}

impl fmt::Display for ItemRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} to {} of {}", self.start, self.end, self.total)
    }
}

/// Client-side pager over an ordered in-memory collection
///
/// The collection's insertion order is the display order; the pager never
/// sorts. The current page is 1-based and kept clamped to
/// `[1, max(total_pages, 1)]` by every mutation, so no operation can fail or
/// observe an out-of-range page. An empty collection has zero pages and the
/// current page reads 1.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
    reset_on_replace: bool,
}

impl<T> Default for Pager<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Pager<T> {
    /// Create a pager with the default page size, starting on page 1
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            reset_on_replace: true,
        }
    }

    /// Set the page size (values below 1 are raised to 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Keep the current page (clamped) when the collection is replaced
    /// instead of resetting to page 1
    pub fn with_keep_page_on_replace(mut self) -> Self {
        self.reset_on_replace = false;
        self
    }

    /// Number of items across all pages
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The full backing collection
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current page, 1-based (reads 1 for an empty collection)
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total page count: `ceil(len / page_size)`, 0 for an empty collection
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// The items on the current page
    pub fn current_slice(&self) -> &[T] {
        let start = (self.page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// 1-based display range of the current page
    pub fn item_range(&self) -> ItemRange {
        if self.items.is_empty() {
            return ItemRange::default();
        }
        ItemRange {
            start: (self.page - 1) * self.page_size + 1,
            end: (self.page * self.page_size).min(self.items.len()),
            total: self.items.len(),
        }
    }

    /// Go to a page; out-of-range values are clamped, never rejected
    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages());
    }

    /// Change the page size and reset to page 1
    ///
    /// Values below 1 are raised to 1. Membership in
    /// [`PAGE_SIZE_OPTIONS`] is the caller's concern.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Replace the backing collection
    ///
    /// Resets to page 1 unless built with
    /// [`with_keep_page_on_replace`](Self::with_keep_page_on_replace), in
    /// which case the current page is clamped to the new range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.reset_on_replace {
            self.page = 1;
        } else {
            self.page = clamp_page(self.page, self.total_pages());
        }
    }

    /// Go to page 1
    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    /// Go to the last page
    pub fn last_page(&mut self) {
        self.set_page(self.total_pages());
    }

    /// Advance one page; a no-op on the last page
    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    /// Go back one page; a no-op on page 1
    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Check if a previous page exists
    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if a next page exists
    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page-number strip for the current state
    pub fn page_tokens(&self) -> Vec<PageToken> {
        page_tokens(self.total_pages(), self.page)
    }
}

/// Clamp a requested page to `[1, max(total_pages, 1)]`
fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
