//! Offset pagination for `consultaPorCuit`.
//!
//! The registry pages by an `offset` query parameter that the caller advances
//! by a fixed page size. A page ends the walk when it is empty or when its
//! `hasMore` flag is false. [`OffsetPager`] also caps the number of pages so a
//! registry that keeps answering `hasMore: true` cannot loop forever.

/// Drives one taxpayer's walk through the listing pages.
#[derive(Debug, Clone)]
pub struct OffsetPager {
    page_size: u32,
    max_pages: usize,
    offset: u32,
    pages: usize,
    exhausted: bool,
}

impl OffsetPager {
    #[must_use]
    pub fn new(page_size: u32, max_pages: usize) -> Self {
        Self {
            page_size,
            max_pages,
            offset: 0,
            pages: 0,
            exhausted: false,
        }
    }

    /// Offset for the next request, or `None` once the walk is over.
    #[must_use]
    pub fn next_offset(&self) -> Option<u32> {
        (!self.exhausted && self.pages < self.max_pages).then_some(self.offset)
    }

    /// Records a fetched page and moves to the next offset.
    pub fn record_page(&mut self, item_count: usize, has_more: bool) {
        self.pages += 1;
        if item_count == 0 || !has_more {
            self.exhausted = true;
        } else {
            self.offset = self.offset.saturating_add(self.page_size);
        }
    }

    /// Stops the walk early, e.g. after a failed request.
    pub fn abort(&mut self) {
        self.exhausted = true;
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// `true` when the page cap, not the registry, ended the walk.
    #[must_use]
    pub fn hit_page_limit(&self) -> bool {
        !self.exhausted && self.pages >= self.max_pages
    }
}
