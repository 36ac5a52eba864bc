/// Default number of items per list page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page-size choices offered by list pages.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];

/// Client-side pagination window over an already-fetched list.
///
/// The window never re-fetches; it only recomputes which slice of the list is
/// visible. Out-of-range offsets clamp to the end of the list instead of
/// panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    offset: usize,
    limit: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageWindow {
    pub fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Zero-based index of the current page.
    pub fn page(&self) -> usize {
        self.offset / self.limit
    }

    pub fn set_page(&mut self, page: usize) {
        self.offset = page.saturating_mul(self.limit);
    }

    /// Changing the page size resets the window to the first page.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.limit)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = self.offset.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<usize> {
        (0..25).collect()
    }

    #[test]
    fn first_page_of_25_items_yields_first_ten() {
        let window = PageWindow::new(10);
        assert_eq!(window.slice(&items()), &(0..10).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn last_partial_page_clamps_to_list_end() {
        let mut window = PageWindow::new(10);
        window.set_page(2);
        assert_eq!(window.offset(), 20);
        assert_eq!(window.slice(&items()), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn offset_past_the_end_yields_empty_slice() {
        let mut window = PageWindow::new(10);
        window.set_page(7);
        assert!(window.slice(&items()).is_empty());
    }

    #[test]
    fn changing_limit_resets_to_first_page() {
        let mut window = PageWindow::new(10);
        window.set_page(2);
        window.set_limit(25);
        assert_eq!(window.offset(), 0);
        assert_eq!(window.slice(&items()).len(), 25);
    }

    #[test]
    fn total_pages_rounds_up() {
        let window = PageWindow::new(10);
        assert_eq!(window.total_pages(25), 3);
        assert_eq!(window.total_pages(0), 0);
        assert_eq!(window.total_pages(30), 3);
    }
}
