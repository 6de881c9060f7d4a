//! Client-side list paging.
//!
//! Every dashboard table follows the same pipeline: the full collection is
//! fetched once, filtered in memory by an AND of the active filter controls,
//! and sliced into fixed-size pages. Nothing here performs I/O; the result is
//! recomputed from scratch on every render.

pub mod filter;

use serde::Serialize;

pub use filter::{Choice, FnFilter, NoFilter, RecordFilter, SearchTerm};

/// Rows per page used by every table unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of numbered page buttons shown at once.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// A strictly positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize(usize);

impl PageSize {
    /// Panics when `size` is zero: a zero page size is a configuration bug.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "page size must be positive");
        PageSize(size)
    }

    pub fn try_new(size: usize) -> Option<Self> {
        (size > 0).then_some(PageSize(size))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

/// One numbered button in the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub number: usize,
    pub current: bool,
}

/// Pagination bar state. Empty when everything fits on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub previous: Option<usize>,
    pub buttons: Vec<PageButton>,
    pub next: Option<usize>,
}

impl PageControls {
    pub fn for_page(current: usize, total_pages: usize) -> Self {
        if total_pages <= 1 {
            return PageControls::default();
        }
        let (first, last) = page_window(current, total_pages);
        PageControls {
            previous: (current > 1).then(|| current - 1),
            buttons: (first..=last)
                .map(|number| PageButton { number, current: number == current })
                .collect(),
            next: (current < total_pages).then(|| current + 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// Inclusive range of page numbers to show as buttons, centred on `current`
/// and shifted so the window stays inside `1..=total_pages`.
pub fn page_window(current: usize, total_pages: usize) -> (usize, usize) {
    let half = MAX_PAGE_BUTTONS / 2;
    let mut first = current.saturating_sub(half).max(1);
    let last = (first + MAX_PAGE_BUTTONS - 1).min(total_pages);
    if last + 1 - first < MAX_PAGE_BUTTONS {
        first = (last + 1).saturating_sub(MAX_PAGE_BUTTONS).max(1);
    }
    (first, last)
}

/// The visible slice of a filtered collection plus everything needed to
/// draw the table footer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<R> {
    pub rows: Vec<R>,
    /// Page actually shown, after clamping.
    pub page: usize,
    /// Page the caller asked for.
    pub requested_page: usize,
    pub page_size: usize,
    pub total_filtered: usize,
    /// Never zero; an empty result is displayed as a single page.
    pub total_pages: usize,
    pub controls: PageControls,
}

impl<R> Paged<R> {
    pub fn map<U, F>(self, f: F) -> Paged<U>
    where
        F: FnMut(R) -> U,
    {
        Paged {
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            requested_page: self.requested_page,
            page_size: self.page_size,
            total_filtered: self.total_filtered,
            total_pages: self.total_pages,
            controls: self.controls,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Slice bounds computed from the requested page, before clamping.
    /// Saturates for page numbers taken verbatim from a query string.
    pub fn requested_bounds(&self) -> (usize, usize) {
        let start = self.requested_page.saturating_sub(1).saturating_mul(self.page_size);
        (start, start.saturating_add(self.page_size))
    }

    /// "Showing 11-12 of 12 faculty members"
    pub fn label(&self, entity: &str) -> String {
        let (start, end) = self.requested_bounds();
        format!(
            "Showing {}-{} of {} {}",
            start.saturating_add(1),
            end.min(self.total_filtered),
            self.total_filtered,
            entity
        )
    }
}

/// Filter `items` with `predicate` (order preserved), then cut out page
/// `page` of size `page_size`. A page past the end is clamped to the last
/// page. Panics when `page` is zero.
pub fn paginate<'a, T, P>(items: &'a [T], predicate: P, page: usize, page_size: PageSize) -> Paged<&'a T>
where
    P: Fn(&T) -> bool,
{
    assert!(page >= 1, "page index is 1-based");

    let filtered: Vec<&T> = items.iter().filter(|item| predicate(item)).collect();
    let total_filtered = filtered.len();
    let size = page_size.get();
    let total_pages = total_filtered.div_ceil(size).max(1);
    let clamped = page.clamp(1, total_pages);

    let rows = filtered
        .into_iter()
        .skip((clamped - 1) * size)
        .take(size)
        .collect();

    Paged {
        rows,
        page: clamped,
        requested_page: page,
        page_size: size,
        total_filtered,
        total_pages,
        controls: PageControls::for_page(clamped, total_pages),
    }
}

/// State of one table: the fetched collection, the active filter and the
/// current page. Each handler owns its own instance for the lifetime of the
/// render, so no list state is shared between views.
#[derive(Debug, Clone)]
pub struct ListView<T, F> {
    items: Vec<T>,
    filter: F,
    page: usize,
    page_size: PageSize,
}

impl<T, F> ListView<T, F>
where
    F: RecordFilter<T>,
{
    pub fn new(page_size: PageSize) -> Self
    where
        F: Default,
    {
        Self::with_filter(page_size, F::default())
    }

    pub fn with_filter(page_size: PageSize, filter: F) -> Self {
        ListView { items: Vec::new(), filter, page: 1, page_size }
    }

    /// Replace the collection wholesale after a fetch. The page index is
    /// kept; rendering clamps it if the new collection is shorter.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Install a new filter and go back to the first page.
    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        assert!(page >= 1, "page index is 1-based");
        self.page = page;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current(&self) -> Paged<&T> {
        paginate(&self.items, |record| self.filter.matches(record), self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn window_is_centred_on_current_page() {
        assert_eq!(page_window(5, 10), (3, 7));
        assert_eq!(page_window(1, 10), (1, 5));
        assert_eq!(page_window(10, 10), (6, 10));
        assert_eq!(page_window(9, 10), (6, 10));
        assert_eq!(page_window(2, 3), (1, 3));
    }

    #[test]
    fn controls_hidden_for_single_page() {
        assert!(PageControls::for_page(1, 1).is_empty());
        let controls = PageControls::for_page(1, 1);
        assert_eq!(controls.previous, None);
        assert_eq!(controls.next, None);
    }

    #[test]
    fn controls_have_prev_and_next_in_the_middle() {
        let controls = PageControls::for_page(3, 6);
        assert_eq!(controls.previous, Some(2));
        assert_eq!(controls.next, Some(4));
        let numbers: Vec<usize> = controls.buttons.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert!(controls.buttons.iter().filter(|b| b.current).all(|b| b.number == 3));
    }

    #[test]
    fn last_page_may_be_partial() {
        let items = numbers(23);
        let paged = paginate(&items, |_| true, 3, PageSize::new(10));
        assert_eq!(paged.rows, vec![&21, &22, &23]);
        assert_eq!(paged.total_pages, 3);
        assert_eq!(paged.controls.next, None);
    }

    #[test]
    fn stale_page_is_clamped() {
        let items = numbers(12);
        let paged = paginate(&items, |_| true, 7, PageSize::new(10));
        assert_eq!(paged.page, 2);
        assert_eq!(paged.requested_page, 7);
        assert_eq!(paged.rows.len(), 2);
    }

    #[test]
    fn label_uses_requested_bounds() {
        let items = numbers(12);
        let paged = paginate(&items, |_| true, 1, PageSize::new(10));
        assert_eq!(paged.label("students"), "Showing 1-10 of 12 students");
    }

    #[test]
    #[should_panic(expected = "page size must be positive")]
    fn zero_page_size_fails_fast() {
        let _ = PageSize::new(0);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn zero_page_index_fails_fast() {
        let items = numbers(3);
        let _ = paginate(&items, |_| true, 0, PageSize::default());
    }

    fn everything(_: &usize) -> bool {
        true
    }

    fn first_five(n: &usize) -> bool {
        *n <= 5
    }

    #[test]
    fn set_filter_resets_page() {
        let mut view: ListView<usize, FnFilter<fn(&usize) -> bool>> =
            ListView::with_filter(PageSize::new(10), FnFilter(everything as fn(&usize) -> bool));
        view.replace_items(numbers(25));
        view.go_to_page(3);
        assert_eq!(view.current().rows.len(), 5);

        view.set_filter(FnFilter(first_five as fn(&usize) -> bool));
        assert_eq!(view.page(), 1);
        let paged = view.current();
        assert_eq!(paged.page, 1);
        assert_eq!(paged.rows, vec![&1, &2, &3, &4, &5]);
    }
}
