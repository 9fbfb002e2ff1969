//! Fixed-size pagination over a filtered record set.

use serde::{Deserialize, Serialize};

/// Records per page on the accounting-operations screen.
pub const OPERATIONS_PAGE_SIZE: usize = 100;

/// Records per page on the stock-management screen.
pub const STOCK_PAGE_SIZE: usize = 50;

/// A bounded window over a filtered collection.
///
/// Pages are 1-based. The page count is at least 1 even for an empty set:
/// an empty page is a valid rendered state, not an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    page_size: usize,
    current: u32,
}

impl Pager {
    /// Create a pager on page 1. A zero `page_size` is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current 1-based page number.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// `max(1, ceil(filtered_count / page_size))`.
    pub fn total_pages(&self, filtered_count: usize) -> u32 {
        filtered_count.div_ceil(self.page_size).max(1) as u32
    }

    /// Jump to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: u32, filtered_count: usize) {
        self.current = n.clamp(1, self.total_pages(filtered_count));
    }

    /// Advance one page, saturating at the last page.
    pub fn next_page(&mut self, filtered_count: usize) {
        self.set_page(self.current.saturating_add(1), filtered_count);
    }

    /// Go back one page, saturating at page 1.
    pub fn previous_page(&mut self, filtered_count: usize) {
        self.set_page(self.current.saturating_sub(1), filtered_count);
    }

    /// Back to page 1. Called whenever a filter criterion changes.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Re-clamp the current page after the filtered set changed size.
    pub fn clamp(&mut self, filtered_count: usize) {
        self.set_page(self.current, filtered_count);
    }

    /// The current page's window of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current as usize - 1).saturating_mul(self.page_size);
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn total_pages_is_at_least_one_even_when_empty() {
        let pager = Pager::new(100);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(100), 1);
        assert_eq!(pager.total_pages(101), 2);
    }

    #[test]
    fn hundred_and_fifty_records_split_into_two_pages() {
        let items: Vec<u32> = (0..150).collect();
        let mut pager = Pager::new(100);

        assert_eq!(pager.total_pages(items.len()), 2);
        assert_eq!(pager.slice(&items).len(), 100);

        pager.next_page(items.len());
        assert_eq!(pager.current(), 2);
        assert_eq!(pager.slice(&items).len(), 50);
    }

    #[test]
    fn set_page_clamps_into_bounds() {
        let mut pager = Pager::new(100);
        pager.set_page(9, 150);
        assert_eq!(pager.current(), 2);
        pager.set_page(0, 150);
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut pager = Pager::new(100);
        pager.previous_page(150);
        assert_eq!(pager.current(), 1);

        pager.next_page(150);
        pager.next_page(150);
        pager.next_page(150);
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn clamp_pulls_the_page_back_after_the_set_shrinks() {
        let mut pager = Pager::new(100);
        pager.set_page(2, 150);
        pager.clamp(40);
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn empty_page_slice_is_empty_not_a_panic() {
        let pager = Pager::new(100);
        let items: Vec<u32> = Vec::new();
        assert!(pager.slice(&items).is_empty());
    }

    #[test]
    fn zero_page_size_is_bumped_to_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.total_pages(3), 3);
    }

    proptest! {
        /// Property: `total_pages == max(1, ceil(count / size))` and the
        /// concatenation of every page is the original collection.
        #[test]
        fn pages_tile_the_collection(count in 0usize..500, size in 1usize..130) {
            let items: Vec<usize> = (0..count).collect();
            let mut pager = Pager::new(size);

            let expected = count.div_ceil(size).max(1) as u32;
            prop_assert_eq!(pager.total_pages(count), expected);

            let mut rebuilt = Vec::new();
            for page in 1..=pager.total_pages(count) {
                pager.set_page(page, count);
                rebuilt.extend_from_slice(pager.slice(&items));
            }
            prop_assert_eq!(rebuilt, items);
        }
    }
}
