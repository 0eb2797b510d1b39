//! Fixed-size pages over an ordered list.

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Page numbers for a numbered pager, `1..=total_pages`.
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages for `len` items; at least one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Clamp a 1-indexed page number into `[1, total_pages]`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(len, page_size))
}

/// Slice `list` into page `page` of size `page_size`.
///
/// Out-of-range page numbers are clamped; a page size of 0 is treated as 1.
pub fn paginate<T: Clone>(list: &[T], page_size: usize, page: usize) -> Page<T> {
    let size = page_size.max(1);
    let total_pages = total_pages(list.len(), size);
    let current_page = page.clamp(1, total_pages);
    let start = (current_page - 1) * size;
    let end = (start + size).min(list.len());
    let items = list.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        total_pages,
        current_page,
        total_items: list.len(),
    }
}

/// Current page of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Re-establish `current` within bounds for a list of `len` items.
    pub fn clamp(&mut self, len: usize) {
        self.current = clamp_page(self.current, len, self.page_size);
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.current >= total_pages(len, self.page_size) {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one page. Returns false at page 1.
    pub fn previous(&mut self) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to a page. Out-of-range targets are ignored.
    pub fn jump_to(&mut self, page: usize, len: usize) -> bool {
        if page < 1 || page > total_pages(len, self.page_size) {
            return false;
        }
        self.current = page;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_items_page_size_six() {
        let list: Vec<u32> = (1..=10).collect();
        let first = paginate(&list, 6, 1);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = paginate(&list, 6, 2);
        assert_eq!(second.items, vec![7, 8, 9, 10]);
        assert_eq!(second.current_page, 2);
        assert!(!second.has_next());
        assert_eq!(second.page_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_empty_list() {
        let list: Vec<u32> = Vec::new();
        let page = paginate(&list, 6, 1);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_page_clamped() {
        let list: Vec<u32> = (1..=10).collect();
        assert_eq!(paginate(&list, 6, 0).current_page, 1);
        let page = paginate(&list, 6, 99);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items.len(), 4);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let list = vec!["a", "b", "c"];
        let page = paginate(&list, 0, 2);
        assert_eq!(page.items, vec!["b"]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_pages_cover_list_exactly() {
        for len in 0..=20usize {
            for size in 1..=7usize {
                let list: Vec<usize> = (0..len).collect();
                let pages = total_pages(len, size);
                let mut seen = Vec::new();
                for p in 1..=pages {
                    let page = paginate(&list, size, p);
                    assert!(page.current_page >= 1 && page.current_page <= page.total_pages);
                    seen.extend(page.items);
                }
                assert_eq!(seen, list, "len={len} size={size}");
            }
        }
    }

    #[test]
    fn test_page_state_navigation_bounds() {
        let mut state = PageState::new(6);
        assert!(!state.previous());
        assert!(state.next(10));
        assert_eq!(state.current(), 2);
        assert!(!state.next(10));
        assert_eq!(state.current(), 2);

        assert!(!state.jump_to(3, 10));
        assert!(!state.jump_to(0, 10));
        assert!(state.jump_to(1, 10));
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_page_state_clamp_after_shrink() {
        let mut state = PageState::new(5);
        assert!(state.jump_to(3, 12));
        state.clamp(6);
        assert_eq!(state.current(), 2);
        state.clamp(0);
        assert_eq!(state.current(), 1);
    }
}
