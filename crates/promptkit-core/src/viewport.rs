//! Scrolling window over a list that keeps the selection visible.
//!
//! Arrow navigation moves the window one step at a time so it stays stable
//! while the user walks through a list; direct jumps (first/last item,
//! page N, wrap-around) recompute the window from scratch.

use std::ops::Range;

/// One-step window adjustment.
///
/// If `selected` fell below the window the window retreats by one; if it
/// moved past the window it advances by one. The result is clamped to
/// `total - window` (or 0 when the whole list fits).
///
/// ```
/// use promptkit_core::viewport::recompute;
///
/// // moving from item 4 to item 5 with a window of 5 scrolls by one
/// assert_eq!(recompute(5, 10, 5, 0), 1);
/// // moving back above the window retreats by one
/// assert_eq!(recompute(2, 10, 5, 3), 2);
/// ```
pub fn recompute(selected: usize, total: usize, window: usize, first_visible: usize) -> usize {
    if window == 0 || total <= window {
        return 0;
    }

    let mut first = first_visible;
    if selected >= first + window {
        first += 1;
    } else if selected < first {
        first -= 1;
    }

    first.min(total - window)
}

/// Selection plus visible window over `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    selected: usize,
    first_visible: usize,
    window: usize,
    total: usize,
}

impl Viewport {
    /// Create a viewport with the first item selected.
    pub fn new(total: usize, window: usize) -> Self {
        Self {
            selected: 0,
            first_visible: 0,
            window: window.max(1),
            total,
        }
    }

    /// Create a viewport with `selected` preselected and the window positioned
    /// so that it is visible.
    pub fn with_selected(total: usize, window: usize, selected: usize) -> Self {
        let mut viewport = Self::new(total, window);
        viewport.select(selected);
        viewport
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Indices of the items currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.first_visible + self.window).min(self.total);
        self.first_visible.min(end)..end
    }

    /// Move the selection down one item, wrapping to the top after the last.
    pub fn select_next(&mut self) {
        if self.total == 0 {
            return;
        }
        if self.selected + 1 >= self.total {
            self.select_first();
        } else {
            self.selected += 1;
            self.step();
        }
    }

    /// Move the selection up one item, wrapping to the bottom before the first.
    pub fn select_previous(&mut self) {
        if self.total == 0 {
            return;
        }
        if self.selected == 0 {
            self.select_last();
        } else {
            self.selected -= 1;
            self.step();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.first_visible = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.total.saturating_sub(1);
        self.first_visible = self.total.saturating_sub(self.window);
    }

    /// Select `index` (clamped) and position the window from scratch so that
    /// it is visible, scrolling as little as possible.
    pub fn select(&mut self, index: usize) {
        if self.total == 0 {
            self.select_first();
            return;
        }
        self.selected = index.min(self.total - 1);
        if self.selected < self.first_visible {
            self.first_visible = self.selected;
        } else if self.selected >= self.first_visible + self.window {
            self.first_visible = self.selected + 1 - self.window;
        }
        self.first_visible = self.first_visible.min(self.max_first_visible());
    }

    /// Zero-based page the window currently starts on.
    pub fn page(&self) -> usize {
        self.first_visible / self.window
    }

    /// Number of pages needed to show every item.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.window)
    }

    /// Show page `page` (clamped to the last page) and select its first item.
    ///
    /// The window starts at `page * window`; on a short last page it may
    /// extend past the final item.
    pub fn jump_to_page(&mut self, page: usize) {
        let last_page = self.page_count().saturating_sub(1);
        self.first_visible = page.min(last_page) * self.window;
        self.selected = self.first_visible;
    }

    /// Move the selection to `offset` rows into the current window, clamped
    /// to the rows actually shown. The window does not move.
    pub fn select_in_window(&mut self, offset: usize) {
        let range = self.visible_range();
        if range.is_empty() {
            return;
        }
        self.selected = (range.start + offset).min(range.end - 1);
    }

    /// Selected row relative to the top of the window.
    pub fn offset_in_window(&self) -> usize {
        self.selected.saturating_sub(self.first_visible)
    }

    /// Update the item count, e.g. after filtering, keeping the selection and
    /// window inside the new bounds.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if total == 0 {
            self.select_first();
            return;
        }
        self.selected = self.selected.min(total - 1);
        if self.first_visible > self.selected {
            self.first_visible = self.selected;
        }
        self.first_visible = self.first_visible.min(self.max_first_visible());
    }

    /// Change the window size, keeping the selection visible.
    pub fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
        let selected = self.selected;
        self.select(selected);
    }

    /// Whether the window is scrolled past the first item.
    pub fn has_items_above(&self) -> bool {
        self.first_visible > 0
    }

    /// Whether items exist past the bottom of the window.
    pub fn has_items_below(&self) -> bool {
        self.first_visible + self.window < self.total
    }

    fn step(&mut self) {
        self.first_visible = recompute(self.selected, self.total, self.window, self.first_visible);
    }

    fn max_first_visible(&self) -> usize {
        self.total.saturating_sub(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recompute_one_step() {
        assert_eq!(recompute(0, 10, 5, 0), 0);
        assert_eq!(recompute(4, 10, 5, 0), 0);
        assert_eq!(recompute(5, 10, 5, 0), 1);
        assert_eq!(recompute(1, 10, 5, 2), 1);
        // a far jump still only moves one step
        assert_eq!(recompute(9, 10, 5, 0), 1);
    }

    #[test]
    fn test_recompute_clamps() {
        assert_eq!(recompute(2, 3, 5, 4), 0);
        assert_eq!(recompute(9, 10, 5, 7), 5);
        assert_eq!(recompute(0, 10, 0, 3), 0);
    }

    #[test]
    fn test_scrolls_down_one_at_a_time() {
        let mut viewport = Viewport::new(10, 3);
        viewport.select_next();
        viewport.select_next();
        assert_eq!(viewport.visible_range(), 0..3);
        viewport.select_next();
        assert_eq!(viewport.selected(), 3);
        assert_eq!(viewport.visible_range(), 1..4);
        viewport.select_next();
        assert_eq!(viewport.visible_range(), 2..5);
    }

    #[test]
    fn test_scrolling_back_up_keeps_window_until_edge() {
        let mut viewport = Viewport::with_selected(10, 3, 6);
        assert_eq!(viewport.visible_range(), 4..7);
        viewport.select_previous();
        viewport.select_previous();
        assert_eq!(viewport.visible_range(), 4..7);
        viewport.select_previous();
        assert_eq!(viewport.selected(), 3);
        assert_eq!(viewport.visible_range(), 3..6);
    }

    #[test]
    fn test_wrap_around_resets_window() {
        let mut viewport = Viewport::new(10, 3);
        viewport.select_previous();
        assert_eq!(viewport.selected(), 9);
        assert_eq!(viewport.visible_range(), 7..10);
        viewport.select_next();
        assert_eq!(viewport.selected(), 0);
        assert_eq!(viewport.visible_range(), 0..3);
    }

    #[test]
    fn test_fewer_items_than_window() {
        let mut viewport = Viewport::new(2, 5);
        viewport.select_next();
        assert_eq!(viewport.first_visible(), 0);
        assert_eq!(viewport.visible_range(), 0..2);
        assert!(!viewport.has_items_below());
    }

    #[test]
    fn test_empty_list() {
        let mut viewport = Viewport::new(0, 5);
        viewport.select_next();
        viewport.select_previous();
        viewport.select_last();
        assert_eq!(viewport.selected(), 0);
        assert_eq!(viewport.visible_range(), 0..0);
        assert!(viewport.is_empty());
    }

    #[test]
    fn test_jump_to_page() {
        let mut viewport = Viewport::new(23, 10);
        assert_eq!(viewport.page_count(), 3);
        viewport.jump_to_page(1);
        assert_eq!(viewport.first_visible(), 10);
        assert_eq!(viewport.selected(), 10);
        assert_eq!(viewport.page(), 1);
        viewport.jump_to_page(2);
        assert_eq!(viewport.visible_range(), 20..23);
        viewport.jump_to_page(99);
        assert_eq!(viewport.page(), 2);
    }

    #[test]
    fn test_select_in_window_on_short_last_page() {
        let mut viewport = Viewport::new(23, 10);
        viewport.jump_to_page(2);
        viewport.select_in_window(1);
        assert_eq!(viewport.selected(), 21);
        assert_eq!(viewport.visible_range(), 20..23);
        viewport.select_in_window(9);
        assert_eq!(viewport.selected(), 22);
        assert_eq!(viewport.offset_in_window(), 2);
        assert_eq!(viewport.first_visible(), 20);
    }

    #[test]
    fn test_set_total_after_filtering() {
        let mut viewport = Viewport::with_selected(20, 5, 15);
        viewport.set_total(4);
        assert_eq!(viewport.selected(), 3);
        assert_eq!(viewport.visible_range(), 0..4);
        viewport.set_total(0);
        assert_eq!(viewport.selected(), 0);
    }

    #[test]
    fn test_scroll_indicators() {
        let mut viewport = Viewport::new(10, 3);
        assert!(!viewport.has_items_above());
        assert!(viewport.has_items_below());
        viewport.select_last();
        assert!(viewport.has_items_above());
        assert!(!viewport.has_items_below());
    }

    #[derive(Debug, Clone)]
    enum Nav {
        Next,
        Previous,
        First,
        Last,
        Select(usize),
        Page(usize),
    }

    fn nav_strategy() -> impl Strategy<Value = Nav> {
        prop_oneof![
            4 => Just(Nav::Next),
            4 => Just(Nav::Previous),
            1 => Just(Nav::First),
            1 => Just(Nav::Last),
            1 => (0usize..60).prop_map(Nav::Select),
            1 => (0usize..8).prop_map(Nav::Page),
        ]
    }

    proptest! {
        #[test]
        fn selection_stays_visible(
            total in 0usize..50,
            window in 1usize..12,
            moves in proptest::collection::vec(nav_strategy(), 0..80),
        ) {
            let mut viewport = Viewport::new(total, window);
            for nav in moves {
                match nav {
                    Nav::Next => viewport.select_next(),
                    Nav::Previous => viewport.select_previous(),
                    Nav::First => viewport.select_first(),
                    Nav::Last => viewport.select_last(),
                    Nav::Select(i) => viewport.select(i),
                    Nav::Page(p) => viewport.jump_to_page(p),
                }
                if total > 0 {
                    prop_assert!(viewport.selected() < total);
                    prop_assert!(viewport.first_visible() <= viewport.selected());
                    prop_assert!(viewport.selected() < viewport.first_visible() + window);
                    prop_assert!(viewport.visible_range().contains(&viewport.selected()));
                }
                if total <= window {
                    prop_assert_eq!(viewport.first_visible(), 0);
                }
            }
        }

        #[test]
        fn recompute_contains_single_step(
            total in 1usize..50,
            window in 1usize..12,
            start in 0usize..50,
            down in any::<bool>(),
        ) {
            let mut viewport = Viewport::with_selected(total, window, start);
            let first = viewport.first_visible();
            let selected = viewport.selected();
            let next = if down { (selected + 1).min(total - 1) } else { selected.saturating_sub(1) };
            let new_first = recompute(next, total, window, first);
            if total >= window {
                prop_assert!(new_first <= next && next < new_first + window);
            } else {
                prop_assert_eq!(new_first, 0);
            }
            viewport.select(next);
            prop_assert!(viewport.visible_range().contains(&next));
        }
    }
}
