//! Grid paginator: pages of rows × columns over the filtered catalog.
//!
//! A [`PageView`] borrows the filtered sequence and answers "what goes where"
//! for one page. An out-of-range page yields empty rows instead of panicking.

#![allow(missing_docs)]

use super::layout::{GridLayout, absolute_index};

/// Minimum swipe velocity that turns a swipe into a page change.
pub const SWIPE_VELOCITY_THRESHOLD: f64 = 0.5;

/// Horizontal swipe direction reported by the gesture provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moves left: advance to the next page.
    Left,
    /// Finger moves right: go back one page.
    Right,
}

/// Number of pages needed for `len` items; never less than one.
#[must_use]
pub const fn total_pages(len: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    let pages = len.div_ceil(items_per_page);
    if pages == 0 { 1 } else { pages }
}

/// Clamp a requested page into `1..=total`.
#[must_use]
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Page reached by a swipe, or `None` when the swipe does not navigate.
///
/// Swipes are suppressed during a drag and below the velocity threshold.
#[must_use]
pub fn page_after_swipe(
    current: usize,
    total: usize,
    direction: SwipeDirection,
    velocity: f64,
    dragging: bool,
) -> Option<usize> {
    if dragging || velocity <= SWIPE_VELOCITY_THRESHOLD {
        return None;
    }
    Some(match direction {
        SwipeDirection::Left => (current + 1).min(total.max(1)),
        SwipeDirection::Right => current.saturating_sub(1).max(1),
    })
}

/// One page of the grid.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a, T> {
    items: &'a [T],
    layout: GridLayout,
    page: usize,
}

impl<'a, T> PageView<'a, T> {
    #[must_use]
    pub const fn new(items: &'a [T], layout: GridLayout, page: usize) -> Self {
        Self {
            items,
            layout,
            page,
        }
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.layout.items_per_page)
    }

    /// Row indices to render.
    ///
    /// Enough rows for the whole filtered sequence, capped at one page's worth.
    /// The count does not depend on the current page, so the last page may
    /// carry trailing empty rows.
    #[must_use]
    pub fn rows(&self) -> std::ops::Range<usize> {
        let needed = self.items.len().div_ceil(self.layout.columns);
        0..needed.min(self.layout.rows_per_page())
    }

    /// Shortcuts in one row of the current page.
    #[must_use]
    pub fn items_for_row(&self, row: usize) -> &'a [T] {
        let Some(start) = absolute_index(
            self.page,
            row,
            0,
            self.layout.items_per_page,
            self.layout.columns,
        ) else {
            return &[];
        };
        if start >= self.items.len() {
            return &[];
        }
        let end = start.saturating_add(self.layout.columns).min(self.items.len());
        &self.items[start..end]
    }

    /// Every item on the current page, row after row.
    #[must_use]
    pub fn items(&self) -> Vec<&'a T> {
        self.rows()
            .flat_map(|row| self.items_for_row(row).iter())
            .collect()
    }

    /// Rows of the current page that actually hold shortcuts.
    #[must_use]
    pub fn occupied_rows(&self) -> Vec<&'a [T]> {
        self.rows()
            .map(|row| self.items_for_row(row))
            .filter(|row| !row.is_empty())
            .collect()
    }
}
