//! Responsive grid sizing and the shared page/row/column index arithmetic.
//!
//! The grid shape is a pure function of the current viewport width. There is
//! no hysteresis: every resize recomputes from scratch.

#![allow(missing_docs)]

/// Widths at or below this get the narrow grid.
pub const NARROW_MAX_WIDTH: u32 = 640;
/// Widths at or below this (and above narrow) get the medium grid.
pub const MEDIUM_MAX_WIDTH: u32 = 1024;

/// Width band selected from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutClass {
    Narrow,
    Medium,
    Wide,
}

/// Grid shape for one width band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub items_per_page: usize,
}

impl GridLayout {
    #[must_use]
    pub const fn new(columns: usize, items_per_page: usize) -> Self {
        Self {
            columns,
            items_per_page,
        }
    }

    /// Maximum number of rows a single page can hold.
    #[must_use]
    pub const fn rows_per_page(self) -> usize {
        self.items_per_page.div_ceil(self.columns)
    }
}

impl Default for GridLayout {
    /// The wide grid, used until the first viewport measurement arrives.
    fn default() -> Self {
        layout_for_class(LayoutClass::Wide)
    }
}

/// Classify a viewport width into a band.
#[must_use]
pub const fn classify_width(width: u32) -> LayoutClass {
    if width <= NARROW_MAX_WIDTH {
        LayoutClass::Narrow
    } else if width <= MEDIUM_MAX_WIDTH {
        LayoutClass::Medium
    } else {
        LayoutClass::Wide
    }
}

#[must_use]
pub const fn layout_for_class(class: LayoutClass) -> GridLayout {
    match class {
        LayoutClass::Narrow => GridLayout::new(2, 6),
        LayoutClass::Medium => GridLayout::new(3, 9),
        LayoutClass::Wide => GridLayout::new(5, 10),
    }
}

/// Grid shape for a viewport width.
#[must_use]
pub const fn layout_for_width(width: u32) -> GridLayout {
    layout_for_class(classify_width(width))
}

/// Position of a grid cell within the full filtered (un-paginated) sequence.
///
/// `page` is 1-indexed; `row` and `col` are 0-indexed within the page. A
/// `page` of 0 is treated as page 1. `None` when the index does not fit in a
/// `usize`; such a cell can never hold a shortcut.
#[must_use]
pub const fn absolute_index(
    page: usize,
    row: usize,
    col: usize,
    items_per_page: usize,
    columns: usize,
) -> Option<usize> {
    let Some(page_start) = page.saturating_sub(1).checked_mul(items_per_page) else {
        return None;
    };
    let Some(row_start) = row.checked_mul(columns) else {
        return None;
    };
    let Some(start) = page_start.checked_add(row_start) else {
        return None;
    };
    start.checked_add(col)
}
