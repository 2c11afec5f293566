//! Elm-style state model for the shortcut board.
//!
//! All arrangement and navigation state lives in [`BoardModel`]. Gestures and
//! fetch results arrive as [`BoardMsg`] values; side-effects are represented as
//! [`BoardCmd`] values returned from [`super::update::update`].
//!
//! No I/O happens here; the model is deterministic.

#![allow(missing_docs)]

use super::catalog::{Catalog, SavePayload};
use super::layout::{GridLayout, layout_for_width};
use super::paginator::{PageView, SwipeDirection, clamp_page, total_pages};
use super::reorder::{DragResult, DropOutcome, GridPosition};
use super::shortcut::{Shortcut, ShortcutId};

// ──────────────────── mode ────────────────────

/// Lock state of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Locked: activating a shortcut launches it, dragging is disabled.
    #[default]
    Browse,
    /// Unlocked: shortcuts can be dragged, launching is disabled.
    Edit,
}

impl Mode {
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Browse)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Browse => Self::Edit,
            Self::Edit => Self::Browse,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Edit => "edit",
        }
    }
}

// ──────────────────── messages ────────────────────

/// Everything that can happen to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMsg {
    /// A fetch of shortcut records resolved.
    ///
    /// The first one seeds the catalog; later ones only refresh status.
    ShortcutsFetched(Vec<Shortcut>),
    /// A fetch failed. The board stays in whatever state it was in.
    FetchFailed { code: String, message: String },
    /// Viewport width changed (also sent once at mount).
    Resize { width: u32 },
    /// Search box contents changed.
    SetSearch(String),
    /// Page indicator clicked (1-indexed).
    SetPage(usize),
    /// Horizontal swipe over the grid.
    Swipe {
        direction: SwipeDirection,
        velocity: f64,
    },
    /// Drag gesture started.
    DragStart,
    /// Drag gesture finished.
    DragEnd(DragResult),
    /// Lock button pressed.
    ToggleLock,
    /// Shortcut clicked.
    Activate(ShortcutId),
}

// ──────────────────── commands ────────────────────

/// Side-effects requested by the update function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCmd {
    /// No side-effect.
    None,
    /// Persist the arrangement (fire-and-forget).
    Save(SavePayload),
    /// Open a URL in a new browsing context.
    Launch { id: ShortcutId, url: String },
    /// Record an activity event.
    Record(BoardEvent),
    /// Several commands in order.
    Batch(Vec<BoardCmd>),
}

impl BoardCmd {
    /// Flatten nested batches into a plain list, dropping `None`.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

/// Activity the runtime should log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Loaded { shortcuts: usize, favorites: usize },
    FetchFailed { code: String, message: String },
    Unlocked,
    Locked { shortcuts: usize },
    Drop { outcome: DropOutcome },
}

// ──────────────────── model ────────────────────

/// Catalog plus navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardModel {
    /// `None` until the first successful fetch ("loading").
    pub catalog: Option<Catalog>,
    pub search: String,
    /// 1-indexed.
    pub current_page: usize,
    pub layout: GridLayout,
    pub mode: Mode,
    pub dragging: bool,
    /// Result of the most recent finished drag, for feedback.
    pub last_drop: Option<DropOutcome>,
    pub fetch_errors: u64,
    pub status_refreshes: u64,
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: None,
            search: String::new(),
            current_page: 1,
            layout: GridLayout::default(),
            mode: Mode::Browse,
            dragging: false,
            last_drop: None,
            fetch_errors: 0,
            status_refreshes: 0,
        }
    }

    /// Model for a known viewport width.
    #[must_use]
    pub fn with_width(width: u32) -> Self {
        Self {
            layout: layout_for_width(width),
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.mode.is_locked()
    }

    /// Search-filtered, non-favorite shortcuts.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Shortcut> {
        self.catalog
            .as_ref()
            .map_or_else(Vec::new, |c| c.filtered(&self.search))
    }

    #[must_use]
    pub fn favorites(&self) -> &[Shortcut] {
        self.catalog.as_ref().map_or(&[], Catalog::favorites)
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.layout.items_per_page)
    }

    /// Current grid coordinates, for turning row positions into indices.
    #[must_use]
    pub const fn grid_position(&self) -> GridPosition {
        GridPosition {
            page: self.current_page,
            layout: self.layout,
        }
    }

    /// Rows of the current page as owned shortcut lists.
    ///
    /// Includes trailing empty rows exactly as the grid renders them.
    #[must_use]
    pub fn page_rows(&self) -> Vec<Vec<Shortcut>> {
        let filtered = self.filtered();
        let view = PageView::new(&filtered, self.layout, self.current_page);
        view.rows()
            .map(|row| view.items_for_row(row).iter().map(|s| (*s).clone()).collect())
            .collect()
    }

    /// Whether the favorites strip shows its "add" placeholder.
    #[must_use]
    pub fn shows_add_slot(&self) -> bool {
        self.mode == Mode::Edit
            && self
                .catalog
                .as_ref()
                .is_some_and(Catalog::has_free_favorite_slot)
    }

    /// Pull `current_page` back into range after the page count shrank.
    pub(crate) fn clamp_current_page(&mut self) {
        self.current_page = clamp_page(self.current_page, self.total_pages());
    }
}
