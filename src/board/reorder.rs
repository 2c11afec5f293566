//! Drag-and-drop reconciliation.
//!
//! The gesture provider identifies drop targets with string ids (`"row-3"`,
//! `"favorites"`). They are decoded once into [`Zone`] at the boundary; from
//! there on, drop handling is pure index arithmetic over the [`Catalog`].

use std::fmt;
use std::str::FromStr;

use crate::core::errors::DashError;

use super::catalog::{Catalog, RejectReason};
use super::layout::{GridLayout, absolute_index};
use super::shortcut::ShortcutId;

const FAVORITES_ZONE_ID: &str = "favorites";
const ROW_ZONE_PREFIX: &str = "row-";

/// A drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// A grid row on the current page (0-indexed).
    Row(usize),
    /// The favorites strip.
    Favorites,
}

impl Zone {
    /// Decode a droppable id.
    pub fn from_droppable_id(raw: &str) -> Result<Self, DashError> {
        if raw == FAVORITES_ZONE_ID {
            return Ok(Self::Favorites);
        }
        let Some(rest) = raw.strip_prefix(ROW_ZONE_PREFIX) else {
            return Err(DashError::InvalidZone {
                raw: raw.to_string(),
                details: "expected \"favorites\" or \"row-<n>\"".to_string(),
            });
        };
        rest.parse::<usize>()
            .map(Self::Row)
            .map_err(|error| DashError::InvalidZone {
                raw: raw.to_string(),
                details: error.to_string(),
            })
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "{ROW_ZONE_PREFIX}{row}"),
            Self::Favorites => f.write_str(FAVORITES_ZONE_ID),
        }
    }
}

impl FromStr for Zone {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_droppable_id(s)
    }
}

/// A position within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropLocation {
    pub zone: Zone,
    pub index: usize,
}

impl DropLocation {
    #[must_use]
    pub const fn new(zone: Zone, index: usize) -> Self {
        Self { zone, index }
    }

    #[must_use]
    pub const fn row(row: usize, index: usize) -> Self {
        Self::new(Zone::Row(row), index)
    }

    #[must_use]
    pub const fn favorites(index: usize) -> Self {
        Self::new(Zone::Favorites, index)
    }
}

impl fmt::Display for DropLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.zone, self.index)
    }
}

/// Parses `"<zone>:<index>"`, e.g. `row-0:2` or `favorites:1`.
impl FromStr for DropLocation {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((zone, index)) = s.rsplit_once(':') else {
            return Err(DashError::InvalidZone {
                raw: s.to_string(),
                details: "expected <zone>:<index>".to_string(),
            });
        };
        let zone = Zone::from_droppable_id(zone.trim())?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|error| DashError::InvalidZone {
                raw: s.to_string(),
                details: error.to_string(),
            })?;
        Ok(Self { zone, index })
    }
}

/// End-of-gesture report from the drag provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    pub source: DropLocation,
    /// `None` when the item was released outside every zone.
    pub destination: Option<DropLocation>,
}

/// What a drop did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The catalog changed; `id` is the shortcut that moved.
    Applied { id: ShortcutId, kind: MoveKind },
    /// A recognised move that was refused; the catalog is unchanged.
    Rejected(RejectReason),
    /// Nothing to do: no destination, or an undefined zone pairing.
    Ignored,
}

/// The three defined move shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Reorder,
    ToFavorites,
    FromFavorites,
}

impl MoveKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reorder => "reorder",
            Self::ToFavorites => "to_favorites",
            Self::FromFavorites => "from_favorites",
        }
    }
}

/// Grid coordinates needed to turn a row position into an absolute index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub page: usize,
    pub layout: GridLayout,
}

impl GridPosition {
    /// Absolute index of a row cell; `None` when it overflows.
    #[must_use]
    pub const fn absolute(self, row: usize, index: usize) -> Option<usize> {
        absolute_index(
            self.page,
            row,
            index,
            self.layout.items_per_page,
            self.layout.columns,
        )
    }
}

/// Apply one finished drag to the catalog.
///
/// `search` is the active search text; row positions index the filtered view.
pub fn apply_drop(
    catalog: &mut Catalog,
    grid: GridPosition,
    search: &str,
    result: DragResult,
) -> DropOutcome {
    let Some(destination) = result.destination else {
        return DropOutcome::Ignored;
    };

    let (kind, moved) = match (result.source.zone, destination.zone) {
        (Zone::Row(src_row), Zone::Row(dst_row)) => {
            let Some(from) = grid.absolute(src_row, result.source.index) else {
                return DropOutcome::Rejected(RejectReason::SourceMissing);
            };
            let to = grid.absolute(dst_row, destination.index).unwrap_or(usize::MAX);
            (MoveKind::Reorder, catalog.reorder(search, from, to))
        }
        (Zone::Row(src_row), Zone::Favorites) => {
            let Some(from) = grid.absolute(src_row, result.source.index) else {
                return DropOutcome::Rejected(RejectReason::SourceMissing);
            };
            (
                MoveKind::ToFavorites,
                catalog.move_to_favorites(search, from, destination.index),
            )
        }
        (Zone::Favorites, Zone::Row(dst_row)) => {
            // Past the end of the grid: append after the last shortcut.
            let to = grid.absolute(dst_row, destination.index).unwrap_or(usize::MAX);
            (
                MoveKind::FromFavorites,
                catalog.move_from_favorites(search, result.source.index, to),
            )
        }
        (Zone::Favorites, Zone::Favorites) => return DropOutcome::Ignored,
    };

    match moved {
        Ok(id) => DropOutcome::Applied { id, kind },
        Err(reason) => DropOutcome::Rejected(reason),
    }
}
