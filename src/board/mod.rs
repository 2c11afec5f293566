//! The arrangement and layout engine.
//!
//! Leaves first: `layout` sizes the grid, `shortcut` and `catalog` hold the
//! arrangement, `paginator` slices it into pages, `reorder` applies drags.
//! `model` / `update` / `runtime` tie them into one Elm-style state machine.

pub mod catalog;
pub mod layout;
pub mod model;
pub mod paginator;
pub mod reorder;
pub mod runtime;
pub mod shortcut;
pub mod update;

#[cfg(test)]
mod test_properties;
