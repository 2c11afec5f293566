#![forbid(unsafe_code)]

//! homedash: arrangement and layout engine for a home-lab dashboard.
//!
//! The board is a grid of service shortcuts with a favorites strip capped at
//! five entries. Layout follows the viewport width, the grid is paginated,
//! shortcuts are rearranged by drag-and-drop while the board is unlocked, and
//! the arrangement is saved once when the edit session is locked again.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use homedash::prelude::*;
//!
//! let mut model = BoardModel::with_width(800);
//! let _ = update(&mut model, BoardMsg::ShortcutsFetched(Vec::new()));
//! assert_eq!(model.layout.columns, 3);
//! ```

pub mod prelude;

pub mod board;
pub mod core;
pub mod logger;
pub mod store;
pub mod sync;
