//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use homedash::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{DashError, Result};

// Board
pub use crate::board::catalog::{Catalog, FAVORITES_CAP, RejectReason, SavePayload};
pub use crate::board::layout::{GridLayout, layout_for_width};
pub use crate::board::model::{BoardCmd, BoardModel, BoardMsg, Mode};
pub use crate::board::paginator::{PageView, SwipeDirection, total_pages};
pub use crate::board::reorder::{DragResult, DropLocation, DropOutcome, Zone};
pub use crate::board::runtime::BoardRuntime;
pub use crate::board::shortcut::{Shortcut, ShortcutId};
pub use crate::board::update::update;

// Sync
pub use crate::sync::sink::{PersistenceSink, ShortcutSource};
pub use crate::sync::worker::{SyncHandle, SyncWorker};

// Logging
pub use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry};
