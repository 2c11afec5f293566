//! Backend seams: where shortcut records come from and where saves go.

#![allow(missing_docs)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::board::catalog::SavePayload;
use crate::board::shortcut::Shortcut;
use crate::core::errors::{DashError, Result};

/// Destination of the arrangement written when an edit session ends.
pub trait PersistenceSink: Send {
    /// Write the whole arrangement. Called at most once per edit session.
    fn save(&self, payload: &SavePayload) -> Result<()>;

    /// Human-readable target for logs (URL or file path).
    fn endpoint(&self) -> String;
}

/// Provider of shortcut records for the bootstrap fetch and later polls.
pub trait ShortcutSource: Send {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>>;
}

impl<T: PersistenceSink + ?Sized> PersistenceSink for Box<T> {
    fn save(&self, payload: &SavePayload) -> Result<()> {
        (**self).save(payload)
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}

impl<T: ShortcutSource + ?Sized> ShortcutSource for Box<T> {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>> {
        (**self).fetch_shortcuts()
    }
}

/// In-memory sink that keeps every payload it receives.
///
/// Clones share the same buffer, so one clone can be handed to the sync
/// worker while another is inspected. Used by `homedash move --dry-run` and
/// by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    saved: Arc<Mutex<Vec<SavePayload>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with a backend error.
    pub fn fail_with(&self, details: impl Into<String>) {
        *self.failure.lock() = Some(details.into());
    }

    pub fn saved(&self) -> Vec<SavePayload> {
        self.saved.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn last(&self) -> Option<SavePayload> {
        self.saved.lock().last().cloned()
    }
}

impl PersistenceSink for RecordingSink {
    fn save(&self, payload: &SavePayload) -> Result<()> {
        if let Some(details) = self.failure.lock().clone() {
            return Err(DashError::backend(self.endpoint(), details));
        }
        self.saved.lock().push(payload.clone());
        Ok(())
    }

    fn endpoint(&self) -> String {
        "memory".to_string()
    }
}

/// Fixed list of records, served on every fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Arc<Mutex<Vec<Shortcut>>>,
}

impl StaticSource {
    pub fn new(records: Vec<Shortcut>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Replace what later fetches return.
    pub fn replace(&self, records: Vec<Shortcut>) {
        *self.records.lock() = records;
    }
}

impl ShortcutSource for StaticSource {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>> {
        Ok(self.records.lock().clone())
    }
}
