//! Sync worker: delivers saves and activity entries off the board thread.
//!
//! A dedicated thread owns the [`PersistenceSink`] and the [`JsonlWriter`].
//! The board side holds a [`SyncHandle`] feeding a bounded crossbeam channel
//! with non-blocking `try_send()`, so gesture handling is never blocked by a
//! slow backend. Saves are fire-and-forget: one attempt, failures logged.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};

use crate::board::catalog::SavePayload;
use crate::core::errors::{DashError, Result};
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

use super::sink::PersistenceSink;

/// Default bounded channel capacity.
pub const CHANNEL_CAPACITY: usize = 256;

/// How long the worker idles before trying to climb out of a degraded log.
const RECOVER_INTERVAL: Duration = Duration::from_secs(60);

/// Work items for the sync thread.
#[derive(Debug, Clone)]
pub enum SyncRequest {
    Save(SavePayload),
    Record(LogEntry),
    /// Drain what is queued before this, then stop.
    Shutdown,
}

/// Counters shared between the handle and the worker thread.
#[derive(Debug, Default)]
pub struct SyncStats {
    saves_ok: AtomicU64,
    saves_failed: AtomicU64,
    records: AtomicU64,
    dropped: AtomicU64,
    saves_dropped: AtomicU64,
}

/// Point-in-time copy of [`SyncStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounters {
    pub saves_ok: u64,
    pub saves_failed: u64,
    pub records: u64,
    /// All dropped requests, saves included.
    pub dropped: u64,
    pub saves_dropped: u64,
}

/// Drops not yet reported in the activity log.
#[derive(Debug, Default)]
struct PendingDrops {
    saves: AtomicU64,
    records: AtomicU64,
}

impl SyncStats {
    pub fn snapshot(&self) -> SyncCounters {
        SyncCounters {
            saves_ok: self.saves_ok.load(Ordering::Relaxed),
            saves_failed: self.saves_failed.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            saves_dropped: self.saves_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Cheaply-cloneable sender side.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: Sender<SyncRequest>,
    stats: Arc<SyncStats>,
    pending_drops: Arc<PendingDrops>,
}

impl SyncHandle {
    /// Queue a save. Non-blocking; dropped and counted if the queue is full.
    pub fn save(&self, payload: SavePayload) {
        self.send(SyncRequest::Save(payload));
    }

    /// Queue an activity entry. Non-blocking.
    pub fn record(&self, entry: LogEntry) {
        self.send(SyncRequest::Record(entry));
    }

    fn send(&self, request: SyncRequest) {
        if let Err(TrySendError::Full(request)) = self.tx.try_send(request) {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            if matches!(request, SyncRequest::Save(_)) {
                self.stats.saves_dropped.fetch_add(1, Ordering::Relaxed);
                self.pending_drops.saves.fetch_add(1, Ordering::Relaxed);
            } else {
                self.pending_drops.records.fetch_add(1, Ordering::Relaxed);
            }
        }
        // Disconnected is fine during shutdown.
    }

    pub fn counters(&self) -> SyncCounters {
        self.stats.snapshot()
    }
}

/// Owner of the sync thread.
pub struct SyncWorker {
    handle: SyncHandle,
    join: Option<thread::JoinHandle<()>>,
}

impl SyncWorker {
    /// Spawn the worker thread.
    pub fn spawn(
        sink: Box<dyn PersistenceSink>,
        jsonl: JsonlConfig,
        capacity: usize,
    ) -> Result<Self> {
        let (tx, rx) = bounded::<SyncRequest>(capacity.max(1));
        let stats = Arc::new(SyncStats::default());
        let pending_drops = Arc::new(PendingDrops::default());
        let handle = SyncHandle {
            tx,
            stats: Arc::clone(&stats),
            pending_drops: Arc::clone(&pending_drops),
        };

        let join = thread::Builder::new()
            .name("homedash-sync".to_string())
            .spawn(move || {
                let writer = JsonlWriter::open(jsonl);
                worker_main(&rx, sink.as_ref(), writer, &stats, &pending_drops);
            })
            .map_err(|e| DashError::Runtime {
                details: format!("failed to spawn sync thread: {e}"),
            })?;

        Ok(Self {
            handle,
            join: Some(join),
        })
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    /// Drain the queue, stop the thread and return the final counters.
    pub fn shutdown(mut self) -> SyncCounters {
        self.stop();
        self.handle.counters()
    }

    fn stop(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        // Blocking send: the shutdown marker must not be dropped.
        let _ = self.handle.tx.send(SyncRequest::Shutdown);
        if join.join().is_err() {
            eprintln!("[HD-SYNC] sync thread panicked");
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ──────────────────── worker thread ────────────────────

fn worker_main(
    rx: &Receiver<SyncRequest>,
    sink: &dyn PersistenceSink,
    mut jsonl: JsonlWriter,
    stats: &SyncStats,
    pending_drops: &PendingDrops,
) {
    loop {
        let request = match rx.recv_timeout(RECOVER_INTERVAL) {
            Ok(request) => request,
            Err(RecvTimeoutError::Timeout) => {
                if jsonl.is_degraded() {
                    jsonl.try_recover();
                }
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if let Some(warn) = backpressure_entry(pending_drops) {
            jsonl.write_entry(&warn);
        }

        match request {
            SyncRequest::Shutdown => break,
            SyncRequest::Record(entry) => {
                jsonl.write_entry(&entry);
                stats.records.fetch_add(1, Ordering::Relaxed);
            }
            SyncRequest::Save(payload) => {
                let entry = deliver(sink, &payload, stats);
                jsonl.write_entry(&entry);
            }
        }
    }

    jsonl.flush();
    jsonl.fsync();
}

/// Report and reset drops since the last report.
fn backpressure_entry(pending: &PendingDrops) -> Option<LogEntry> {
    let saves = pending.saves.swap(0, Ordering::Relaxed);
    let records = pending.records.swap(0, Ordering::Relaxed);
    if saves == 0 && records == 0 {
        return None;
    }
    let severity = if saves > 0 {
        Severity::Error
    } else {
        Severity::Warning
    };
    let mut warn = LogEntry::new(EventType::SyncBackpressure, severity);
    warn.ok = Some(saves == 0);
    warn.details = Some(format!(
        "queue full: {saves} saves and {records} activity entries dropped"
    ));
    Some(warn)
}

/// One save attempt; returns the entry describing how it went.
fn deliver(sink: &dyn PersistenceSink, payload: &SavePayload, stats: &SyncStats) -> LogEntry {
    let started = Instant::now();
    let result = sink.save(payload);
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut entry = match result {
        Ok(()) => {
            stats.saves_ok.fetch_add(1, Ordering::Relaxed);
            let mut e = LogEntry::info(EventType::SaveSucceeded);
            e.ok = Some(true);
            e
        }
        Err(error) => {
            stats.saves_failed.fetch_add(1, Ordering::Relaxed);
            eprintln!("[HD-SYNC] save failed: {error}");
            LogEntry::new(EventType::SaveFailed, Severity::Warning).with_error(&error)
        }
    };
    entry.endpoint = Some(sink.endpoint());
    entry.shortcuts = Some(payload.apps.len());
    entry.favorites = Some(payload.apps.iter().filter(|a| a.is_favorite).count());
    entry.duration_ms = Some(elapsed);
    entry
}
