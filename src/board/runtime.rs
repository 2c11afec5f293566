//! Command executor for the board.
//!
//! [`BoardRuntime`] owns the model, feeds it messages through `update()` and
//! carries out the returned commands: saves and activity entries go to the
//! sync worker, launches are handed back to the caller.

#![allow(missing_docs)]

use crossbeam_channel::Receiver;

use crate::logger::jsonl::{EventType, LogEntry, Severity};
use crate::sync::worker::SyncHandle;

use super::model::{BoardCmd, BoardEvent, BoardModel, BoardMsg};
use super::reorder::DropOutcome;
use super::update::update;

/// Board model plus the handle its side-effects go through.
pub struct BoardRuntime {
    model: BoardModel,
    sync: SyncHandle,
    saves_requested: u64,
}

impl BoardRuntime {
    pub fn new(model: BoardModel, sync: SyncHandle) -> Self {
        Self {
            model,
            sync,
            saves_requested: 0,
        }
    }

    pub fn model(&self) -> &BoardModel {
        &self.model
    }

    pub fn into_model(self) -> BoardModel {
        self.model
    }

    /// Saves handed to the sync worker so far.
    pub fn saves_requested(&self) -> u64 {
        self.saves_requested
    }

    /// Apply one message and execute its commands.
    ///
    /// Returns the URL to open when the message launched a shortcut.
    pub fn dispatch(&mut self, msg: BoardMsg) -> Option<String> {
        let mut launch = None;
        for cmd in update(&mut self.model, msg).flatten() {
            match cmd {
                BoardCmd::Save(payload) => {
                    self.saves_requested += 1;
                    self.sync.save(payload);
                }
                BoardCmd::Record(event) => {
                    if let Some(entry) = event_entry(&event) {
                        self.sync.record(entry);
                    }
                }
                BoardCmd::Launch { url, .. } => launch = Some(url),
                BoardCmd::None | BoardCmd::Batch(_) => {}
            }
        }
        launch
    }

    /// Apply every message currently waiting in `inbox` (e.g. from the poller).
    pub fn drain(&mut self, inbox: &Receiver<BoardMsg>) -> usize {
        let mut applied = 0;
        while let Ok(msg) = inbox.try_recv() {
            let _ = self.dispatch(msg);
            applied += 1;
        }
        applied
    }
}

/// Activity-log line for a board event.
pub fn event_entry(event: &BoardEvent) -> Option<LogEntry> {
    let entry = match event {
        BoardEvent::Loaded {
            shortcuts,
            favorites,
        } => {
            let mut e = LogEntry::info(EventType::BoardLoaded);
            e.shortcuts = Some(*shortcuts);
            e.favorites = Some(*favorites);
            e
        }
        BoardEvent::FetchFailed { code, message } => {
            let mut e = LogEntry::new(EventType::FetchFailed, Severity::Warning);
            e.ok = Some(false);
            e.error_code = Some(code.clone());
            e.error_message = Some(message.clone());
            e
        }
        BoardEvent::Unlocked => LogEntry::info(EventType::SessionUnlocked),
        BoardEvent::Locked { shortcuts } => {
            let mut e = LogEntry::info(EventType::SessionLocked);
            e.shortcuts = Some(*shortcuts);
            e
        }
        BoardEvent::Drop { outcome } => match outcome {
            DropOutcome::Applied { id, kind } => {
                let mut e = LogEntry::info(EventType::DropApplied);
                e.shortcut_id = Some(*id);
                e.kind = Some(kind.label().to_string());
                e
            }
            DropOutcome::Rejected(reason) => {
                let mut e = LogEntry::info(EventType::DropRejected);
                e.kind = Some(reason.label().to_string());
                e
            }
            DropOutcome::Ignored => return None,
        },
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::catalog::RejectReason;
    use crate::board::reorder::{DragResult, DropLocation, MoveKind};
    use crate::board::shortcut::Shortcut;
    use crate::logger::jsonl::{JsonlConfig, read_entries};
    use crate::sync::sink::RecordingSink;
    use crate::sync::worker::{CHANNEL_CAPACITY, SyncWorker};

    fn records() -> Vec<Shortcut> {
        ["Sonarr", "Radarr", "Plex"]
            .iter()
            .zip(1_u32..)
            .map(|(name, id)| {
                let mut s = Shortcut::new(id, *name, format!("http://{}.lan", name.to_lowercase()));
                s.app_order = i64::from(id);
                s
            })
            .collect()
    }

    #[test]
    fn edit_session_saves_once_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("activity.jsonl");
        let sink = RecordingSink::new();
        let worker = SyncWorker::spawn(
            Box::new(sink.clone()),
            JsonlConfig::for_path(&log),
            CHANNEL_CAPACITY,
        )
        .unwrap();

        let mut runtime = BoardRuntime::new(BoardModel::with_width(1200), worker.handle());
        runtime.dispatch(BoardMsg::ShortcutsFetched(records()));
        runtime.dispatch(BoardMsg::ToggleLock);
        runtime.dispatch(BoardMsg::DragStart);
        runtime.dispatch(BoardMsg::DragEnd(DragResult {
            source: DropLocation::row(0, 2),
            destination: Some(DropLocation::favorites(0)),
        }));
        runtime.dispatch(BoardMsg::ToggleLock);
        assert_eq!(runtime.saves_requested(), 1);
        worker.shutdown();

        assert_eq!(sink.save_count(), 1);
        let payload = sink.last().unwrap();
        assert_eq!(payload.apps[0].id, 3);
        assert!(payload.apps[0].is_favorite);

        let events: Vec<EventType> = read_entries(&log)
            .unwrap()
            .iter()
            .map(|e| e.event)
            .collect();
        assert_eq!(
            events,
            vec![
                EventType::BoardLoaded,
                EventType::SessionUnlocked,
                EventType::DropApplied,
                EventType::SessionLocked,
                EventType::SaveSucceeded,
            ]
        );
    }

    #[test]
    fn launch_returned_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let worker = SyncWorker::spawn(
            Box::new(RecordingSink::new()),
            JsonlConfig::for_path(dir.path().join("a.jsonl")),
            CHANNEL_CAPACITY,
        )
        .unwrap();
        let mut runtime = BoardRuntime::new(BoardModel::new(), worker.handle());
        runtime.dispatch(BoardMsg::ShortcutsFetched(records()));
        assert_eq!(
            runtime.dispatch(BoardMsg::Activate(3)).as_deref(),
            Some("http://plex.lan/web")
        );
        assert_eq!(runtime.dispatch(BoardMsg::Activate(1)).as_deref(), Some("http://sonarr.lan"));
    }

    #[test]
    fn drain_applies_queued_messages() {
        let dir = tempfile::tempdir().unwrap();
        let worker = SyncWorker::spawn(
            Box::new(RecordingSink::new()),
            JsonlConfig::for_path(dir.path().join("a.jsonl")),
            CHANNEL_CAPACITY,
        )
        .unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(BoardMsg::ShortcutsFetched(records())).unwrap();
        tx.send(BoardMsg::Resize { width: 600 }).unwrap();
        let mut runtime = BoardRuntime::new(BoardModel::new(), worker.handle());
        assert_eq!(runtime.drain(&rx), 2);
        assert!(runtime.model().is_loaded());
        assert_eq!(runtime.model().layout.columns, 2);
    }

    #[test]
    fn drop_events_map_to_entries() {
        let applied = event_entry(&BoardEvent::Drop {
            outcome: DropOutcome::Applied {
                id: 4,
                kind: MoveKind::FromFavorites,
            },
        })
        .unwrap();
        assert_eq!(applied.event, EventType::DropApplied);
        assert_eq!(applied.kind.as_deref(), Some("from_favorites"));

        let rejected = event_entry(&BoardEvent::Drop {
            outcome: DropOutcome::Rejected(RejectReason::FavoritesFull),
        })
        .unwrap();
        assert_eq!(rejected.kind.as_deref(), Some("favorites_full"));

        assert!(
            event_entry(&BoardEvent::Drop {
                outcome: DropOutcome::Ignored
            })
            .is_none()
        );
    }
}
