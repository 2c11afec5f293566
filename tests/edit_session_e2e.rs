//! End-to-end edit sessions: poller → runtime → sync worker → sink.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, unbounded};

use homedash::board::model::{BoardModel, BoardMsg, Mode};
use homedash::board::reorder::{DragResult, DropLocation};
use homedash::board::runtime::BoardRuntime;
use homedash::board::shortcut::Shortcut;
use homedash::logger::jsonl::{EventType, JsonlConfig, read_entries};
use homedash::sync::poller::Poller;
use homedash::sync::sink::{RecordingSink, StaticSource};
use homedash::sync::worker::{CHANNEL_CAPACITY, SyncWorker};

fn records(count: u32) -> Vec<Shortcut> {
    (1..=count)
        .map(|id| {
            let mut s = Shortcut::new(id, format!("svc{id}"), format!("http://svc{id}.lan"));
            s.app_order = i64::from(id);
            s.status = 200;
            s
        })
        .collect()
}

fn wait_for(
    runtime: &mut BoardRuntime,
    inbox: &Receiver<BoardMsg>,
    done: impl Fn(&BoardModel) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(runtime.model()) {
        assert!(Instant::now() < deadline, "timed out waiting for poller");
        if let Ok(msg) = inbox.recv_timeout(Duration::from_millis(50)) {
            runtime.dispatch(msg);
        }
    }
}

fn drag(from: DropLocation, to: DropLocation) -> BoardMsg {
    BoardMsg::DragEnd(DragResult {
        source: from,
        destination: Some(to),
    })
}

#[test]
fn polled_status_does_not_disturb_an_edit_session() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("activity.jsonl");
    let sink = RecordingSink::new();
    let worker = SyncWorker::spawn(
        Box::new(sink.clone()),
        JsonlConfig::for_path(&log),
        CHANNEL_CAPACITY,
    )
    .unwrap();

    let source = StaticSource::new(records(12));
    let (tx, rx) = unbounded();
    let poller = Poller::spawn(Box::new(source.clone()), Duration::from_millis(20), tx).unwrap();

    let mut runtime = BoardRuntime::new(BoardModel::with_width(800), worker.handle());
    wait_for(&mut runtime, &rx, BoardModel::is_loaded);
    assert_eq!(runtime.model().layout.columns, 3);
    assert_eq!(runtime.model().total_pages(), 2);

    runtime.dispatch(BoardMsg::ToggleLock);
    assert_eq!(runtime.model().mode, Mode::Edit);
    runtime.dispatch(BoardMsg::DragStart);
    runtime.dispatch(drag(DropLocation::row(1, 1), DropLocation::favorites(0)));
    runtime.dispatch(BoardMsg::DragStart);
    runtime.dispatch(drag(DropLocation::row(0, 0), DropLocation::row(2, 2)));

    // The backend now reports svc1 as down with stale flags; only status moves.
    let mut stale = records(12);
    stale[0].status = 503;
    stale[4].is_favorite = false;
    source.replace(stale);
    wait_for(&mut runtime, &rx, |m| {
        m.catalog
            .as_ref()
            .and_then(|c| c.get(1))
            .is_some_and(|s| s.status == 503)
    });

    let model = runtime.model();
    assert_eq!(model.favorites().len(), 1);
    assert_eq!(model.favorites()[0].id, 5);
    let order: Vec<u32> = model.filtered().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![2, 3, 4, 6, 7, 8, 9, 10, 1, 11, 12]);
    assert_eq!(sink.save_count(), 0, "nothing saved while editing");

    runtime.dispatch(BoardMsg::ToggleLock);
    assert!(poller.stop() >= 2);
    let counters = worker.shutdown();
    assert_eq!(counters.saves_ok, 1);

    let payload = sink.last().unwrap();
    assert_eq!(payload.apps[0].id, 5);
    assert!(payload.apps[0].is_favorite);
    assert_eq!(payload.apps[0].app_order, 0);
    let rest: Vec<(u32, i64)> = payload.apps[1..]
        .iter()
        .map(|a| (a.id, a.app_order))
        .collect();
    assert_eq!(rest[0], (2, 0));
    assert_eq!(rest[8], (1, 8));
    assert_eq!(rest.len(), 11);

    let events: Vec<EventType> = read_entries(&log).unwrap().iter().map(|e| e.event).collect();
    assert_eq!(events.first(), Some(&EventType::BoardLoaded));
    assert_eq!(
        events.iter().filter(|e| **e == EventType::DropApplied).count(),
        2
    );
    assert_eq!(events.last(), Some(&EventType::SaveSucceeded));
}

#[test]
fn failed_save_is_logged_and_board_keeps_arrangement() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("activity.jsonl");
    let sink = RecordingSink::new();
    sink.fail_with("503 Service Unavailable");
    let worker = SyncWorker::spawn(
        Box::new(sink.clone()),
        JsonlConfig::for_path(&log),
        CHANNEL_CAPACITY,
    )
    .unwrap();

    let mut runtime = BoardRuntime::new(BoardModel::new(), worker.handle());
    runtime.dispatch(BoardMsg::ShortcutsFetched(records(4)));
    runtime.dispatch(BoardMsg::ToggleLock);
    runtime.dispatch(drag(DropLocation::row(0, 3), DropLocation::row(0, 0)));
    runtime.dispatch(BoardMsg::ToggleLock);

    let model = runtime.into_model();
    let counters = worker.shutdown();
    assert_eq!(counters.saves_failed, 1);
    assert_eq!(sink.save_count(), 0);

    let order: Vec<u32> = model.filtered().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![4, 1, 2, 3]);

    let entries = read_entries(&log).unwrap();
    let failed = entries
        .iter()
        .find(|e| e.event == EventType::SaveFailed)
        .expect("save failure logged");
    assert_eq!(failed.ok, Some(false));
    assert_eq!(failed.error_code.as_deref(), Some("HD-3002"));
}

#[test]
fn unreachable_backend_leaves_board_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let worker = SyncWorker::spawn(
        Box::new(RecordingSink::new()),
        JsonlConfig::for_path(dir.path().join("activity.jsonl")),
        CHANNEL_CAPACITY,
    )
    .unwrap();
    let mut runtime = BoardRuntime::new(BoardModel::new(), worker.handle());
    runtime.dispatch(BoardMsg::FetchFailed {
        code: "HD-3002".to_string(),
        message: "connection refused".to_string(),
    });
    runtime.dispatch(BoardMsg::ToggleLock);
    runtime.dispatch(BoardMsg::ToggleLock);
    assert!(!runtime.model().is_loaded());
    assert_eq!(runtime.model().fetch_errors, 1);
    assert_eq!(runtime.saves_requested(), 0);
}
