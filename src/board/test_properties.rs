//! Property-based tests for board reducer invariants.
//!
//! Uses `proptest` to drive arbitrary gesture/message sequences through
//! `update()` and check that the catalog stays disjoint and capped, the page
//! stays in range, and saves happen exactly once per edit session.

use proptest::prelude::*;

use super::catalog::{Catalog, FAVORITES_CAP};
use super::layout::GridLayout;
use super::model::{BoardCmd, BoardModel, BoardMsg, Mode};
use super::paginator::{PageView, SwipeDirection, total_pages};
use super::reorder::{DragResult, DropLocation};
use super::shortcut::{Shortcut, ShortcutId};
use super::update::update;

// ──────────────────── strategies ────────────────────

const NAMES: [&str; 8] = [
    "Sonarr",
    "Radarr",
    "AdGuard Home",
    "Home Assistant",
    "Plex",
    "qBittorrent",
    "Vaultwarden",
    "Prowlarr",
];

fn shortcut(id: ShortcutId, order: i64, favorite: bool) -> Shortcut {
    let base = NAMES[id as usize % NAMES.len()];
    let mut s = Shortcut::new(id, format!("{base} {id}"), format!("http://svc{id}.lan"));
    s.app_order = order;
    s.is_favorite = favorite;
    s
}

fn arb_records() -> impl Strategy<Value = Vec<Shortcut>> {
    prop::collection::vec((0_i64..40, prop::bool::weighted(0.2)), 0..30).prop_map(|rows| {
        rows.into_iter()
            .zip(1_u32..)
            .map(|((order, fav), id)| shortcut(id, order, fav))
            .collect()
    })
}

fn arb_location() -> impl Strategy<Value = DropLocation> {
    prop_oneof![
        3 => (0_usize..4, 0_usize..6).prop_map(|(row, i)| DropLocation::row(row, i)),
        1 => (0_usize..7).prop_map(DropLocation::favorites),
    ]
}

fn arb_drag() -> impl Strategy<Value = DragResult> {
    (arb_location(), prop::option::weighted(0.9, arb_location()))
        .prop_map(|(source, destination)| DragResult {
            source,
            destination,
        })
}

fn arb_search() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("ad".to_string()),
        Just("arr".to_string()),
        Just("1".to_string()),
        Just("zzz".to_string()),
    ]
}

fn arb_status_refresh() -> impl Strategy<Value = BoardMsg> {
    prop::collection::vec((1_u32..35, prop_oneof![Just(200_u32), Just(401), Just(503)]), 0..10)
        .prop_map(|rows| {
            BoardMsg::ShortcutsFetched(
                rows.into_iter()
                    .map(|(id, status)| {
                        // Flags and orders deliberately disagree with the board.
                        let mut s = shortcut(id, -i64::from(id), true);
                        s.status = status;
                        s
                    })
                    .collect(),
            )
        })
}

fn arb_msg() -> impl Strategy<Value = BoardMsg> {
    prop_oneof![
        1 => (200_u32..2000).prop_map(|width| BoardMsg::Resize { width }),
        1 => arb_search().prop_map(BoardMsg::SetSearch),
        1 => (0_usize..6).prop_map(BoardMsg::SetPage),
        1 => (prop::bool::ANY, 0.0_f64..2.0).prop_map(|(left, velocity)| BoardMsg::Swipe {
            direction: if left {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            },
            velocity,
        }),
        1 => Just(BoardMsg::DragStart),
        4 => arb_drag().prop_map(BoardMsg::DragEnd),
        2 => Just(BoardMsg::ToggleLock),
        1 => (0_u32..35).prop_map(BoardMsg::Activate),
        1 => arb_status_refresh(),
    ]
}

// ──────────────────── helpers ────────────────────

fn loaded(records: Vec<Shortcut>) -> BoardModel {
    let mut model = BoardModel::new();
    let _ = update(&mut model, BoardMsg::ShortcutsFetched(records));
    model
}

fn sorted_ids(model: &BoardModel) -> Vec<ShortcutId> {
    let mut ids = model.catalog.as_ref().map(Catalog::ids).unwrap_or_default();
    ids.sort_unstable();
    ids
}

fn save_count(cmd: BoardCmd) -> usize {
    cmd.flatten()
        .into_iter()
        .filter(|c| matches!(c, BoardCmd::Save(_)))
        .count()
}

fn assert_model_invariants(model: &BoardModel) {
    let catalog = model.catalog.as_ref().expect("catalog loaded");
    assert!(catalog.is_consistent(), "catalog lost disjointness");
    assert!(catalog.favorites().len() <= FAVORITES_CAP);
    assert!(model.current_page >= 1);
    assert!(model.current_page <= model.total_pages());
    if model.is_locked() {
        assert!(!model.dragging, "dragging while locked");
    }
}

// ──────────────────── properties ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any message sequence keeps the catalog disjoint, capped and complete.
    #[test]
    fn reducer_preserves_invariants(
        records in arb_records(),
        msgs in prop::collection::vec(arb_msg(), 1..60),
    ) {
        let mut model = loaded(records);
        let ids = sorted_ids(&model);
        for msg in msgs {
            let _ = update(&mut model, msg);
            assert_model_invariants(&model);
            prop_assert_eq!(sorted_ids(&model), ids.clone());
        }
    }

    /// One save per Edit→Browse transition, none otherwise.
    #[test]
    fn saves_only_on_lock(
        records in arb_records(),
        msgs in prop::collection::vec(arb_msg(), 1..60),
    ) {
        let mut model = loaded(records);
        let mut expected = 0;
        let mut saves = 0;
        for msg in msgs {
            let was = model.mode;
            saves += save_count(update(&mut model, msg));
            if was == Mode::Edit && model.mode == Mode::Browse {
                expected += 1;
            }
        }
        prop_assert_eq!(saves, expected);
    }

    /// Status polls never change the arrangement.
    #[test]
    fn polls_never_rearrange(
        records in arb_records(),
        polls in prop::collection::vec(arb_status_refresh(), 1..10),
    ) {
        let mut model = loaded(records);
        let before = model.catalog.as_ref().map(Catalog::ids);
        let favorites: Vec<ShortcutId> = model.favorites().iter().map(|s| s.id).collect();
        for poll in polls {
            prop_assert_eq!(update(&mut model, poll), BoardCmd::None);
        }
        prop_assert_eq!(model.catalog.as_ref().map(Catalog::ids), before);
        let after: Vec<ShortcutId> = model.favorites().iter().map(|s| s.id).collect();
        prop_assert_eq!(after, favorites);
    }

    /// Moving i→j then j→i restores the original order.
    #[test]
    fn reorder_round_trip(
        records in arb_records(),
        from in 0_usize..30,
        to in 0_usize..30,
    ) {
        let mut catalog = Catalog::from_records(records);
        let len = catalog.others().len();
        prop_assume!(len > 0);
        let (from, to) = (from % len, to % len);
        let before = catalog.clone();
        catalog.reorder("", from, to).unwrap();
        catalog.reorder("", to, from).unwrap();
        prop_assert_eq!(catalog, before);
    }

    /// Concatenating every page gives back the filtered sequence.
    #[test]
    fn pages_cover_filtered_view(
        records in arb_records(),
        search in arb_search(),
        width in 200_u32..2000,
    ) {
        let catalog = Catalog::from_records(records);
        let filtered = catalog.filtered(&search);
        let layout = super::layout::layout_for_width(width);
        let pages = total_pages(filtered.len(), layout.items_per_page);
        let flat: Vec<ShortcutId> = (1..=pages)
            .flat_map(|page| PageView::new(&filtered, layout, page).items())
            .map(|s| s.id)
            .collect();
        let expected: Vec<ShortcutId> = filtered.iter().map(|s| s.id).collect();
        prop_assert_eq!(flat, expected);
    }

    /// A full favorites strip rejects every row→favorites drop unchanged.
    #[test]
    fn full_favorites_reject_drops(
        extra in 1_u32..20,
        row in 0_usize..3,
        index in 0_usize..5,
        slot in 0_usize..6,
    ) {
        let records: Vec<Shortcut> = (1..=FAVORITES_CAP as u32 + extra)
            .map(|id| shortcut(id, i64::from(id), id <= FAVORITES_CAP as u32))
            .collect();
        let mut model = loaded(records);
        let _ = update(&mut model, BoardMsg::ToggleLock);
        let before = model.catalog.clone();
        let _ = update(&mut model, BoardMsg::DragEnd(DragResult {
            source: DropLocation::row(row, index),
            destination: Some(DropLocation::favorites(slot)),
        }));
        prop_assert_eq!(model.catalog, before);
    }
}

#[test]
fn rows_never_exceed_one_page() {
    let records: Vec<Shortcut> = (1..=23).map(|id| shortcut(id, i64::from(id), false)).collect();
    let model = loaded(records);
    assert_eq!(model.layout, GridLayout::new(5, 10));
    assert_eq!(model.page_rows().len(), 2);
}
