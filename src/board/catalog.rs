//! Shortcut catalog: capped favorites plus the ordered remainder.
//!
//! Invariant: once built, every shortcut id lives in exactly one of
//! `favorites` / `others`, and `favorites.len() <= FAVORITES_CAP`.
//!
//! Grid positions handed to the transitions are *absolute indices* into the
//! filtered view (see [`Catalog::filtered`]). They are resolved back to
//! positions in `others` here, so the grid math never needs to know whether a
//! search is active.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::shortcut::{Shortcut, ShortcutId};

/// Hard cap on the favorites strip.
pub const FAVORITES_CAP: usize = 5;

/// Why a drag-driven mutation left the catalog unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Favorites strip already holds [`FAVORITES_CAP`] shortcuts.
    FavoritesFull,
    /// The source position does not resolve to a shortcut.
    SourceMissing,
}

impl RejectReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FavoritesFull => "favorites_full",
            Self::SourceMissing => "source_missing",
        }
    }
}

/// One row of the save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPreference {
    pub id: ShortcutId,
    pub is_favorite: bool,
    pub app_order: i64,
}

/// Body of `POST /api/save`: favorites block first, then the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavePayload {
    pub apps: Vec<AppPreference>,
}

/// The unit of persistence: two disjoint ordered sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    favorites: Vec<Shortcut>,
    others: Vec<Shortcut>,
}

impl Catalog {
    /// Build from the first successful fetch.
    ///
    /// Favorites keep fetch order; the rest are stably sorted by `app_order`.
    /// Duplicate ids keep their first occurrence. Favorites beyond the cap are
    /// demoted to the front of the remainder so the capacity invariant holds
    /// even if the backend stored too many.
    #[must_use]
    pub fn from_records(records: Vec<Shortcut>) -> Self {
        let mut seen = HashSet::new();
        let mut favorites = Vec::new();
        let mut others = Vec::new();
        for record in records {
            if !seen.insert(record.id) {
                continue;
            }
            if record.is_favorite {
                favorites.push(record);
            } else {
                others.push(record);
            }
        }
        others.sort_by_key(|s| s.app_order);

        if favorites.len() > FAVORITES_CAP {
            let overflow: Vec<Shortcut> = favorites.drain(FAVORITES_CAP..).collect();
            others.splice(0..0, overflow);
        }

        Self { favorites, others }
    }

    #[must_use]
    pub fn favorites(&self) -> &[Shortcut] {
        &self.favorites
    }

    /// Non-favorite shortcuts in arrangement order.
    #[must_use]
    pub fn others(&self) -> &[Shortcut] {
        &self.others
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len() + self.others.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.others.is_empty()
    }

    #[must_use]
    pub fn favorites_full(&self) -> bool {
        self.favorites.len() >= FAVORITES_CAP
    }

    /// Whether the favorites "add slot" placeholder should be offered.
    #[must_use]
    pub fn has_free_favorite_slot(&self) -> bool {
        !self.favorites_full()
    }

    #[must_use]
    pub fn get(&self, id: ShortcutId) -> Option<&Shortcut> {
        self.favorites
            .iter()
            .chain(self.others.iter())
            .find(|s| s.id == id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: ShortcutId) -> bool {
        self.favorites.iter().any(|s| s.id == id)
    }

    /// All ids, favorites first.
    #[must_use]
    pub fn ids(&self) -> Vec<ShortcutId> {
        self.favorites
            .iter()
            .chain(self.others.iter())
            .map(|s| s.id)
            .collect()
    }

    /// Search-filtered view of the non-favorites, in arrangement order.
    #[must_use]
    pub fn filtered(&self, search: &str) -> Vec<&Shortcut> {
        self.filtered_positions(search)
            .into_iter()
            .map(|pos| &self.others[pos])
            .collect()
    }

    /// Positions in `others` that make up the filtered view.
    fn filtered_positions(&self, search: &str) -> Vec<usize> {
        self.others
            .iter()
            .enumerate()
            .filter(|(_, s)| s.matches_search(search) && !self.is_favorite(s.id))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Resolve a filtered absolute index to a position in `others`.
    fn source_position(&self, search: &str, absolute: usize) -> Option<usize> {
        self.filtered_positions(search).get(absolute).copied()
    }

    /// Resolve a filtered absolute index to an insertion point in `others`.
    ///
    /// Past-the-end indices insert right after the last filtered shortcut (or
    /// at the end of `others` when nothing matches). With an empty search this
    /// is plain clamped splice semantics.
    fn insert_position(&self, search: &str, absolute: usize) -> usize {
        let positions = self.filtered_positions(search);
        match positions.get(absolute) {
            Some(&pos) => pos,
            None => positions.last().map_or(self.others.len(), |&last| last + 1),
        }
    }

    /// Move a grid shortcut from one absolute index to another.
    pub fn reorder(
        &mut self,
        search: &str,
        from: usize,
        to: usize,
    ) -> Result<ShortcutId, RejectReason> {
        let src = self
            .source_position(search, from)
            .ok_or(RejectReason::SourceMissing)?;
        let moved = self.others.remove(src);
        let id = moved.id;
        let dst = self.insert_position(search, to);
        self.others.insert(dst, moved);
        Ok(id)
    }

    /// Pin a grid shortcut into the favorites strip at `slot`.
    ///
    /// Rejected without any change when the strip is full.
    pub fn move_to_favorites(
        &mut self,
        search: &str,
        from: usize,
        slot: usize,
    ) -> Result<ShortcutId, RejectReason> {
        if self.favorites_full() {
            return Err(RejectReason::FavoritesFull);
        }
        let src = self
            .source_position(search, from)
            .ok_or(RejectReason::SourceMissing)?;
        let moved = self.others.remove(src);
        let id = moved.id;
        let slot = slot.min(self.favorites.len());
        self.favorites.insert(slot, moved);
        Ok(id)
    }

    /// Unpin the favorite at `slot` and drop it into the grid at `to`.
    pub fn move_from_favorites(
        &mut self,
        search: &str,
        slot: usize,
        to: usize,
    ) -> Result<ShortcutId, RejectReason> {
        if slot >= self.favorites.len() {
            return Err(RejectReason::SourceMissing);
        }
        let moved = self.favorites.remove(slot);
        let id = moved.id;
        let dst = self.insert_position(search, to);
        self.others.insert(dst, moved);
        Ok(id)
    }

    /// Refresh status fields from a later fetch without touching the order.
    ///
    /// Unknown ids are ignored. Returns how many shortcuts changed.
    pub fn refresh_status(&mut self, records: &[Shortcut]) -> usize {
        let mut changed = 0;
        for shortcut in self.favorites.iter_mut().chain(self.others.iter_mut()) {
            if let Some(fresh) = records.iter().find(|r| r.id == shortcut.id)
                && (shortcut.status != fresh.status || shortcut.last_check != fresh.last_check)
            {
                shortcut.status = fresh.status;
                shortcut.last_check = fresh.last_check;
                changed += 1;
            }
        }
        changed
    }

    /// Serialize the arrangement for the save endpoint.
    #[must_use]
    pub fn save_payload(&self) -> SavePayload {
        let favorites = self.favorites.iter().zip(0_i64..).map(|(s, order)| AppPreference {
            id: s.id,
            is_favorite: true,
            app_order: order,
        });
        let others = self.others.iter().zip(0_i64..).map(|(s, order)| AppPreference {
            id: s.id,
            is_favorite: false,
            app_order: order,
        });
        SavePayload {
            apps: favorites.chain(others).collect(),
        }
    }

    /// Check the disjointness and capacity invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.favorites.len() > FAVORITES_CAP {
            return false;
        }
        let mut seen = HashSet::new();
        self.favorites
            .iter()
            .chain(self.others.iter())
            .all(|s| seen.insert(s.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(id: ShortcutId, name: &str, order: i64, fav: bool) -> Shortcut {
        let mut s = Shortcut::new(id, name, format!("http://{}.lan", name.to_lowercase()));
        s.app_order = order;
        s.is_favorite = fav;
        s
    }

    fn numbered(n: u32) -> Catalog {
        Catalog::from_records(
            (1..=n)
                .map(|i| shortcut(i, &format!("svc{i}"), i64::from(i), false))
                .collect(),
        )
    }

    fn other_ids(c: &Catalog) -> Vec<ShortcutId> {
        c.others().iter().map(|s| s.id).collect()
    }

    fn fav_ids(c: &Catalog) -> Vec<ShortcutId> {
        c.favorites().iter().map(|s| s.id).collect()
    }

    #[test]
    fn from_records_splits_and_sorts() {
        let c = Catalog::from_records(vec![
            shortcut(1, "Sonarr", 3, false),
            shortcut(2, "Radarr", 1, false),
            shortcut(3, "Plex", 9, true),
            shortcut(4, "Prowlarr", 2, false),
            shortcut(5, "Tautulli", 0, true),
        ]);
        assert_eq!(fav_ids(&c), vec![3, 5]);
        assert_eq!(other_ids(&c), vec![2, 4, 1]);
        assert!(c.is_consistent());
    }

    #[test]
    fn from_records_drops_duplicate_ids() {
        let c = Catalog::from_records(vec![
            shortcut(1, "Sonarr", 0, true),
            shortcut(1, "Sonarr", 0, false),
            shortcut(2, "Radarr", 1, false),
        ]);
        assert_eq!(c.len(), 2);
        assert!(c.is_favorite(1));
        assert!(c.is_consistent());
    }

    #[test]
    fn from_records_demotes_favorites_over_cap() {
        let records = (1..=7)
            .map(|i| shortcut(i, &format!("svc{i}"), 0, true))
            .collect();
        let c = Catalog::from_records(records);
        assert_eq!(fav_ids(&c), vec![1, 2, 3, 4, 5]);
        assert_eq!(other_ids(&c), vec![6, 7]);
        assert!(c.is_consistent());
    }

    #[test]
    fn filtered_excludes_favorites_and_applies_search() {
        let c = Catalog::from_records(vec![
            shortcut(1, "AdGuard Home", 0, false),
            shortcut(2, "Sonarr", 1, false),
            shortcut(3, "Radarr", 2, true),
        ]);
        let names: Vec<&str> = c.filtered("ad").iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["AdGuard Home"]);
        assert_eq!(c.filtered("").len(), 2);
    }

    #[test]
    fn reorder_moves_forward_and_back() {
        let mut c = numbered(6);
        let original = other_ids(&c);
        c.reorder("", 1, 4).unwrap();
        assert_eq!(other_ids(&c), vec![1, 3, 4, 5, 2, 6]);
        c.reorder("", 4, 1).unwrap();
        assert_eq!(other_ids(&c), original);
    }

    #[test]
    fn reorder_past_end_appends() {
        let mut c = numbered(4);
        c.reorder("", 0, 99).unwrap();
        assert_eq!(other_ids(&c), vec![2, 3, 4, 1]);
    }

    #[test]
    fn reorder_missing_source_is_rejected_unchanged() {
        let mut c = numbered(3);
        let before = c.clone();
        assert_eq!(c.reorder("", 5, 0), Err(RejectReason::SourceMissing));
        assert_eq!(c, before);
    }

    #[test]
    fn reorder_under_search_resolves_through_filtered_view() {
        let mut c = Catalog::from_records(vec![
            shortcut(1, "Sonarr", 0, false),
            shortcut(2, "Radarr", 1, false),
            shortcut(3, "Prowlarr", 2, false),
            shortcut(4, "Readarr", 3, false),
        ]);
        // "arr" matches everything; "rr" too. Use "ad" → Radarr, Readarr.
        let view: Vec<ShortcutId> = c.filtered("ad").iter().map(|s| s.id).collect();
        assert_eq!(view, vec![2, 4]);
        // Move Readarr (filtered 1) in front of Radarr (filtered 0).
        c.reorder("ad", 1, 0).unwrap();
        assert_eq!(other_ids(&c), vec![1, 4, 2, 3]);
    }

    #[test]
    fn move_to_favorites_respects_cap() {
        let mut c = numbered(8);
        for _ in 0..FAVORITES_CAP {
            c.move_to_favorites("", 0, 0).unwrap();
        }
        assert!(c.favorites_full());
        let before = c.clone();
        assert_eq!(
            c.move_to_favorites("", 0, 0),
            Err(RejectReason::FavoritesFull)
        );
        assert_eq!(c, before);
    }

    #[test]
    fn move_to_favorites_inserts_at_slot() {
        let mut c = numbered(5);
        c.move_to_favorites("", 0, 0).unwrap();
        c.move_to_favorites("", 2, 0).unwrap();
        c.move_to_favorites("", 0, 7).unwrap();
        assert_eq!(fav_ids(&c), vec![4, 1, 2]);
        assert_eq!(other_ids(&c), vec![3, 5]);
        assert!(c.is_consistent());
    }

    #[test]
    fn move_from_favorites_inserts_at_absolute_index() {
        let mut c = Catalog::from_records(vec![
            shortcut(1, "A", 0, true),
            shortcut(2, "B", 0, true),
            shortcut(3, "C", 0, false),
            shortcut(4, "D", 1, false),
        ]);
        c.move_from_favorites("", 1, 1).unwrap();
        assert_eq!(fav_ids(&c), vec![1]);
        assert_eq!(other_ids(&c), vec![3, 2, 4]);
        assert_eq!(c.move_from_favorites("", 3, 0), Err(RejectReason::SourceMissing));
    }

    #[test]
    fn payload_shape_favorites_first() {
        let c = Catalog::from_records(vec![
            shortcut(20, "B", 0, true),
            shortcut(10, "A", 1, true),
            shortcut(30, "C", 0, false),
        ]);
        let payload = c.save_payload();
        assert_eq!(
            payload.apps,
            vec![
                AppPreference {
                    id: 20,
                    is_favorite: true,
                    app_order: 0
                },
                AppPreference {
                    id: 10,
                    is_favorite: true,
                    app_order: 1
                },
                AppPreference {
                    id: 30,
                    is_favorite: false,
                    app_order: 0
                },
            ]
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["apps"][0]["is_favorite"], true);
        assert_eq!(json["apps"][2]["app_order"], 0);
    }

    #[test]
    fn refresh_status_keeps_order() {
        let mut c = numbered(3);
        c.reorder("", 0, 2).unwrap();
        let order = other_ids(&c);
        let mut fresh = shortcut(1, "svc1", 0, true);
        fresh.status = 200;
        fresh.last_check = 42;
        let ghost = shortcut(99, "ghost", 0, false);
        assert_eq!(c.refresh_status(&[fresh, ghost]), 1);
        assert_eq!(other_ids(&c), order);
        assert_eq!(c.get(1).unwrap().status, 200);
        assert!(!c.is_favorite(1));
        assert!(c.get(99).is_none());
    }
}
