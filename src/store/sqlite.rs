//! SQLite shortcut store: services, their arrangement, and probe results.
//!
//! `services` holds one row per configured service; `preferences` holds its
//! position and favorite flag. Triggers keep the two in step: inserting a
//! service appends a preference at the end of the order, deleting one removes
//! its preference and closes the gap.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params};

use crate::board::catalog::SavePayload;
use crate::board::shortcut::Shortcut;
use crate::core::config::ServiceEntry;
use crate::core::errors::{DashError, Result};
use crate::sync::sink::{PersistenceSink, ShortcutSource};

/// Result of reconciling the `services` table with configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
}

/// Shortcut store backed by a single SQLite file.
pub struct ShortcutStore {
    conn: Connection,
    path: PathBuf,
}

impl ShortcutStore {
    /// Open (or create) the database at `path`, applying schema and PRAGMAs.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| DashError::io(parent, source))?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        apply_pragmas(&conn)?;
        apply_schema(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ──────────────────── services ────────────────────

    /// Make `services` match the configured list.
    ///
    /// New `(name, url)` pairs are inserted (the trigger appends them to the
    /// order); rows no longer configured are deleted. Existing rows keep their
    /// id, status and arrangement.
    pub fn sync_services(&self, services: &[ServiceEntry]) -> Result<SyncReport> {
        let wanted: HashSet<(&str, &str)> = services
            .iter()
            .map(|s| (s.name.as_str(), s.url.as_str()))
            .collect();

        let tx = self.conn.unchecked_transaction()?;
        let mut report = SyncReport::default();
        {
            let mut insert =
                tx.prepare_cached("INSERT OR IGNORE INTO services (name, url) VALUES (?1, ?2)")?;
            for service in services {
                report.added += insert.execute(params![service.name, service.url])?;
            }

            let existing = tx
                .prepare_cached("SELECT id, name, url FROM services")?
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut delete = tx.prepare_cached("DELETE FROM services WHERE id = ?1")?;
            for (id, name, url) in existing {
                if !wanted.contains(&(name.as_str(), url.as_str())) {
                    report.removed += delete.execute(params![id])?;
                }
            }
        }
        tx.commit()?;
        Ok(report)
    }

    /// Every service joined with its preference, in stored order.
    pub fn list_shortcuts(&self) -> Result<Vec<Shortcut>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.id, s.name, s.status, s.last_check, s.url,
                    COALESCE(p.app_order, 0), COALESCE(p.is_favorite, 0)
             FROM services s
             LEFT JOIN preferences p ON s.id = p.service_id
             ORDER BY COALESCE(p.app_order, 0), s.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Shortcut {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    status: row.get(2)?,
                    last_check: u64::try_from(row.get::<_, i64>(3)?).unwrap_or(0),
                    url: row.get(4)?,
                    app_order: row.get(5)?,
                    is_favorite: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Write the whole arrangement in one transaction.
    ///
    /// Ids without a preference row are skipped. Returns rows updated.
    pub fn update_preferences(&self, payload: &SavePayload) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE preferences SET is_favorite = ?1, app_order = ?2 WHERE service_id = ?3",
            )?;
            for app in &payload.apps {
                updated += stmt.execute(params![app.is_favorite, app.app_order, app.id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    // ──────────────────── probe results ────────────────────

    /// Store a probe result for every service with this URL.
    pub fn record_status(&self, url: &str, status: u32, checked_at: u64) -> Result<usize> {
        let checked_at = i64::try_from(checked_at).unwrap_or(i64::MAX);
        Ok(self
            .conn
            .prepare_cached("UPDATE services SET status = ?1, last_check = ?2 WHERE url = ?3")?
            .execute(params![status, checked_at, url])?)
    }

    /// Most recent probe time (unix seconds), 0 if never probed.
    pub fn last_probe(&self) -> Result<u64> {
        let last: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(last_check), 0) FROM services",
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(last).unwrap_or(0))
    }

    /// Distinct service URLs, for probing.
    pub fn service_urls(&self) -> Result<Vec<String>> {
        let urls = self
            .conn
            .prepare_cached("SELECT DISTINCT url FROM services ORDER BY url")?
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    pub fn is_wal_mode(&self) -> bool {
        self.conn
            .query_row("PRAGMA journal_mode", [], |row| row.get::<_, String>(0))
            .is_ok_and(|mode| mode.eq_ignore_ascii_case("wal"))
    }
}

impl ShortcutSource for ShortcutStore {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>> {
        self.list_shortcuts()
    }
}

impl PersistenceSink for ShortcutStore {
    fn save(&self, payload: &SavePayload) -> Result<()> {
        self.update_preferences(payload).map(|_| ())
    }

    fn endpoint(&self) -> String {
        self.path.display().to_string()
    }
}

// ──────────────────── schema & pragmas ────────────────────

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    let mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        eprintln!("[HD-SQLITE] WARNING: requested WAL mode but got '{mode}'");
    }
    Ok(())
}

fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS services (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            status      INTEGER NOT NULL DEFAULT 0,
            last_check  INTEGER NOT NULL DEFAULT 0,
            url         TEXT NOT NULL,
            UNIQUE(name, url)
        );

        CREATE TABLE IF NOT EXISTS preferences (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            service_id   INTEGER NOT NULL,
            is_favorite  INTEGER NOT NULL DEFAULT 0,
            app_order    INTEGER NOT NULL
        );

        CREATE TRIGGER IF NOT EXISTS insert_preferences
            AFTER INSERT ON services
            BEGIN
                INSERT INTO preferences (service_id, app_order)
                VALUES (NEW.id, (SELECT COALESCE(MAX(app_order), 0) + 1 FROM preferences));
            END;

        CREATE TRIGGER IF NOT EXISTS delete_preferences
            AFTER DELETE ON services
            BEGIN
                DELETE FROM preferences WHERE service_id = OLD.id;
            END;

        CREATE TRIGGER IF NOT EXISTS update_order
            AFTER DELETE ON preferences
            BEGIN
                UPDATE preferences SET app_order = app_order - 1
                WHERE app_order > OLD.app_order;
            END;

        CREATE INDEX IF NOT EXISTS idx_preferences_service ON preferences(service_id);
        CREATE INDEX IF NOT EXISTS idx_services_url ON services(url);",
    )?;
    Ok(())
}

// ──────────────────── tests ────────────────────
