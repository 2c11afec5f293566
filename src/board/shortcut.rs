//! Shortcut entity: identity, display label, health, and launch target.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stable shortcut identity (the backend's service id).
pub type ShortcutId = u32;

/// HTTP status codes that count as "service is up".
///
/// 401 is healthy: the service answered and only wants credentials.
pub const HEALTHY_STATUSES: [u32; 2] = [200, 401];

/// Names at or below this length are displayed as-is.
pub const DISPLAY_NAME_MAX: usize = 10;

/// Fixed name → short label table used for display and search.
const ABBREVIATIONS: [(&str, &str); 6] = [
    ("Home Assistant", "HA"),
    ("AdGuard Home", "AdGuard"),
    ("Vaultwarden", "Vault"),
    ("Pterodactyl", "Panel"),
    ("JDownloader2", "JD"),
    ("qBittorrent", "qBit"),
];

/// Media-server shortcuts open their web client under this suffix.
const MEDIA_SERVER_SUFFIX: &str = "/web";

static MEDIA_SERVER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)plex").expect("static media-server pattern is valid"));

/// A launchable entry as delivered by the bootstrap fetch.
///
/// Field names match the wire format of the dashboard's `/api/ping` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: ShortcutId,
    pub name: String,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub last_check: u64,
    pub url: String,
    #[serde(default)]
    pub app_order: i64,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Shortcut {
    /// Minimal constructor; status fields start at zero (never checked).
    #[must_use]
    pub fn new(id: ShortcutId, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: 0,
            last_check: 0,
            url: url.into(),
            app_order: 0,
            is_favorite: false,
        }
    }

    /// Whether the last probe saw a healthy status.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        HEALTHY_STATUSES.contains(&self.status)
    }

    /// Label shown under the icon.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_label(&self.name)
    }

    /// Case-insensitive match against the full name or the display label.
    ///
    /// An empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        let needle = text.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.display_name().to_lowercase().contains(&needle)
    }

    /// URL opened when the shortcut is activated in browse mode.
    #[must_use]
    pub fn launch_url(&self) -> String {
        if MEDIA_SERVER_NAME.is_match(&self.name) {
            format!("{}{MEDIA_SERVER_SUFFIX}", self.url)
        } else {
            self.url.clone()
        }
    }
}

/// Display label for a shortcut name.
///
/// Long names are looked up in the abbreviation table; names without an
/// entry are returned unchanged.
#[must_use]
pub fn display_label(name: &str) -> &str {
    if name.chars().count() <= DISPLAY_NAME_MAX {
        return name;
    }
    abbreviation(name).unwrap_or(name)
}

/// Abbreviation table lookup (exact, case-sensitive name match).
#[must_use]
pub fn abbreviation(name: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, short)| *short)
}
