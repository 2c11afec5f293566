//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DashError, Result};

/// Full homedash configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub poll: PollConfig,
    pub services: Vec<ServiceEntry>,
    pub paths: PathsConfig,
}

/// Where shortcut records come from and where the arrangement is saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Local SQLite preference store at `paths.sqlite_db`.
    #[default]
    Sqlite,
    /// Remote dashboard REST endpoints under `backend.base_url`.
    Http,
}

impl BackendKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Http => "http",
        }
    }
}

/// Backend selection and request tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Base URL of the dashboard server (`/api/ping`, `/api/save` are appended).
    pub base_url: String,
    pub request_timeout_ms: u64,
}

/// Refetch and health-probe cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between shortcut/status refetches.
    pub interval_secs: u64,
    /// Probes younger than this are skipped.
    pub probe_min_interval_secs: u64,
    /// Per-service probe timeout.
    pub probe_timeout_ms: u64,
}

/// One launchable service seeded into the preference store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEntry {
    pub name: String,
    pub url: String,
}

/// Filesystem paths used by homedash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub sqlite_db: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Sqlite,
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 4_000,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3 * 60,
            probe_min_interval_secs: 5 * 60,
            probe_timeout_ms: 2_000,
        }
    }
}

impl PollConfig {
    /// Refetch cadence as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[HD-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("homedash").join("config.toml");
        let data = home_dir.join(".local").join("share").join("homedash");
        Self {
            config_file: cfg,
            sqlite_db: data.join("database.db"),
            jsonl_log: data.join("activity.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| DashError::Io {
                path: path_buf.clone(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else if is_explicit_path {
            return Err(DashError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document without touching the environment or validating.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON so the value is stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("HOMEDASH_BACKEND_KIND") {
            self.backend.kind = parse_backend_kind("HOMEDASH_BACKEND_KIND", &raw)?;
        }
        if let Some(raw) = lookup("HOMEDASH_BACKEND_BASE_URL") {
            self.backend.base_url = raw;
        }
        if let Some(raw) = lookup("HOMEDASH_BACKEND_REQUEST_TIMEOUT_MS") {
            self.backend.request_timeout_ms =
                parse_env_u64("HOMEDASH_BACKEND_REQUEST_TIMEOUT_MS", &raw)?;
        }

        if let Some(raw) = lookup("HOMEDASH_POLL_INTERVAL_SECS") {
            self.poll.interval_secs = parse_env_u64("HOMEDASH_POLL_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("HOMEDASH_POLL_PROBE_MIN_INTERVAL_SECS") {
            self.poll.probe_min_interval_secs =
                parse_env_u64("HOMEDASH_POLL_PROBE_MIN_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("HOMEDASH_POLL_PROBE_TIMEOUT_MS") {
            self.poll.probe_timeout_ms = parse_env_u64("HOMEDASH_POLL_PROBE_TIMEOUT_MS", &raw)?;
        }

        if let Some(raw) = lookup("HOMEDASH_SQLITE_DB") {
            self.paths.sqlite_db = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("HOMEDASH_JSONL_LOG") {
            self.paths.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.backend.base_url.trim().trim_end_matches('/');
        self.backend.base_url = trimmed.to_string();

        for service in &mut self.services {
            service.name = service.name.trim().to_string();
            service.url = service.url.trim().to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.backend.kind == BackendKind::Http && self.backend.base_url.is_empty() {
            return Err(DashError::InvalidConfig {
                details: "backend.base_url must be set when backend.kind = \"http\"".to_string(),
            });
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(DashError::InvalidConfig {
                details: "backend.request_timeout_ms must be > 0".to_string(),
            });
        }
        if self.poll.interval_secs == 0 {
            return Err(DashError::InvalidConfig {
                details: "poll.interval_secs must be > 0".to_string(),
            });
        }
        if self.poll.probe_timeout_ms == 0 {
            return Err(DashError::InvalidConfig {
                details: "poll.probe_timeout_ms must be > 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (idx, service) in self.services.iter().enumerate() {
            if service.name.is_empty() || service.url.is_empty() {
                return Err(DashError::InvalidConfig {
                    details: format!("services[{idx}] needs both a name and a url"),
                });
            }
            if !seen.insert((service.name.as_str(), service.url.as_str())) {
                return Err(DashError::InvalidConfig {
                    details: format!(
                        "services[{idx}] duplicates {} ({})",
                        service.name, service.url
                    ),
                });
            }
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| DashError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_backend_kind(name: &str, raw: &str) -> Result<BackendKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "sqlite" => Ok(BackendKind::Sqlite),
        "http" => Ok(BackendKind::Http),
        other => Err(DashError::ConfigParse {
            context: "env",
            details: format!("{name}={other:?}: expected \"sqlite\" or \"http\""),
        }),
    }
}
