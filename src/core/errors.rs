//! HD-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DashError>;

/// Top-level error type for homedash.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("[HD-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[HD-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[HD-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[HD-2001] unknown shortcut: {key}")]
    UnknownShortcut { key: String },

    #[error("[HD-2002] invalid drop zone {raw:?}: {details}")]
    InvalidZone { raw: String, details: String },

    #[error("[HD-2003] board not loaded: {details}")]
    NotLoaded { details: String },

    #[error("[HD-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[HD-2102] SQL failure in {context}: {details}")]
    Sql {
        context: &'static str,
        details: String,
    },

    #[error("[HD-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[HD-3002] backend request failed for {endpoint}: {details}")]
    Backend { endpoint: String, details: String },

    #[error("[HD-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[HD-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl DashError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "HD-1001",
            Self::MissingConfig { .. } => "HD-1002",
            Self::ConfigParse { .. } => "HD-1003",
            Self::UnknownShortcut { .. } => "HD-2001",
            Self::InvalidZone { .. } => "HD-2002",
            Self::NotLoaded { .. } => "HD-2003",
            Self::Serialization { .. } => "HD-2101",
            Self::Sql { .. } => "HD-2102",
            Self::Io { .. } => "HD-3001",
            Self::Backend { .. } => "HD-3002",
            Self::ChannelClosed { .. } => "HD-3003",
            Self::Runtime { .. } => "HD-3900",
        }
    }

    /// Whether a later attempt might succeed.
    ///
    /// Nothing in the crate retries on its own; the next poll or the next
    /// edit session is the retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Backend { .. }
                | Self::ChannelClosed { .. }
                | Self::Sql { .. }
                | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for backend failures.
    #[must_use]
    pub fn backend(endpoint: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Backend {
            endpoint: endpoint.into(),
            details: details.into(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DashError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql {
            context: "rusqlite",
            details: value.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for DashError {
    fn from(value: reqwest::Error) -> Self {
        let endpoint = value
            .url()
            .map_or_else(|| "<unknown>".to_string(), ToString::to_string);
        Self::Backend {
            endpoint,
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DashError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
