//! HTTP backend: the dashboard server's `/api/ping` and `/api/save` endpoints.

#![allow(missing_docs)]

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;

use crate::board::catalog::SavePayload;
use crate::board::shortcut::Shortcut;
use crate::core::config::BackendConfig;
use crate::core::errors::{DashError, Result};
use crate::sync::sink::{PersistenceSink, ShortcutSource};

pub const PING_PATH: &str = "/api/ping";
pub const SAVE_PATH: &str = "/api/save";

/// Blocking client for a remote dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(backend: &BackendConfig) -> Result<Self> {
        if backend.base_url.is_empty() {
            return Err(DashError::InvalidConfig {
                details: "backend.base_url is required for the http backend".to_string(),
            });
        }
        Self::new(
            &backend.base_url,
            Duration::from_millis(backend.request_timeout_ms),
        )
    }

    pub fn ping_url(&self) -> String {
        format!("{}{PING_PATH}", self.base_url)
    }

    pub fn save_url(&self) -> String {
        format!("{}{SAVE_PATH}", self.base_url)
    }
}

/// Fail on any non-2xx status.
fn ensure_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DashError::backend(endpoint, format!("status {}", status.as_u16())))
    }
}

impl ShortcutSource for HttpBackend {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>> {
        let url = self.ping_url();
        let response = ensure_success(&url, self.client.get(&url).send()?)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl PersistenceSink for HttpBackend {
    fn save(&self, payload: &SavePayload) -> Result<()> {
        let url = self.save_url();
        let body = serde_json::to_vec(payload)?;
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        ensure_success(&url, response).map(|_| ())
    }

    fn endpoint(&self) -> String {
        self.save_url()
    }
}
