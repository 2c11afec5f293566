//! Service health probe.
//!
//! Every distinct service URL is requested once, in parallel, with a short
//! timeout. Any response counts with its status code; a transport failure is
//! recorded as 503. Results land in the store's `status` / `last_check`
//! columns, which later fetches carry to the board.

#![allow(missing_docs)]

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;

use crate::core::config::PollConfig;
use crate::board::shortcut::Shortcut;
use crate::core::errors::Result;
use crate::sync::sink::ShortcutSource;

use super::sqlite::ShortcutStore;

/// Status recorded when a service cannot be reached at all.
pub const UNREACHABLE_STATUS: u32 = 503;

/// One probed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    pub status: u32,
    pub elapsed_ms: u64,
}

/// What a probe run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The last probe is too recent.
    Skipped { last_probe: u64, age_secs: u64 },
    Completed {
        checked_at: u64,
        results: Vec<ProbeResult>,
        duration_ms: u64,
    },
}

/// Client used for probing: short timeout, self-signed certificates accepted.
pub fn probe_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(true)
        .build()?)
}

/// Request one URL and report its status code.
pub fn ping_url(client: &Client, url: &str) -> ProbeResult {
    let started = Instant::now();
    let status = match client.get(url).send() {
        Ok(response) => u32::from(response.status().as_u16()),
        Err(error) => {
            eprintln!("[HD-PROBE] {url} unreachable: {error}");
            UNREACHABLE_STATUS
        }
    };
    ProbeResult {
        url: url.to_string(),
        status,
        elapsed_ms: elapsed_ms(started),
    }
}

/// Probe all URLs concurrently, one thread each. Output keeps input order.
pub fn probe_urls(client: &Client, urls: &[String]) -> Vec<ProbeResult> {
    thread::scope(|scope| {
        let handles: Vec<_> = urls
            .iter()
            .map(|url| scope.spawn(move || ping_url(client, url)))
            .collect();
        handles
            .into_iter()
            .zip(urls)
            .map(|(handle, url)| {
                handle.join().unwrap_or_else(|_| ProbeResult {
                    url: url.clone(),
                    status: UNREACHABLE_STATUS,
                    elapsed_ms: 0,
                })
            })
            .collect()
    })
}

/// Whether a probe is due at `now`, given the last probe time.
#[must_use]
pub const fn probe_due(last_probe: u64, now: u64, min_interval_secs: u64) -> bool {
    now.saturating_sub(last_probe) >= min_interval_secs
}

/// Probe every service in the store and record the results.
///
/// Skipped when the most recent probe is younger than
/// `poll.probe_min_interval_secs`, unless `force` is set.
pub fn probe_store(
    store: &ShortcutStore,
    poll: &PollConfig,
    now: u64,
    force: bool,
) -> Result<ProbeOutcome> {
    let last_probe = store.last_probe()?;
    if !force && !probe_due(last_probe, now, poll.probe_min_interval_secs) {
        return Ok(ProbeOutcome::Skipped {
            last_probe,
            age_secs: now.saturating_sub(last_probe),
        });
    }

    let started = Instant::now();
    let client = probe_client(Duration::from_millis(poll.probe_timeout_ms))?;
    let results = probe_urls(&client, &store.service_urls()?);
    for result in &results {
        store.record_status(&result.url, result.status, now)?;
    }
    Ok(ProbeOutcome::Completed {
        checked_at: now,
        results,
        duration_ms: elapsed_ms(started),
    })
}

/// Store-backed source that refreshes service health before each listing.
///
/// Probes honour `poll.probe_min_interval_secs`, so a short refetch interval
/// does not hammer the services. A failed probe is reported and the listing
/// still goes out with the last recorded status.
pub struct ProbingSource {
    store: ShortcutStore,
    poll: PollConfig,
}

impl ProbingSource {
    pub const fn new(store: ShortcutStore, poll: PollConfig) -> Self {
        Self { store, poll }
    }
}

impl ShortcutSource for ProbingSource {
    fn fetch_shortcuts(&self) -> Result<Vec<Shortcut>> {
        if let Err(error) = probe_store(&self.store, &self.poll, unix_now(), false) {
            eprintln!("[HD-PROBE] health refresh failed: {error}");
        }
        self.store.list_shortcuts()
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
