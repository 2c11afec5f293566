//! Interval refetch of shortcut records.
//!
//! The poller thread fetches from a [`ShortcutSource`] immediately and then on
//! a fixed interval, forwarding each result to the board as a [`BoardMsg`]. It
//! never touches the model itself; the reducer decides whether a result seeds
//! the catalog or only refreshes status.

#![allow(missing_docs)]

use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};

use crate::board::model::BoardMsg;
use crate::core::config::PollConfig;
use crate::core::errors::{DashError, Result};

use super::sink::ShortcutSource;

/// Turn one fetch into the message the board expects.
pub fn fetch_message(source: &dyn ShortcutSource) -> BoardMsg {
    match source.fetch_shortcuts() {
        Ok(records) => BoardMsg::ShortcutsFetched(records),
        Err(error) => BoardMsg::FetchFailed {
            code: error.code().to_string(),
            message: error.to_string(),
        },
    }
}

/// Handle to a running poller thread.
pub struct Poller {
    stop: Option<Sender<()>>,
    join: Option<thread::JoinHandle<u64>>,
}

impl Poller {
    /// Start polling `source` every `interval`, sending results into `out`.
    ///
    /// The thread exits on [`Poller::stop`] or once `out` is disconnected.
    pub fn spawn(
        source: Box<dyn ShortcutSource>,
        interval: Duration,
        out: Sender<BoardMsg>,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let join = thread::Builder::new()
            .name("homedash-poll".to_string())
            .spawn(move || {
                let mut polls = 0_u64;
                loop {
                    polls += 1;
                    if out.send(fetch_message(source.as_ref())).is_err() {
                        break;
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                polls
            })
            .map_err(|e| DashError::Runtime {
                details: format!("failed to spawn poll thread: {e}"),
            })?;
        Ok(Self {
            stop: Some(stop_tx),
            join: Some(join),
        })
    }

    /// Start polling on the configured `poll.interval_secs`.
    pub fn from_config(
        source: Box<dyn ShortcutSource>,
        config: &PollConfig,
        out: Sender<BoardMsg>,
    ) -> Result<Self> {
        Self::spawn(source, config.interval(), out)
    }

    /// Stop the thread and return how many fetches it made.
    pub fn stop(mut self) -> u64 {
        self.halt()
    }

    fn halt(&mut self) -> u64 {
        // Dropping the sender wakes the thread out of its wait.
        drop(self.stop.take());
        self.join.take().map_or(0, |join| {
            join.join().unwrap_or_else(|_| {
                eprintln!("[HD-POLL] poll thread panicked");
                0
            })
        })
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.halt();
    }
}
