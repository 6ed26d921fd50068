//! # Dashboard Module
//!
//! View state for the dashboard and the load protocol that keeps it
//! consistent.
//!
//! ## Load protocol
//!
//! 1. [`Dashboard::begin_load`] bumps the sequence number, clears the error
//!    and hands out a [`LoadTicket`].
//! 2. [`perform_load`] fetches summary and recent calls concurrently for
//!    that ticket, off the event loop.
//! 3. [`Dashboard::apply`] accepts the [`LoadOutcome`] only when its
//!    sequence number is still the latest issued; anything older is dropped.

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread;

use crate::db::CredentialStore;
use crate::metrics_api::{MetricsSource, RECENT_CALLS_LIMIT, RequestError};
use crate::models::{CallRecord, Credential, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No load has been started yet
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Loading => "loading",
            LoadPhase::Loaded => "loaded",
            LoadPhase::Failed => "failed",
        }
    }
}

/// Permission to run one load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub credential: Credential,
}

/// Joined result of both fetches of one load attempt
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub seq: u64,
    pub result: Result<(Summary, Vec<CallRecord>), RequestError>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    credential: Credential,
    summary: Option<Summary>,
    calls: Vec<CallRecord>,
    selected: Option<usize>,
    error: Option<String>,
    phase: LoadPhase,
    latest_seq: u64,
}

impl Dashboard {
    pub fn new(credential: Credential) -> Self {
        Dashboard {
            credential,
            summary: None,
            calls: Vec::new(),
            selected: None,
            error: None,
            phase: LoadPhase::Idle,
            latest_seq: 0,
        }
    }

    /// Start from the saved credential, falling back to `default`
    pub fn from_store(store: Option<&CredentialStore>, default: &str) -> Self {
        let saved = store.and_then(|s| match s.load() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("could not read saved workspace key: {e:#}");
                None
            }
        });
        Dashboard::new(saved.unwrap_or_else(|| Credential::new(default)))
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&CallRecord> {
        self.selected.and_then(|i| self.calls.get(i))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// Edit the in-memory credential. Nothing is persisted or reloaded.
    pub fn set_credential(&mut self, value: impl Into<String>) {
        self.credential = Credential::new(value);
    }

    /// Start a load attempt with the current credential.
    ///
    /// Any attempt still in flight is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_seq += 1;
        self.error = None;
        self.phase = LoadPhase::Loading;
        log::debug!(
            "load #{} started for workspace {}",
            self.latest_seq,
            self.credential
        );
        LoadTicket {
            seq: self.latest_seq,
            credential: self.credential.clone(),
        }
    }

    /// Persist the current credential and start a load with it.
    ///
    /// A failed write is logged; the reload still happens so the dashboard
    /// reflects what the user typed.
    pub fn save_credential(&mut self, store: Option<&CredentialStore>) -> LoadTicket {
        match store {
            Some(store) => {
                if let Err(e) = store.save(&self.credential) {
                    log::warn!("could not save workspace key: {e:#}");
                }
            }
            None => log::warn!("no credential store available; workspace key not saved"),
        }
        self.begin_load()
    }

    /// Apply a finished load. Returns `false` when the outcome was superseded.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            log::debug!(
                "dropping stale load #{} (latest #{})",
                outcome.seq,
                self.latest_seq
            );
            return false;
        }
        match outcome.result {
            Ok((summary, calls)) => {
                log::info!(
                    "load #{} done: {} calls, {} recent",
                    outcome.seq,
                    summary.total_calls,
                    calls.len()
                );
                self.selected = if calls.is_empty() { None } else { Some(0) };
                self.summary = Some(summary);
                self.calls = calls;
                self.phase = LoadPhase::Loaded;
            }
            Err(e) => {
                log::warn!("load #{} failed: {e}", outcome.seq);
                let message = e.to_string();
                self.error = Some(if message.trim().is_empty() {
                    "Request failed".to_string()
                } else {
                    message
                });
                self.phase = LoadPhase::Failed;
            }
        }
        true
    }

    /// Select the row at `index` of the current list; out of range is a no-op
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.calls.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }
}

enum Fetched {
    Summary(Result<Summary, RequestError>),
    Calls(Result<Vec<CallRecord>, RequestError>),
}

/// Run both fetches of `ticket` concurrently and join them.
///
/// When both fail, the failure that settled first is reported.
pub fn perform_load<S: MetricsSource + ?Sized>(source: &S, ticket: &LoadTicket) -> LoadOutcome {
    let (tx, rx) = crossbeam_channel::bounded(2);
    let credential = &ticket.credential;

    thread::scope(|scope| {
        let summary_tx = tx.clone();
        let handles = [
            scope.spawn(move || {
                let _ = summary_tx.send(Fetched::Summary(source.fetch_summary(credential)));
            }),
            scope.spawn(move || {
                let _ = tx.send(Fetched::Calls(
                    source.fetch_recent_calls(credential, RECENT_CALLS_LIMIT),
                ));
            }),
        ];
        // Joined explicitly so a panicking fetch surfaces as an error below
        for handle in handles {
            let _ = handle.join();
        }
    });

    let mut summary = None;
    let mut calls = None;
    let mut first_error = None;
    for fetched in rx.iter() {
        match fetched {
            Fetched::Summary(Ok(s)) => summary = Some(s),
            Fetched::Calls(Ok(c)) => calls = Some(c),
            Fetched::Summary(Err(e)) | Fetched::Calls(Err(e)) => {
                first_error.get_or_insert(e);
            }
        }
    }

    let result = match (first_error, summary, calls) {
        (Some(e), _, _) => Err(e),
        (None, Some(s), Some(c)) => Ok((s, c)),
        // A fetch thread panicked before reporting
        _ => Err(RequestError::Transport("Request failed".to_string())),
    };
    LoadOutcome {
        seq: ticket.seq,
        result,
    }
}

/// Run [`perform_load`] on a worker thread and deliver the outcome as an event
pub fn spawn_load<S, E>(source: Arc<S>, ticket: LoadTicket, events: Sender<E>)
where
    S: MetricsSource + ?Sized + 'static,
    E: From<LoadOutcome> + Send + 'static,
{
    thread::spawn(move || {
        let outcome = perform_load(source.as_ref(), &ticket);
        // The receiver is gone once the event loop has exited
        let _ = events.send(E::from(outcome));
    });
}
