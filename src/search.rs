//! Debounced search controller.
//!
//! Converts raw input events into a rate-limited, cancel-aware sequence of
//! metadata fetches and a deterministic view state:
//!
//! ```text
//! set_term ──▶ raw_term ──quiet 500ms──▶ debounced_term ──▶ fetch (gen N)
//!                                                              │
//!               stale (gen < N): discard ◀────────────────────┤
//!                                                              ▼
//!                                         commit ──▶ SearchState ──▶ watch
//! ```
//!
//! The controller runs as one spawned task. Input arrives over an mpsc
//! channel, state leaves over a watch channel, and each fetch runs as its
//! own task so a slow response never blocks input processing. Every fetch
//! is tagged with a generation counter at launch; an outcome is committed
//! only while its generation is still the latest, so a slow early response
//! can never overwrite a fresher one. The debounce timer is a single
//! reusable handle, rearmed on every input event (trailing edge).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::models::{Movie, SearchState};
use crate::tmdb::{FetchError, MovieApi};
use crate::trending::TrendRecorder;

/// Outcome of one tagged fetch, sent back to the controller loop.
struct FetchOutcome {
    generation: u64,
    term: String,
    result: Result<Vec<Movie>, FetchError>,
}

/// Handle for talking to a running controller task.
///
/// Cloneable; the controller stops once every handle has been dropped.
#[derive(Clone)]
pub struct SearchHandle {
    input_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<SearchState>,
}

impl SearchHandle {
    /// Update the raw term. Events are applied in arrival order; each one
    /// restarts the debounce timer.
    pub fn set_term(&self, term: impl Into<String>) {
        // A send only fails once the controller has stopped, which only
        // happens after every handle is dropped.
        let _ = self.input_tx.send(term.into());
    }

    /// Subscribe to state updates. The receiver always holds the latest
    /// published state.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_rx.clone()
    }
}

pub struct SearchController {
    api: Arc<dyn MovieApi>,
    recorder: Arc<TrendRecorder>,
    debounce: Duration,
}

impl SearchController {
    pub fn new(api: Arc<dyn MovieApi>, recorder: Arc<TrendRecorder>, debounce: Duration) -> Self {
        Self {
            api,
            recorder,
            debounce,
        }
    }

    /// Spawn the controller task and hand back its control handle.
    ///
    /// The initial empty term is fetched immediately, mirroring a first
    /// render of the discover feed.
    pub fn spawn(self) -> (SearchHandle, JoinHandle<()>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::default());
        let handle = SearchHandle { input_tx, state_rx };
        let task = tokio::spawn(self.run(input_rx, state_tx));
        (handle, task)
    }

    async fn run(
        self,
        mut input_rx: mpsc::UnboundedReceiver<String>,
        state_tx: watch::Sender<SearchState>,
    ) {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut state = SearchState::default();
        let mut generation: u64 = 0;

        // The empty debounced term issues the mount fetch.
        self.launch_fetch(&mut generation, &mut state, &outcome_tx);
        let _ = state_tx.send(state.clone());

        let debounce = sleep(self.debounce);
        tokio::pin!(debounce);
        let mut debounce_armed = false;

        loop {
            tokio::select! {
                event = input_rx.recv() => match event {
                    Some(term) => {
                        state.raw_term = term;
                        debounce.as_mut().reset(Instant::now() + self.debounce);
                        debounce_armed = true;
                        let _ = state_tx.send(state.clone());
                    }
                    // Every handle is gone; nothing can observe further state.
                    None => break,
                },
                () = &mut debounce, if debounce_armed => {
                    debounce_armed = false;
                    // Settling on the term already fetched is not a change.
                    if state.debounced_term != state.raw_term {
                        state.debounced_term = state.raw_term.clone();
                        self.launch_fetch(&mut generation, &mut state, &outcome_tx);
                        let _ = state_tx.send(state.clone());
                    }
                }
                Some(outcome) = outcome_rx.recv() => {
                    if outcome.generation == generation {
                        self.commit(&mut state, outcome);
                        let _ = state_tx.send(state.clone());
                    } else {
                        debug!("discarding stale results for {:?}", outcome.term);
                    }
                }
            }
        }
    }

    /// Tag a fetch with the next generation and run it as its own task.
    fn launch_fetch(
        &self,
        generation: &mut u64,
        state: &mut SearchState,
        outcome_tx: &mpsc::UnboundedSender<FetchOutcome>,
    ) {
        *generation += 1;
        let tag = *generation;
        let term = state.debounced_term.clone();
        state.is_loading = true;
        state.error = None;

        let api = Arc::clone(&self.api);
        let tx = outcome_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_movies(&term).await;
            // The controller may have stopped while this was in flight.
            let _ = tx.send(FetchOutcome {
                generation: tag,
                term,
                result,
            });
        });
    }

    /// Apply the outcome of the current fetch. Runs on every settle path,
    /// so `is_loading` is always cleared.
    fn commit(&self, state: &mut SearchState, outcome: FetchOutcome) {
        state.is_loading = false;
        match outcome.result {
            Ok(movies) => {
                state.error = None;
                state.results = movies;
                if !outcome.term.is_empty() {
                    if let Some(top) = state.results.first().cloned() {
                        self.record(outcome.term, top);
                    }
                }
            }
            Err(e) => {
                match &e {
                    FetchError::Status { code } => {
                        debug!("metadata fetch returned status {code}");
                    }
                    FetchError::Transport { detail } => {
                        debug!("metadata fetch failed: {detail}");
                    }
                    FetchError::Api { .. } => {}
                }
                state.error = Some(e.to_string());
                state.results = Vec::new();
            }
        }
    }

    /// Fire-and-forget: trend recording runs detached with the log as its
    /// error channel, so a store outage never touches `SearchState`.
    fn record(&self, term: String, movie: Movie) {
        let recorder = Arc::clone(&self.recorder);
        tokio::spawn(async move {
            if let Err(e) = recorder.record_search(&term, &movie).await {
                warn!("failed to record search {term:?}: {e:#}");
            }
        });
    }
}
