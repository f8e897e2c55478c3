//! Tee-Time Board
//!
//! Holds the most recently loaded list of tee times together with the
//! `loading` and `error` flags a view renders from.
//!
//! Every load issues a new generation number. Only the response belonging
//! to the latest generation is applied; earlier responses that arrive
//! afterwards are dropped, so overlapping loads cannot overwrite newer
//! results.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{FetchError, FetchErrorKind};
use super::http::TeeTimeFetcher;
use crate::teetime::{TeeTimeRecord, TeeTimeSource};

/// View state of the board
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Current list, replaced wholesale by each successful load
    pub tee_times: Vec<TeeTimeRecord>,
    /// True while the latest load is in flight
    pub loading: bool,
    /// User-visible error message, empty when none
    pub error: String,
    /// Cause of the last failed load
    pub last_failure: Option<FetchErrorKind>,
    /// Source the current list came from
    pub source: Option<TeeTimeSource>,
    /// When the current list was received
    pub updated_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl BoardState {
    /// Whether the last load left a user-visible error
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Generation of the most recently issued load
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a load's response
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Records replaced the current list
    Applied,
    /// The load failed; the previous list was kept
    Failed(FetchError),
    /// A newer load was issued before this one resolved
    Stale,
}

/// Loads tee times from a fetcher into shared view state
pub struct TeeTimeBoard {
    fetcher: Arc<dyn TeeTimeFetcher>,
    state: Arc<RwLock<BoardState>>,
}

impl TeeTimeBoard {
    pub fn new(fetcher: Arc<dyn TeeTimeFetcher>) -> Self {
        Self {
            fetcher,
            state: Arc::new(RwLock::new(BoardState::default())),
        }
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> BoardState {
        self.state.read().await.clone()
    }

    pub async fn load_all(&self) -> LoadOutcome {
        self.load(TeeTimeSource::All).await
    }

    pub async fn load_chronogolf(&self) -> LoadOutcome {
        self.load(TeeTimeSource::ChronoGolf).await
    }

    pub async fn load_foreup(&self) -> LoadOutcome {
        self.load(TeeTimeSource::ForeUp).await
    }

    pub async fn load_eaglewood(&self) -> LoadOutcome {
        self.load(TeeTimeSource::Eaglewood).await
    }

    /// Fetch `source` and apply the result if no newer load was issued
    ///
    /// Dropping the returned future before it resolves ends `loading` for
    /// that load, unless a newer load has taken over.
    pub async fn load(&self, source: TeeTimeSource) -> LoadOutcome {
        let generation = self.begin().await;
        let mut in_flight = InFlight {
            state: Arc::clone(&self.state),
            generation,
            settled: false,
        };

        let result = self.fetcher.fetch(source).await;
        let outcome = self.finish(generation, source, result).await;
        in_flight.settled = true;
        outcome
    }

    async fn begin(&self) -> u64 {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.loading = true;
        state.error.clear();
        state.generation
    }

    async fn finish(
        &self,
        generation: u64,
        source: TeeTimeSource,
        result: Result<Vec<TeeTimeRecord>, FetchError>,
    ) -> LoadOutcome {
        let mut state = self.state.write().await;

        if state.generation != generation {
            tracing::debug!(
                %source,
                generation,
                latest = state.generation,
                "Discarding stale tee-time response"
            );
            return LoadOutcome::Stale;
        }

        state.loading = false;

        match result {
            Ok(records) => {
                tracing::info!(%source, count = records.len(), "Loaded tee times");
                state.tee_times = records;
                state.error.clear();
                state.last_failure = None;
                state.source = Some(source);
                state.updated_at = Some(Utc::now());
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::error!(%source, error = %e, "Error loading tee times");
                state.error = source.failure_message();
                state.last_failure = Some(e.kind());
                LoadOutcome::Failed(e)
            }
        }
    }
}

/// Clears `loading` when a load is abandoned mid-flight
struct InFlight {
    state: Arc<RwLock<BoardState>>,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let generation = self.generation;
        match self.state.try_write() {
            Ok(mut state) => end_abandoned(&mut state, generation),
            Err(_) => {
                // lock is busy; finish the cleanup on the runtime
                let state = Arc::clone(&self.state);
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        end_abandoned(&mut *state.write().await, generation);
                    });
                }
            }
        }
    }
}

fn end_abandoned(state: &mut BoardState, generation: u64) {
    if state.generation == generation && state.loading {
        tracing::debug!(generation, "Tee-time load abandoned before completion");
        state.loading = false;
    }
}
