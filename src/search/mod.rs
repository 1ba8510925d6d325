//! Debounced entity search.
//!
//! Each keystroke replaces the pending delayed search. A search runs only
//! once the input has been quiet for the debounce delay, and its results
//! are applied only if no newer input or change of kind arrived meanwhile.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, warn};

use crate::fetch::{FetchError, StatsService};
use crate::models::{EntityKind, SearchHit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub debounce: Duration,
    /// Queries shorter than this, in characters, never reach the service.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(350),
            min_query_len: 2,
        }
    }
}

/// What the search box shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Kind of entity the query and results refer to.
    pub kind: EntityKind,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub loading: bool,
}

#[derive(Default)]
struct Shared {
    state: SearchState,
    generation: u64,
}

#[derive(Default)]
struct Timers {
    tasks: JoinSet<()>,
    pending: Option<AbortHandle>,
}

impl Timers {
    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        while self.tasks.try_join_next().is_some() {}
    }
}

pub struct EntitySearch {
    service: Arc<dyn StatsService>,
    config: SearchConfig,
    shared: Arc<Mutex<Shared>>,
    timers: Mutex<Timers>,
}

impl EntitySearch {
    pub fn new(service: Arc<dyn StatsService>, config: SearchConfig) -> Self {
        Self {
            service,
            config,
            shared: Arc::new(Mutex::new(Shared::default())),
            timers: Mutex::new(Timers::default()),
        }
    }

    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn lock_timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record new input and reschedule the delayed search.
    pub fn input(&self, kind: EntityKind, query: &str) {
        let generation = {
            let mut shared = self.lock_shared();
            shared.generation += 1;
            if shared.state.kind != kind {
                shared.state.kind = kind;
                shared.state.results.clear();
                shared.state.loading = false;
            }
            shared.state.query = query.to_string();
            if query.chars().count() < self.config.min_query_len {
                shared.state.results.clear();
                shared.state.loading = false;
                None
            } else {
                Some(shared.generation)
            }
        };

        let mut timers = self.lock_timers();
        timers.cancel();
        let Some(generation) = generation else {
            return;
        };

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let debounce = self.config.debounce;
        let query = query.to_string();
        let handle = timers.tasks.spawn(async move {
            tokio::time::sleep(debounce).await;
            run_search(service.as_ref(), &shared, kind, &query, generation).await;
        });
        timers.pending = Some(handle);
    }

    /// Search the current query for another kind of entity.
    ///
    /// Results for the previous kind are dropped at once and any pending
    /// search for it is cancelled.
    pub fn retarget(&self, kind: EntityKind) {
        let query = {
            let shared = self.lock_shared();
            if shared.state.kind == kind {
                return;
            }
            shared.state.query.clone()
        };
        self.input(kind, &query);
    }

    /// Take the hit at `index` and reset the search box.
    ///
    /// A hit of another kind than the one currently searched is refused.
    pub fn select(&self, index: usize) -> Option<SearchHit> {
        let hit = {
            let shared = self.lock_shared();
            shared
                .state
                .results
                .get(index)
                .filter(|hit| hit.kind() == shared.state.kind)
                .cloned()
        };
        if hit.is_some() {
            self.clear();
        }
        hit
    }

    /// Empty the query and results and drop any pending search.
    pub fn clear(&self) {
        {
            let mut shared = self.lock_shared();
            shared.generation += 1;
            shared.state = SearchState {
                kind: shared.state.kind,
                ..SearchState::default()
            };
        }
        self.lock_timers().cancel();
    }

    pub fn state(&self) -> SearchState {
        self.lock_shared().state.clone()
    }

    pub fn results(&self) -> Vec<SearchHit> {
        self.lock_shared().state.results.clone()
    }

    pub fn kind(&self) -> EntityKind {
        self.lock_shared().state.kind
    }

    pub fn query(&self) -> String {
        self.lock_shared().state.query.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock_shared().state.loading
    }

    /// Wait for the pending search, if any, to finish.
    pub async fn settle(&self) {
        let mut tasks = std::mem::take(&mut self.lock_timers().tasks);
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                if !e.is_cancelled() {
                    warn!("Search task failed: {}", e);
                }
            }
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

async fn run_search(
    service: &dyn StatsService,
    shared: &Mutex<Shared>,
    kind: EntityKind,
    query: &str,
    generation: u64,
) {
    {
        let mut shared = lock(shared);
        if shared.generation != generation {
            return;
        }
        shared.state.loading = true;
    }

    debug!("Searching {}s for {:?}", kind, query);
    let result: Result<Vec<SearchHit>, FetchError> = match kind {
        EntityKind::Player => service
            .search_players(query)
            .await
            .map(|hits| hits.into_iter().map(SearchHit::Player).collect()),
        EntityKind::Team => service
            .search_teams(query)
            .await
            .map(|hits| hits.into_iter().map(SearchHit::Team).collect()),
    };

    let mut shared = lock(shared);
    if shared.generation != generation || shared.state.kind != kind {
        debug!("Discarding stale search results for {:?}", query);
        return;
    }
    shared.state.loading = false;
    shared.state.results = match result {
        Ok(hits) => hits,
        Err(e) => {
            warn!("Search for {:?} failed: {}", query, e);
            Vec::new()
        }
    };
}
