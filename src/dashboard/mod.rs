//! The comparison dashboard: mode, range, and the components behind them.
//!
//! Two registries are kept apart. One holds what the user picked from
//! search; the other mirrors the favorites set and is rebuilt whenever the
//! favorites view is entered, the range changes inside it, or a favorite
//! is toggled while it is shown.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::favorites::{Favorites, FavoritesStore};
use crate::fetch::StatsService;
use crate::leaderboard::LeaderboardLoader;
use crate::models::{EntityKind, Mode, Range, SearchHit, SortKey};
use crate::registry::Registry;
use crate::search::{EntitySearch, SearchConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    pub top_n: u32,
    pub default_range: Range,
    pub search: SearchConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 50,
            default_range: Range::default(),
            search: SearchConfig::default(),
        }
    }
}

pub struct Dashboard {
    mode: RwLock<Mode>,
    favorites: Arc<FavoritesStore>,
    tracked: Registry,
    favorite_tracked: Registry,
    leaderboard: LeaderboardLoader,
    search: EntitySearch,
}

impl Dashboard {
    pub fn new(
        service: Arc<dyn StatsService>,
        favorites: Arc<FavoritesStore>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            mode: RwLock::new(Mode::default()),
            favorites,
            tracked: Registry::new(Arc::clone(&service), config.default_range),
            favorite_tracked: Registry::new(Arc::clone(&service), config.default_range),
            leaderboard: LeaderboardLoader::new(Arc::clone(&service), config.top_n),
            search: EntitySearch::new(service, config.search),
        }
    }

    /// Initial load: leaderboard by points, and standings.
    pub async fn mount(&self) {
        info!("Loading dashboard");
        tokio::join!(
            self.leaderboard.load_top(SortKey::Pts),
            self.leaderboard.load_standings()
        );
    }

    pub async fn mode(&self) -> Mode {
        *self.mode.read().await
    }

    pub async fn set_mode(&self, mode: Mode) {
        *self.mode.write().await = mode;
        debug!("Mode set to {}", mode.label());

        match mode {
            Mode::Favorites => {
                self.search.clear();
                self.rebuild_favorites().await;
            }
            Mode::Players | Mode::Teams => self.search.retarget(search_kind(mode)),
        }
    }

    pub async fn range(&self) -> Range {
        self.tracked.range().await
    }

    /// Switch range. No-op when `range` is already in effect.
    pub async fn set_range(&self, range: Range) {
        if self.range().await == range {
            return;
        }
        self.tracked.set_range(range).await;
        if self.mode().await == Mode::Favorites {
            self.rebuild_favorites().await;
        }
    }

    pub async fn toggle_favorite(&self, kind: EntityKind, id: u32, name: &str) -> Favorites {
        let favorites = self.favorites.toggle(kind, id, name);
        if self.mode().await == Mode::Favorites {
            self.rebuild_favorites().await;
        }
        favorites
    }

    /// Feed the search box. Ignored in the favorites view, which has none.
    pub async fn search_input(&self, query: &str) {
        let mode = self.mode().await;
        if mode == Mode::Favorites {
            return;
        }
        self.search.input(search_kind(mode), query);
    }

    /// Track the search hit at `index`, if there is one for the current mode.
    pub async fn pick_search_result(&self, index: usize) -> Option<SearchHit> {
        let mode = self.mode().await;
        if mode == Mode::Favorites || self.search.kind() != search_kind(mode) {
            return None;
        }
        let hit = self.search.select(index)?;
        self.select_search_hit(&hit).await;
        Some(hit)
    }

    /// Track a search hit. Returns false if it was already tracked.
    pub async fn select_search_hit(&self, hit: &SearchHit) -> bool {
        match hit {
            SearchHit::Player(_) => self.tracked.add_player(hit.entity()).await,
            SearchHit::Team(_) => self.tracked.add_team(hit.entity()).await,
        }
    }

    pub async fn set_sort(&self, sort: SortKey) -> bool {
        self.leaderboard.set_sort(sort).await
    }

    async fn rebuild_favorites(&self) {
        let favorites = self.favorites.snapshot();
        let range = self.range().await;
        debug!(
            "Rebuilding favorites view with {} entries at {}",
            favorites.len(),
            range
        );
        self.favorite_tracked
            .rebuild_at(favorites.players, favorites.teams, range)
            .await;
    }

    /// Entities picked from search.
    pub fn tracked(&self) -> &Registry {
        &self.tracked
    }

    /// Entities mirrored from favorites.
    pub fn favorite_tracked(&self) -> &Registry {
        &self.favorite_tracked
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn leaderboard(&self) -> &LeaderboardLoader {
        &self.leaderboard
    }

    pub fn search(&self) -> &EntitySearch {
        &self.search
    }

    /// Wait until every in-flight request has been applied or discarded.
    pub async fn settle(&self) {
        self.search.settle().await;
        self.tracked.settle().await;
        self.favorite_tracked.settle().await;
    }
}

fn search_kind(mode: Mode) -> EntityKind {
    match mode {
        Mode::Teams => EntityKind::Team,
        Mode::Players | Mode::Favorites => EntityKind::Player,
    }
}
