//! League-wide listings: top players by a stat, and team standings.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::fetch::StatsService;
use crate::models::{SortKey, TeamStanding, TopPlayer};

/// Top-players list under one loading gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopPlayersState {
    pub sort: SortKey,
    pub players: Vec<TopPlayer>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsState {
    pub teams: Vec<TeamStanding>,
    pub loading: bool,
}

pub struct LeaderboardLoader {
    service: Arc<dyn StatsService>,
    top_n: u32,
    top: RwLock<TopPlayersState>,
    standings: RwLock<StandingsState>,
    generation: AtomicU64,
}

impl LeaderboardLoader {
    pub fn new(service: Arc<dyn StatsService>, top_n: u32) -> Self {
        Self {
            service,
            top_n,
            top: RwLock::new(TopPlayersState::default()),
            standings: RwLock::new(StandingsState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Fetch the top players sorted by `sort`, replacing the list wholesale.
    ///
    /// When several loads overlap, only the most recently issued one is
    /// applied. A failed load leaves the list empty.
    pub async fn load_top(&self, sort: SortKey) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut top = self.top.write().await;
            top.sort = sort;
            top.loading = true;
        }

        debug!("Loading top {} players by {}", self.top_n, sort);
        let result = self.service.top_players(self.top_n, sort).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding top players by {} (superseded)", sort);
            return;
        }
        let mut top = self.top.write().await;
        top.loading = false;
        top.players = match result {
            Ok(players) => {
                info!("Loaded {} top players by {}", players.len(), sort);
                players
            }
            Err(e) => {
                warn!("Failed to load top players: {}", e);
                Vec::new()
            }
        };
    }

    /// Re-sort the leaderboard. Returns false when `sort` is already active.
    pub async fn set_sort(&self, sort: SortKey) -> bool {
        if self.top.read().await.sort == sort {
            return false;
        }
        self.load_top(sort).await;
        true
    }

    /// Fetch standings, kept in the order the service returns them.
    pub async fn load_standings(&self) {
        self.standings.write().await.loading = true;

        let result = self.service.standings().await;
        let mut standings = self.standings.write().await;
        standings.loading = false;
        standings.teams = match result {
            Ok(teams) => {
                info!("Loaded standings for {} teams", teams.len());
                teams
            }
            Err(e) => {
                warn!("Failed to load standings: {}", e);
                Vec::new()
            }
        };
    }

    pub async fn top(&self) -> TopPlayersState {
        self.top.read().await.clone()
    }

    pub async fn standings(&self) -> StandingsState {
        self.standings.read().await.clone()
    }

    pub async fn sort(&self) -> SortKey {
        self.top.read().await.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::{Call, FakeService};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn loader() -> (Arc<FakeService>, LeaderboardLoader) {
        let service = Arc::new(FakeService::new());
        let loader = LeaderboardLoader::new(service.clone(), 50);
        (service, loader)
    }

    #[tokio::test]
    async fn test_load_top_requests_configured_size() {
        let (service, loader) = loader();

        loader.load_top(SortKey::Pts).await;

        assert_eq!(service.calls(), vec![Call::Top { n: 50, sort: SortKey::Pts }]);
        let top = loader.top().await;
        assert!(!top.loading);
        assert_eq!(top.players.len(), 3);
        assert_eq!(top.players[0].name, "pts-leader-1");
    }

    #[tokio::test]
    async fn test_sort_change_issues_one_request_and_replaces_list() {
        let (service, loader) = loader();
        loader.load_top(SortKey::Pts).await;
        service.clear_calls();

        assert!(loader.set_sort(SortKey::Reb).await);

        assert_eq!(service.calls(), vec![Call::Top { n: 50, sort: SortKey::Reb }]);
        let top = loader.top().await;
        assert_eq!(top.sort, SortKey::Reb);
        assert!(top.players.iter().all(|p| p.name.starts_with("reb-leader")));
    }

    #[tokio::test]
    async fn test_unchanged_sort_is_noop() {
        let (service, loader) = loader();
        loader.load_top(SortKey::Ast).await;
        service.clear_calls();

        assert!(!loader.set_sort(SortKey::Ast).await);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_closes_gate_with_empty_list() {
        let (service, loader) = loader();
        loader.load_top(SortKey::Pts).await;
        assert!(!loader.top().await.players.is_empty());

        service.fail_listings();
        loader.set_sort(SortKey::Blk).await;

        let top = loader.top().await;
        assert!(!top.loading);
        assert!(top.players.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_load_overtaken_by_later_sort_is_discarded() {
        let (service, loader) = loader();
        service.delay_top(SortKey::Pts, Duration::from_secs(2));

        tokio::join!(loader.load_top(SortKey::Pts), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.load_top(SortKey::Reb).await;
        });

        assert_eq!(service.count(|c| matches!(c, Call::Top { .. })), 2);
        let top = loader.top().await;
        assert_eq!(top.sort, SortKey::Reb);
        assert!(!top.loading);
        assert_eq!(top.players.len(), 3);
        assert!(top.players.iter().all(|p| p.name.starts_with("reb-leader")));
    }

    #[tokio::test]
    async fn test_standings_keep_server_order() {
        let (_, loader) = loader();
        assert_eq!(loader.standings().await, StandingsState::default());

        loader.load_standings().await;

        let names: Vec<String> = loader
            .standings()
            .await
            .teams
            .iter()
            .map(|t| t.full_name())
            .collect();
        assert_eq!(names, vec!["Oklahoma City Thunder", "Denver Nuggets"]);
    }
}
