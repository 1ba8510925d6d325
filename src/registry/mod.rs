//! Tracked-entity registry.
//!
//! Holds the players and teams the user is comparing, each with the state of
//! its latest fetch at the registry's current range. Every fetch is an
//! independent task tagged with a generation drawn from one registry-wide
//! counter; only the most recently issued fetch for an entity is applied.

mod list;
mod loader;

pub use list::TrackedList;
pub use loader::{Loader, RosterLoader, TrendsLoader};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::fetch::StatsService;
use crate::models::{EntityRef, Range, TrackedPlayer, TrackedTeam};

pub struct Registry {
    range: RwLock<Range>,
    players: TrackedList<TrendsLoader>,
    teams: TrackedList<RosterLoader>,
}

impl Registry {
    pub fn new(service: Arc<dyn StatsService>, range: Range) -> Self {
        let generations = Arc::new(AtomicU64::new(0));
        Self {
            range: RwLock::new(range),
            players: TrackedList::new(TrendsLoader, Arc::clone(&service), Arc::clone(&generations)),
            teams: TrackedList::new(RosterLoader, service, generations),
        }
    }

    pub async fn range(&self) -> Range {
        *self.range.read().await
    }

    /// Track a player at the current range. No-op if already tracked.
    ///
    /// The range stays locked until the player is in the list, so a
    /// concurrent `set_range` either precedes the add or refetches it.
    pub async fn add_player(&self, player: EntityRef) -> bool {
        let range = self.range.read().await;
        self.players.add(player, *range).await
    }

    /// Track a team at the current range. No-op if already tracked.
    pub async fn add_team(&self, team: EntityRef) -> bool {
        let range = self.range.read().await;
        self.teams.add(team, *range).await
    }

    pub async fn remove_player(&self, id: u32) -> bool {
        self.players.remove(id).await
    }

    pub async fn remove_team(&self, id: u32) -> bool {
        self.teams.remove(id).await
    }

    /// Switch range and refetch everything tracked. No-op for the current range.
    pub async fn set_range(&self, range: Range) {
        {
            let mut current = self.range.write().await;
            if *current == range {
                return;
            }
            *current = range;
        }

        info!(
            "Range set to {}, refetching {} players and {} teams",
            range,
            self.players.len().await,
            self.teams.len().await
        );
        self.players.refetch_all(range).await;
        self.teams.refetch_all(range).await;
    }

    /// Rebuild the tracked set from scratch at the current range.
    pub async fn replace_all(&self, players: Vec<EntityRef>, teams: Vec<EntityRef>) {
        let range = self.range.read().await;
        self.players.replace_all(players, *range).await;
        self.teams.replace_all(teams, *range).await;
    }

    /// Rebuild the tracked set at `range`, which becomes the current range.
    pub async fn rebuild_at(&self, players: Vec<EntityRef>, teams: Vec<EntityRef>, range: Range) {
        let mut current = self.range.write().await;
        *current = range;
        let current = current.downgrade();
        self.players.replace_all(players, *current).await;
        self.teams.replace_all(teams, *current).await;
    }

    pub async fn players(&self) -> Vec<TrackedPlayer> {
        self.players.snapshot().await
    }

    pub async fn teams(&self) -> Vec<TrackedTeam> {
        self.teams.snapshot().await
    }

    pub async fn is_empty(&self) -> bool {
        self.players.is_empty().await && self.teams.is_empty().await
    }

    /// Wait for every in-flight fetch to be applied or discarded.
    pub async fn settle(&self) {
        self.players.settle().await;
        self.teams.settle().await;
    }
}
