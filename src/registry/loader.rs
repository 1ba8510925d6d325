//! What a tracked slot fetches for its entity.

use async_trait::async_trait;

use crate::fetch::{FetchError, StatsService};
use crate::models::{EntityKind, Range, RosterPlayer, TrendData};

/// Fetches the data shown for one tracked entity at a range.
#[async_trait]
pub trait Loader: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    fn kind(&self) -> EntityKind;

    async fn load(
        &self,
        service: &dyn StatsService,
        id: u32,
        range: Range,
    ) -> Result<Self::Data, FetchError>;
}

/// Player trends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendsLoader;

#[async_trait]
impl Loader for TrendsLoader {
    type Data = TrendData;

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    async fn load(
        &self,
        service: &dyn StatsService,
        id: u32,
        range: Range,
    ) -> Result<TrendData, FetchError> {
        let trends = service.player_trends(id, range).await?;
        if trends.player_id != id || trends.range != range {
            return Err(FetchError::Mismatch(format!(
                "trends for player {} at {}, asked for {} at {}",
                trends.player_id, trends.range, id, range
            )));
        }
        Ok(trends)
    }
}

/// Team roster with per-player summaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterLoader;

#[async_trait]
impl Loader for RosterLoader {
    type Data = Vec<RosterPlayer>;

    fn kind(&self) -> EntityKind {
        EntityKind::Team
    }

    async fn load(
        &self,
        service: &dyn StatsService,
        id: u32,
        range: Range,
    ) -> Result<Vec<RosterPlayer>, FetchError> {
        let roster = service.team_roster(id, range).await?;
        if roster.team_id != id || roster.range != range {
            return Err(FetchError::Mismatch(format!(
                "roster for team {} at {}, asked for {} at {}",
                roster.team_id, roster.range, id, range
            )));
        }
        Ok(roster.players)
    }
}
