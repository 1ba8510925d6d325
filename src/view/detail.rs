//! Player detail: stat cards and per-stat trend tables for one range.

use tracing::warn;

use crate::fetch::StatsService;
use crate::models::{Direction, GameLog, Range, Stat, StatsData, TrendData};

use super::{table, DETAIL_FAILED};

/// Headline card for one stat.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub stat: Stat,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub games: u32,
    pub direction: Direction,
}

impl StatCard {
    pub fn render(&self) -> String {
        format!(
            "{:<5} {:>6}  {} {}\n      Min {} / Max {} · {} games",
            self.stat.label(),
            self.avg,
            self.direction.card_arrow(),
            self.direction,
            self.min,
            self.max,
            self.games
        )
    }
}

/// One game on a stat's trend line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub value: Option<f64>,
    pub r5: Option<f64>,
    pub r10: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendTable {
    pub stat: Stat,
    pub points: Vec<TrendPoint>,
}

impl TrendTable {
    pub fn render(&self) -> String {
        let mut records = vec![vec![
            "Date".to_string(),
            self.stat.label().to_string(),
            "5-game avg".to_string(),
            "10-game avg".to_string(),
        ]];
        for point in &self.points {
            records.push(vec![
                point.date.clone(),
                optional(point.value),
                optional(point.r5),
                optional(point.r10),
            ]);
        }
        format!("{}\n{}", self.stat.label(), table(records))
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn game_date(game: &GameLog) -> String {
    match game.date() {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => game.game_date.clone().unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerDetail {
    Loaded {
        player_id: u32,
        range: Range,
        cards: Vec<StatCard>,
        trends: Vec<TrendTable>,
    },
    Failed,
}

impl PlayerDetail {
    /// Fetch stats and trends together. Either failing fails the view.
    pub async fn load(service: &dyn StatsService, player_id: u32, range: Range) -> Self {
        let result = tokio::try_join!(
            service.player_stats(player_id, range),
            service.player_trends(player_id, range)
        );
        match result {
            Ok((stats, trends)) => Self::from_parts(&stats, &trends),
            Err(e) => {
                warn!("Failed to load player {} at {}: {}", player_id, range, e);
                PlayerDetail::Failed
            }
        }
    }

    pub fn from_parts(stats: &StatsData, trends: &TrendData) -> Self {
        let cards = Stat::DETAIL_ORDER
            .iter()
            .filter_map(|stat| {
                let summary = trends.summary.get(stat)?;
                Some(StatCard {
                    stat: *stat,
                    avg: summary.avg,
                    min: summary.min,
                    max: summary.max,
                    games: summary.games,
                    direction: trends.direction.get(stat).copied().unwrap_or_default(),
                })
            })
            .collect();

        let tables = Stat::DETAIL_ORDER
            .iter()
            .filter_map(|stat| {
                let rolling = trends.rolling.get(stat)?;
                let points = stats
                    .games
                    .iter()
                    .enumerate()
                    .map(|(i, game)| TrendPoint {
                        date: game_date(game),
                        value: stat.value_in(game),
                        r5: rolling.r5.get(i).copied(),
                        r10: rolling.r10.get(i).copied(),
                    })
                    .collect();
                Some(TrendTable {
                    stat: *stat,
                    points,
                })
            })
            .collect();

        PlayerDetail::Loaded {
            player_id: trends.player_id,
            range: trends.range,
            cards,
            trends: tables,
        }
    }

    pub fn render(&self) -> String {
        match self {
            PlayerDetail::Failed => DETAIL_FAILED.to_string(),
            PlayerDetail::Loaded {
                player_id,
                range,
                cards,
                trends,
            } => {
                let mut sections = vec![format!("Player #{} · {}", player_id, range.label())];
                sections.push(
                    cards
                        .iter()
                        .map(StatCard::render)
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
                sections.extend(trends.iter().map(TrendTable::render));
                sections.join("\n\n")
            }
        }
    }
}
