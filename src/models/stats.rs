//! Statistics service data contracts.
//!
//! Every response envelope is strict: required fields must be present and
//! unknown fields are rejected.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityKind, EntityRef, Range, SortKey};

/// Statistics tracked per player by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stat {
    Pts,
    Reb,
    Ast,
    Blk,
    Stl,
    Tov,
    Fg3m,
    Ftm,
}

impl Stat {
    /// Order used by the player detail cards and charts.
    pub const DETAIL_ORDER: [Stat; 8] = [
        Stat::Pts,
        Stat::Reb,
        Stat::Ast,
        Stat::Blk,
        Stat::Stl,
        Stat::Tov,
        Stat::Fg3m,
        Stat::Ftm,
    ];

    /// Order used by comparison table columns.
    pub const TABLE_ORDER: [Stat; 8] = [
        Stat::Pts,
        Stat::Reb,
        Stat::Ast,
        Stat::Fg3m,
        Stat::Blk,
        Stat::Stl,
        Stat::Tov,
        Stat::Ftm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stat::Pts => "PTS",
            Stat::Reb => "REB",
            Stat::Ast => "AST",
            Stat::Blk => "BLK",
            Stat::Stl => "STL",
            Stat::Tov => "TOV",
            Stat::Fg3m => "FG3M",
            Stat::Ftm => "FTM",
        }
    }

    /// Raw per-game value of this stat in a game log row.
    pub fn value_in(&self, game: &GameLog) -> Option<f64> {
        match self {
            Stat::Pts => game.pts,
            Stat::Reb => game.reb,
            Stat::Ast => game.ast,
            Stat::Blk => game.blk,
            Stat::Stl => game.stl,
            Stat::Tov => game.tov,
            Stat::Fg3m => game.fg3m,
            Stat::Ftm => game.ftm,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Trend classification computed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Stable,
}

impl Direction {
    /// Arrow shown next to a comparison-table value. Stable shows nothing.
    pub fn table_arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Stable => "",
        }
    }

    /// Arrow shown on a player detail stat card.
    pub fn card_arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Stable => "→",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stable => write!(f, "stable"),
        }
    }
}

/// Aggregate of one stat over the selected range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub games: u32,
}

/// Precomputed 5- and 10-game rolling averages, one point per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollingSeries {
    pub r5: Vec<f64>,
    pub r10: Vec<f64>,
}

pub type SummaryMap = BTreeMap<Stat, StatSummary>;
pub type DirectionMap = BTreeMap<Stat, Direction>;

/// `GET /players/{id}/trends` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendData {
    pub player_id: u32,
    pub range: Range,
    pub rolling: BTreeMap<Stat, RollingSeries>,
    pub direction: DirectionMap,
    pub summary: SummaryMap,
}

/// One row of a player's game log. Every column is optional because the
/// upstream source omits or nulls columns it has no data for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameLog {
    #[serde(rename = "GAME_DATE", default)]
    pub game_date: Option<String>,
    #[serde(rename = "MATCHUP", default)]
    pub matchup: Option<String>,
    #[serde(rename = "WL", default)]
    pub wl: Option<String>,
    #[serde(rename = "MIN", default)]
    pub min: Option<f64>,
    #[serde(rename = "PTS", default)]
    pub pts: Option<f64>,
    #[serde(rename = "REB", default)]
    pub reb: Option<f64>,
    #[serde(rename = "AST", default)]
    pub ast: Option<f64>,
    #[serde(rename = "BLK", default)]
    pub blk: Option<f64>,
    #[serde(rename = "STL", default)]
    pub stl: Option<f64>,
    #[serde(rename = "TOV", default)]
    pub tov: Option<f64>,
    #[serde(rename = "FG3M", default)]
    pub fg3m: Option<f64>,
    #[serde(rename = "FTM", default)]
    pub ftm: Option<f64>,
    #[serde(rename = "FGM", default)]
    pub fgm: Option<f64>,
    #[serde(rename = "FGA", default)]
    pub fga: Option<f64>,
    #[serde(rename = "FG_PCT", default)]
    pub fg_pct: Option<f64>,
    #[serde(rename = "FG3A", default)]
    pub fg3a: Option<f64>,
    #[serde(rename = "FG3_PCT", default)]
    pub fg3_pct: Option<f64>,
    #[serde(rename = "FTA", default)]
    pub fta: Option<f64>,
    #[serde(rename = "FT_PCT", default)]
    pub ft_pct: Option<f64>,
    #[serde(rename = "PLUS_MINUS", default)]
    pub plus_minus: Option<f64>,
}

impl GameLog {
    /// Game date parsed from the upstream `"OCT 22, 2024"` format.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.game_date.as_deref()?;
        NaiveDate::parse_from_str(&title_case_month(raw), "%b %d, %Y").ok()
    }
}

// Upstream sends "OCT"; normalise to "Oct" before handing to %b.
fn title_case_month(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.trim().chars().enumerate() {
        if i > 0 && i < 3 {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `GET /players/{id}/stats` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsData {
    pub player_id: u32,
    pub range: Range,
    pub games: Vec<GameLog>,
    pub summary: SummaryMap,
}

/// A roster entry with its per-range summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterPlayer {
    pub player_id: u32,
    pub name: String,
    pub position: String,
    pub number: String,
    pub summary: SummaryMap,
    pub direction: DirectionMap,
}

impl RosterPlayer {
    /// `#23 F` style subtitle, absent when the position is unknown.
    pub fn subtitle(&self) -> Option<String> {
        if self.position.is_empty() {
            None
        } else {
            Some(format!("#{} {}", self.number, self.position))
        }
    }
}

/// `GET /teams/{id}/roster` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterData {
    pub team_id: u32,
    pub range: Range,
    pub players: Vec<RosterPlayer>,
}

/// A player search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerHit {
    pub id: u32,
    pub full_name: String,
    pub is_active: bool,
}

/// A team search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamHit {
    pub id: u32,
    pub full_name: String,
    pub abbreviation: String,
}

/// A search match of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    Player(PlayerHit),
    Team(TeamHit),
}

impl SearchHit {
    pub fn kind(&self) -> EntityKind {
        match self {
            SearchHit::Player(_) => EntityKind::Player,
            SearchHit::Team(_) => EntityKind::Team,
        }
    }

    pub fn entity(&self) -> EntityRef {
        match self {
            SearchHit::Player(p) => EntityRef::new(p.id, p.full_name.clone()),
            SearchHit::Team(t) => EntityRef::new(t.id, t.full_name.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSearchResponse {
    pub players: Vec<PlayerHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamSearchResponse {
    pub teams: Vec<TeamHit>,
}

/// Leaderboard row: per-game averages over the current season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopPlayer {
    pub player_id: u32,
    pub name: String,
    pub team: String,
    pub gp: u32,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub blk: f64,
    pub stl: f64,
    pub tov: f64,
    pub fg3m: f64,
    pub fg3_pct: f64,
    pub ftm: f64,
}

impl TopPlayer {
    /// Value of a leaderboard column.
    pub fn value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Pts => self.pts,
            SortKey::Reb => self.reb,
            SortKey::Ast => self.ast,
            SortKey::Fg3m => self.fg3m,
            SortKey::Fg3Pct => self.fg3_pct,
            SortKey::Blk => self.blk,
            SortKey::Stl => self.stl,
            SortKey::Tov => self.tov,
            SortKey::Ftm => self.ftm,
            SortKey::Gp => self.gp as f64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopPlayersResponse {
    pub players: Vec<TopPlayer>,
}

/// Standings row, pre-ordered by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamStanding {
    pub team_id: u32,
    pub city: String,
    pub name: String,
    pub conference: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub record: String,
    pub home: String,
    pub road: String,
    pub l10: String,
    pub streak: String,
    pub ppg: f64,
    pub opp_ppg: f64,
    pub diff: f64,
}

impl TeamStanding {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandingsResponse {
    pub teams: Vec<TeamStanding>,
}
