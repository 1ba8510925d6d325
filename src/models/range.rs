//! Selector enums: lookback range, leaderboard sort key, dashboard mode.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Statistical lookback window applied to every tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Range {
    #[serde(rename = "3g")]
    Last3Games,
    #[default]
    #[serde(rename = "10g")]
    Last10Games,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
}

impl Range {
    /// All ranges in toggle order.
    pub const ALL: [Range; 5] = [
        Range::Last3Games,
        Range::Last10Games,
        Range::OneMonth,
        Range::ThreeMonths,
        Range::SixMonths,
    ];

    /// Wire key used in `?range=` query parameters.
    pub fn key(&self) -> &'static str {
        match self {
            Range::Last3Games => "3g",
            Range::Last10Games => "10g",
            Range::OneMonth => "1m",
            Range::ThreeMonths => "3m",
            Range::SixMonths => "6m",
        }
    }

    /// Human label for the range toggle.
    pub fn label(&self) -> &'static str {
        match self {
            Range::Last3Games => "Last 3",
            Range::Last10Games => "Last 10",
            Range::OneMonth => "1 Month",
            Range::ThreeMonths => "3 Months",
            Range::SixMonths => "6 Months",
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::ALL
            .iter()
            .copied()
            .find(|r| r.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown range '{}' (expected 3g, 10g, 1m, 3m or 6m)", s))
    }
}

/// Leaderboard column the service sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Pts,
    Reb,
    Ast,
    Fg3m,
    Fg3Pct,
    Blk,
    Stl,
    Tov,
    Ftm,
    Gp,
}

impl SortKey {
    /// Stat columns in table order. `Gp` is rendered separately.
    pub const STAT_COLUMNS: [SortKey; 9] = [
        SortKey::Pts,
        SortKey::Reb,
        SortKey::Ast,
        SortKey::Fg3m,
        SortKey::Fg3Pct,
        SortKey::Blk,
        SortKey::Stl,
        SortKey::Tov,
        SortKey::Ftm,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortKey::Pts => "pts",
            SortKey::Reb => "reb",
            SortKey::Ast => "ast",
            SortKey::Fg3m => "fg3m",
            SortKey::Fg3Pct => "fg3_pct",
            SortKey::Blk => "blk",
            SortKey::Stl => "stl",
            SortKey::Tov => "tov",
            SortKey::Ftm => "ftm",
            SortKey::Gp => "gp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Pts => "PTS",
            SortKey::Reb => "REB",
            SortKey::Ast => "AST",
            SortKey::Fg3m => "3PM",
            SortKey::Fg3Pct => "3P%",
            SortKey::Blk => "BLK",
            SortKey::Stl => "STL",
            SortKey::Tov => "TOV",
            SortKey::Ftm => "FTM",
            SortKey::Gp => "GP",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::STAT_COLUMNS
            .iter()
            .chain(std::iter::once(&SortKey::Gp))
            .copied()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

/// Dashboard mode toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Players,
    Teams,
    Favorites,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Players => "Players",
            Mode::Teams => "Teams",
            Mode::Favorites => "Favorites",
        }
    }
}
