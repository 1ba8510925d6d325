//! In-memory statistics service for tests.
//!
//! Records every call, synthesizes deterministic responses, and can delay or
//! fail individual requests so tests can force out-of-order resolution.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, StatsService};
use crate::models::{
    Direction, PlayerHit, Range, RollingSeries, RosterData, RosterPlayer, SortKey, Stat,
    StatSummary, StatsData, TeamHit, TeamStanding, TopPlayer, TrendData,
};

/// A recorded service call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SearchPlayers(String),
    SearchTeams(String),
    Top { n: u32, sort: SortKey },
    Standings,
    Stats(u32, Range),
    Trends(u32, Range),
    Roster(u32, Range),
}

/// How a response deviates from the request it answers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Misreport {
    Id,
    Range,
}

#[derive(Default)]
pub struct FakeService {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<u32>>,
    delays: Mutex<HashMap<(u32, Range), Duration>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    top_delays: Mutex<HashMap<SortKey, Duration>>,
    misreports: Mutex<HashMap<u32, Misreport>>,
    fail_listings: Mutex<bool>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every per-entity request for `id` fail with HTTP 500.
    pub fn fail_id(&self, id: u32) {
        self.failing.lock().unwrap().insert(id);
    }

    /// Make top players, standings and search fail.
    pub fn fail_listings(&self) {
        *self.fail_listings.lock().unwrap() = true;
    }

    /// Delay the response for `id` at `range`.
    pub fn delay(&self, id: u32, range: Range, delay: Duration) {
        self.delays.lock().unwrap().insert((id, range), delay);
    }

    /// Delay search responses for `query`.
    pub fn delay_search(&self, query: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    /// Delay top-players responses sorted by `sort`.
    pub fn delay_top(&self, sort: SortKey, delay: Duration) {
        self.top_delays.lock().unwrap().insert(sort, delay);
    }

    /// Answer trends and roster requests for `id` as if for another entity.
    pub fn misreport_id(&self, id: u32) {
        self.misreports.lock().unwrap().insert(id, Misreport::Id);
    }

    /// Answer trends and roster requests for `id` at another range.
    pub fn misreport_range(&self, id: u32) {
        self.misreports.lock().unwrap().insert(id, Misreport::Range);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn entity_call(&self, id: u32, range: Range) -> Result<(), FetchError> {
        let delay = self.delays.lock().unwrap().get(&(id, range)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&id) {
            return Err(server_error());
        }
        Ok(())
    }

    /// The id and range a response for `id` at `range` claims to be for.
    fn answered_as(&self, id: u32, range: Range) -> (u32, Range) {
        match self.misreports.lock().unwrap().get(&id) {
            Some(Misreport::Id) => (id.wrapping_add(1), range),
            Some(Misreport::Range) => (id, other_range(range)),
            None => (id, range),
        }
    }

    fn listing_call(&self) -> Result<(), FetchError> {
        if *self.fail_listings.lock().unwrap() {
            return Err(server_error());
        }
        Ok(())
    }
}

fn other_range(range: Range) -> Range {
    if range == Range::SixMonths {
        Range::Last3Games
    } else {
        Range::SixMonths
    }
}

fn server_error() -> FetchError {
    FetchError::HttpStatus {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

/// PTS average encodes the player id so tests can tell responses apart.
pub fn fake_trends(player_id: u32, range: Range) -> TrendData {
    let summary = StatSummary {
        avg: player_id as f64,
        min: 0.0,
        max: player_id as f64 * 2.0,
        games: 10,
    };
    TrendData {
        player_id,
        range,
        rolling: BTreeMap::from([(
            Stat::Pts,
            RollingSeries {
                r5: vec![summary.avg; 3],
                r10: vec![summary.avg; 3],
            },
        )]),
        direction: BTreeMap::from([(Stat::Pts, Direction::Up)]),
        summary: BTreeMap::from([(Stat::Pts, summary)]),
    }
}

pub fn fake_roster(team_id: u32, range: Range) -> RosterData {
    let players = (1..=2u32)
        .map(|i| {
            let player_id = team_id.wrapping_mul(100).wrapping_add(i);
            RosterPlayer {
                player_id,
                name: format!("Player {}-{}", team_id, i),
                position: "G".to_string(),
                number: i.to_string(),
                summary: fake_trends(player_id, range).summary,
                direction: BTreeMap::new(),
            }
        })
        .collect();
    RosterData {
        team_id,
        range,
        players,
    }
}

pub fn fake_top(n: u32, sort: SortKey) -> Vec<TopPlayer> {
    (0..n.min(3))
        .map(|i| TopPlayer {
            player_id: 1000 + i,
            name: format!("{}-leader-{}", sort.key(), i + 1),
            team: "LAL".to_string(),
            gp: 60,
            pts: 30.0 - i as f64,
            reb: 10.0,
            ast: 8.0,
            blk: 1.0,
            stl: 1.5,
            tov: 3.0,
            fg3m: 2.5,
            fg3_pct: 37.5,
            ftm: 5.0,
        })
        .collect()
}

pub fn fake_standing(team_id: u32, city: &str, name: &str) -> TeamStanding {
    TeamStanding {
        team_id,
        city: city.to_string(),
        name: name.to_string(),
        conference: "West".to_string(),
        wins: 40,
        losses: 20,
        win_pct: 66.7,
        record: "40-20".to_string(),
        home: "22-8".to_string(),
        road: "18-12".to_string(),
        l10: "7-3".to_string(),
        streak: "W 3".to_string(),
        ppg: 115.2,
        opp_ppg: 108.9,
        diff: 6.3,
    }
}

const PLAYERS: [(u32, &str); 3] = [
    (2544, "LeBron James"),
    (201939, "Stephen Curry"),
    (203999, "Nikola Jokic"),
];
const TEAMS: [(u32, &str, &str); 2] = [
    (1610612747, "Los Angeles Lakers", "LAL"),
    (1610612744, "Golden State Warriors", "GSW"),
];

#[async_trait]
impl StatsService for FakeService {
    async fn search_players(&self, query: &str) -> Result<Vec<PlayerHit>, FetchError> {
        self.record(Call::SearchPlayers(query.to_string()));
        let delay = self.search_delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.listing_call()?;
        let q = query.to_lowercase();
        Ok(PLAYERS
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&q))
            .map(|(id, name)| PlayerHit {
                id: *id,
                full_name: name.to_string(),
                is_active: true,
            })
            .collect())
    }

    async fn search_teams(&self, query: &str) -> Result<Vec<TeamHit>, FetchError> {
        self.record(Call::SearchTeams(query.to_string()));
        self.listing_call()?;
        let q = query.to_lowercase();
        Ok(TEAMS
            .iter()
            .filter(|(_, name, abbr)| {
                name.to_lowercase().contains(&q) || abbr.to_lowercase().contains(&q)
            })
            .map(|(id, name, abbr)| TeamHit {
                id: *id,
                full_name: name.to_string(),
                abbreviation: abbr.to_string(),
            })
            .collect())
    }

    async fn top_players(&self, n: u32, sort: SortKey) -> Result<Vec<TopPlayer>, FetchError> {
        self.record(Call::Top { n, sort });
        let delay = self.top_delays.lock().unwrap().get(&sort).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.listing_call()?;
        Ok(fake_top(n, sort))
    }

    async fn standings(&self) -> Result<Vec<TeamStanding>, FetchError> {
        self.record(Call::Standings);
        self.listing_call()?;
        Ok(vec![
            fake_standing(1610612760, "Oklahoma City", "Thunder"),
            fake_standing(1610612743, "Denver", "Nuggets"),
        ])
    }

    async fn player_stats(&self, player_id: u32, range: Range) -> Result<StatsData, FetchError> {
        self.record(Call::Stats(player_id, range));
        self.entity_call(player_id, range).await?;
        let trends = fake_trends(player_id, range);
        Ok(StatsData {
            player_id,
            range,
            games: Vec::new(),
            summary: trends.summary,
        })
    }

    async fn player_trends(
        &self,
        player_id: u32,
        range: Range,
    ) -> Result<TrendData, FetchError> {
        self.record(Call::Trends(player_id, range));
        self.entity_call(player_id, range).await?;
        let (player_id, range) = self.answered_as(player_id, range);
        Ok(fake_trends(player_id, range))
    }

    async fn team_roster(&self, team_id: u32, range: Range) -> Result<RosterData, FetchError> {
        self.record(Call::Roster(team_id, range));
        self.entity_call(team_id, range).await?;
        let (team_id, range) = self.answered_as(team_id, range);
        Ok(fake_roster(team_id, range))
    }
}
