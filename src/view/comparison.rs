//! Side-by-side comparison of tracked players and team rosters.

use crate::favorites::Favorites;
use crate::models::{
    Direction, DirectionMap, RosterPlayer, Stat, StatSummary, SummaryMap, TrackedPlayer,
    TrackedTeam,
};

use super::{star, table, COMPARISON_EMPTY, FAVORITES_EMPTY, ROSTER_FAILED, ROSTER_LOADING};

#[derive(Debug, Clone, PartialEq)]
pub enum RowBody {
    Loading,
    Error,
    Stats {
        summary: SummaryMap,
        direction: DirectionMap,
    },
}

/// One comparison table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub id: u32,
    pub name: String,
    pub subtitle: Option<String>,
    pub body: RowBody,
}

impl ComparisonRow {
    pub fn from_tracked(player: &TrackedPlayer) -> Self {
        let body = if player.loading() {
            RowBody::Loading
        } else {
            match player.trends() {
                Some(trends) => RowBody::Stats {
                    summary: trends.summary.clone(),
                    direction: trends.direction.clone(),
                },
                None => RowBody::Error,
            }
        };
        Self {
            id: player.id(),
            name: player.name().to_string(),
            subtitle: None,
            body,
        }
    }

    pub fn from_roster(player: &RosterPlayer) -> Self {
        Self {
            id: player.player_id,
            name: player.name.clone(),
            subtitle: player.subtitle(),
            body: RowBody::Stats {
                summary: player.summary.clone(),
                direction: player.direction.clone(),
            },
        }
    }

    fn label(&self) -> String {
        match &self.subtitle {
            Some(subtitle) => format!("{} {}", self.name, subtitle),
            None => self.name.clone(),
        }
    }

    /// Player, GP and one cell per stat in table order.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.label()];
        match &self.body {
            RowBody::Loading => {
                cells.push("Loading...".to_string());
                cells.extend(Stat::TABLE_ORDER.iter().map(|_| String::new()));
            }
            RowBody::Error => {
                cells.push("Error".to_string());
                cells.extend(Stat::TABLE_ORDER.iter().map(|_| String::new()));
            }
            RowBody::Stats { summary, direction } => {
                cells.push(
                    summary
                        .get(&Stat::Pts)
                        .map(|s| s.games.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
                cells.extend(Stat::TABLE_ORDER.iter().map(|stat| {
                    stat_cell(
                        summary.get(stat),
                        direction.get(stat).copied().unwrap_or_default(),
                    )
                }));
            }
        }
        cells
    }
}

/// `avg` as served, the trend arrow, then the range of the stat.
pub fn stat_cell(summary: Option<&StatSummary>, direction: Direction) -> String {
    match summary {
        Some(s) => format!("{}{} ({}-{})", s.avg, direction.table_arrow(), s.min, s.max),
        None => "-".to_string(),
    }
}

fn header() -> Vec<String> {
    let mut header = vec![String::new(), "Player".to_string(), "GP".to_string()];
    header.extend(Stat::TABLE_ORDER.iter().map(|s| s.label().to_string()));
    header
}

/// Comparison table with a favorite marker per row.
pub fn render_comparison(rows: &[ComparisonRow], is_favorite: &dyn Fn(u32) -> bool) -> String {
    if rows.is_empty() {
        return COMPARISON_EMPTY.to_string();
    }

    let mut records = vec![header()];
    for row in rows {
        let mut record = vec![star(is_favorite(row.id)).to_string()];
        record.extend(row.cells());
        records.push(record);
    }
    table(records)
}

/// Team heading followed by its roster, or the roster's load state.
pub fn render_team_section(
    team: &TrackedTeam,
    favorite: bool,
    is_player_favorite: &dyn Fn(u32) -> bool,
) -> String {
    let heading = format!("{} {}", team.name(), star(favorite));
    let body = if team.loading() {
        ROSTER_LOADING.to_string()
    } else if team.error() {
        ROSTER_FAILED.to_string()
    } else {
        let rows: Vec<ComparisonRow> = team.roster().iter().map(ComparisonRow::from_roster).collect();
        render_comparison(&rows, is_player_favorite)
    };
    format!("{}\n{}", heading, body)
}

/// The favorites view: favorite players, then one section per favorite team.
pub fn render_favorites(
    favorites: &Favorites,
    players: &[TrackedPlayer],
    teams: &[TrackedTeam],
) -> String {
    if favorites.is_empty() {
        return FAVORITES_EMPTY.to_string();
    }

    let is_player_favorite = |id: u32| favorites.players.iter().any(|p| p.id == id);
    let mut sections = Vec::new();
    if !players.is_empty() {
        let rows: Vec<ComparisonRow> = players.iter().map(ComparisonRow::from_tracked).collect();
        sections.push(format!(
            "Favorite Players\n{}",
            render_comparison(&rows, &is_player_favorite)
        ));
    }
    for team in teams {
        sections.push(render_team_section(team, true, &is_player_favorite));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityRef, LoadState, Range, Tracked, TrendData};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn summary(avg: f64, min: f64, max: f64, games: u32) -> StatSummary {
        StatSummary {
            avg,
            min,
            max,
            games,
        }
    }

    fn ready_player(id: u32, name: &str) -> TrackedPlayer {
        let mut player = Tracked::pending(EntityRef::new(id, name), 1);
        player.state = LoadState::Ready(TrendData {
            player_id: id,
            range: Range::Last10Games,
            rolling: BTreeMap::new(),
            direction: BTreeMap::from([(Stat::Pts, Direction::Up), (Stat::Reb, Direction::Down)]),
            summary: BTreeMap::from([
                (Stat::Pts, summary(24.5, 10.0, 40.0, 10)),
                (Stat::Reb, summary(7.1, 2.0, 12.0, 10)),
                (Stat::Ast, summary(8.0, 3.0, 14.0, 10)),
            ]),
        });
        player
    }

    #[test]
    fn test_stat_cell_passes_average_through() {
        let cell = stat_cell(Some(&summary(24.5, 10.0, 40.0, 10)), Direction::Up);
        assert_eq!(cell, "24.5↑ (10-40)");
        assert_eq!(stat_cell(Some(&summary(8.0, 3.0, 14.0, 10)), Direction::Stable), "8 (3-14)");
        assert_eq!(stat_cell(None, Direction::Down), "-");
    }

    #[test]
    fn test_ready_row_cells() {
        let row = ComparisonRow::from_tracked(&ready_player(2544, "LeBron James"));
        let cells = row.cells();

        assert_eq!(cells.len(), 2 + Stat::TABLE_ORDER.len());
        assert_eq!(cells[0], "LeBron James");
        assert_eq!(cells[1], "10");
        assert_eq!(cells[2], "24.5↑ (10-40)");
        assert_eq!(cells[3], "7.1↓ (2-12)");
        assert_eq!(cells[4], "8 (3-14)");
        assert_eq!(cells[5], "-");
    }

    #[test]
    fn test_pending_and_failed_rows() {
        let pending: TrackedPlayer = Tracked::pending(EntityRef::new(1, "A"), 1);
        let mut failed: TrackedPlayer = Tracked::pending(EntityRef::new(2, "B"), 1);
        failed.state = LoadState::Failed;

        assert_eq!(ComparisonRow::from_tracked(&pending).cells()[1], "Loading...");
        assert_eq!(ComparisonRow::from_tracked(&failed).cells()[1], "Error");
    }

    #[test]
    fn test_missing_points_shows_dash_for_games() {
        let row = ComparisonRow {
            id: 1,
            name: "A".to_string(),
            subtitle: None,
            body: RowBody::Stats {
                summary: BTreeMap::from([(Stat::Reb, summary(5.0, 1.0, 9.0, 4))]),
                direction: BTreeMap::new(),
            },
        };
        assert_eq!(row.cells()[1], "-");
    }

    #[test]
    fn test_render_comparison_marks_favorites() {
        let rows = vec![ComparisonRow::from_tracked(&ready_player(2544, "LeBron James"))];
        let rendered = render_comparison(&rows, &|id| id == 2544);

        assert!(rendered.contains("★"));
        assert!(rendered.contains("FG3M"));
        assert!(rendered.contains("24.5↑"));
        assert_eq!(render_comparison(&[], &|_| false), COMPARISON_EMPTY);
    }

    #[test]
    fn test_team_section_states() {
        let mut team: TrackedTeam = Tracked::pending(EntityRef::new(10, "Boston Celtics"), 1);
        assert_eq!(
            render_team_section(&team, false, &|_| false),
            "Boston Celtics ☆\nLoading roster..."
        );

        team.state = LoadState::Failed;
        assert_eq!(
            render_team_section(&team, true, &|_| false),
            "Boston Celtics ★\nFailed to load roster."
        );

        team.state = LoadState::Ready(vec![RosterPlayer {
            player_id: 1628369,
            name: "Jayson Tatum".to_string(),
            position: "F".to_string(),
            number: "0".to_string(),
            summary: BTreeMap::from([(Stat::Pts, summary(27.1, 15.0, 41.0, 10))]),
            direction: BTreeMap::new(),
        }]);
        let rendered = render_team_section(&team, true, &|_| false);
        assert!(rendered.contains("Jayson Tatum #0 F"));
        assert!(rendered.contains("27.1 (15-41)"));
    }

    #[test]
    fn test_favorites_empty_state() {
        assert_eq!(render_favorites(&Favorites::default(), &[], &[]), FAVORITES_EMPTY);
    }

    #[test]
    fn test_favorites_view_lists_players() {
        let favorites = Favorites {
            players: vec![EntityRef::new(2544, "LeBron James")],
            teams: vec![],
        };
        let rendered = render_favorites(&favorites, &[ready_player(2544, "LeBron James")], &[]);

        assert!(rendered.starts_with("Favorite Players\n"));
        assert!(rendered.contains("★"));
    }
}
