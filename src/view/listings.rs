//! Leaderboard and standings tables.

use crate::leaderboard::{StandingsState, TopPlayersState};
use crate::models::{SortKey, TeamStanding, TopPlayer};

use super::{star, table, STANDINGS_LOADING, TOP_PLAYERS_LOADING};

fn column_label(key: SortKey, sort: SortKey) -> String {
    if key == sort {
        format!("{} ▼", key.label())
    } else {
        key.label().to_string()
    }
}

fn top_value(player: &TopPlayer, key: SortKey) -> String {
    match key {
        SortKey::Fg3Pct => format!("{}%", player.fg3_pct),
        SortKey::Gp => player.gp.to_string(),
        _ => player.value(key).to_string(),
    }
}

pub fn render_top_players(state: &TopPlayersState, is_favorite: &dyn Fn(u32) -> bool) -> String {
    if state.loading {
        return TOP_PLAYERS_LOADING.to_string();
    }

    let mut header = vec![
        String::new(),
        "#".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        column_label(SortKey::Gp, state.sort),
    ];
    header.extend(SortKey::STAT_COLUMNS.iter().map(|k| column_label(*k, state.sort)));

    let mut records = vec![header];
    for (rank, player) in state.players.iter().enumerate() {
        let mut record = vec![
            star(is_favorite(player.player_id)).to_string(),
            (rank + 1).to_string(),
            player.name.clone(),
            player.team.clone(),
            top_value(player, SortKey::Gp),
        ];
        record.extend(SortKey::STAT_COLUMNS.iter().map(|k| top_value(player, *k)));
        records.push(record);
    }
    table(records)
}

fn signed(diff: f64) -> String {
    if diff > 0.0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    }
}

fn standing_record(rank: usize, team: &TeamStanding, favorite: bool) -> Vec<String> {
    vec![
        star(favorite).to_string(),
        rank.to_string(),
        team.full_name(),
        team.conference.clone(),
        team.wins.to_string(),
        team.losses.to_string(),
        format!("{}%", team.win_pct),
        team.home.clone(),
        team.road.clone(),
        team.l10.clone(),
        team.streak.clone(),
        team.ppg.to_string(),
        team.opp_ppg.to_string(),
        signed(team.diff),
    ]
}

pub fn render_standings(state: &StandingsState, is_favorite: &dyn Fn(u32) -> bool) -> String {
    if state.loading {
        return STANDINGS_LOADING.to_string();
    }

    let header = [
        "", "#", "Team", "CONF", "W", "L", "WIN%", "HOME", "ROAD", "L10", "STRK", "PPG", "OPP",
        "DIFF",
    ];
    let mut records = vec![header.iter().map(|h| h.to_string()).collect()];
    records.extend(
        state
            .teams
            .iter()
            .enumerate()
            .map(|(i, team)| standing_record(i + 1, team, is_favorite(team.team_id))),
    );
    table(records)
}
