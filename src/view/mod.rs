//! Plain-text rendering of the dashboard and player detail views.
//!
//! Renderers are pure: they take snapshots from the registries, loaders and
//! favorites store and return a string. Tables are built with `tabled`.

mod comparison;
mod detail;
mod listings;

pub use comparison::{
    render_comparison, render_favorites, render_team_section, stat_cell, ComparisonRow, RowBody,
};
pub use detail::{PlayerDetail, StatCard, TrendPoint, TrendTable};
pub use listings::{render_standings, render_top_players};

use tabled::builder::Builder;
use tabled::settings::Style;

pub const FAVORITES_EMPTY: &str = "No favorites yet. Star players or teams to add them here.";
pub const COMPARISON_EMPTY: &str = "Search and add players above to compare stats.";
pub const ROSTER_LOADING: &str = "Loading roster...";
pub const ROSTER_FAILED: &str = "Failed to load roster.";
pub const TOP_PLAYERS_LOADING: &str = "Loading top players...";
pub const STANDINGS_LOADING: &str = "Loading standings...";
pub const DETAIL_LOADING: &str = "Loading player data...";
pub const DETAIL_FAILED: &str = "Failed to load player data.";

/// Favorite marker.
pub fn star(favorite: bool) -> &'static str {
    if favorite {
        "★"
    } else {
        "☆"
    }
}

/// Render records as a table, the first record being the header.
fn table(records: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    for record in records {
        builder.push_record(record);
    }
    builder.build().with(Style::rounded()).to_string()
}
