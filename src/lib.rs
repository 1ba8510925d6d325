//! # Courtside
//!
//! Client core for a basketball statistics service: compare players and
//! team rosters over a lookback range, browse the league leaderboard and
//! standings, and keep a persisted set of favorites.
//!
//! ## Architecture
//!
//! - **models**: Identities, selectors and service data contracts
//! - **fetch**: Statistics service trait and its HTTP client
//! - **storage**: Key-value persistence (file and in-memory)
//! - **favorites**: Persisted favorite players and teams
//! - **search**: Debounced player/team search
//! - **registry**: Tracked entities with generation-guarded fetches
//! - **leaderboard**: Top players and standings
//! - **dashboard**: Mode and range orchestration over the components above
//! - **view**: Plain-text tables for the dashboard and player detail
//! - **config**: Configuration loading and validation

pub mod config;
pub mod dashboard;
pub mod favorites;
pub mod fetch;
pub mod leaderboard;
pub mod models;
pub mod registry;
pub mod search;
pub mod storage;
pub mod view;

pub use models::*;
