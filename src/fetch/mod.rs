//! Statistics service client.
//!
//! The service is consumed, not implemented here. `StatsService` is the seam
//! every stateful component talks through; `HttpStatsClient` is the reqwest
//! implementation against the `/api` routes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{
    PlayerHit, PlayerSearchResponse, Range, RosterData, SortKey, StandingsResponse, StatsData,
    TeamHit, TeamSearchResponse, TeamStanding, TopPlayer, TopPlayersResponse, TrendData,
};

#[cfg(test)]
pub mod fake;

/// Errors that can occur while talking to the statistics service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Response does not match request: {0}")]
    Mismatch(String),

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Operations exposed by the statistics service.
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn search_players(&self, query: &str) -> Result<Vec<PlayerHit>, FetchError>;

    async fn search_teams(&self, query: &str) -> Result<Vec<TeamHit>, FetchError>;

    /// Top `n` players, sorted server-side by `sort`.
    async fn top_players(&self, n: u32, sort: SortKey) -> Result<Vec<TopPlayer>, FetchError>;

    /// League standings, pre-ordered by the service.
    async fn standings(&self) -> Result<Vec<TeamStanding>, FetchError>;

    async fn player_stats(&self, player_id: u32, range: Range) -> Result<StatsData, FetchError>;

    async fn player_trends(&self, player_id: u32, range: Range)
        -> Result<TrendData, FetchError>;

    async fn team_roster(&self, team_id: u32, range: Range) -> Result<RosterData, FetchError>;
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("courtside/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// reqwest-backed statistics client.
pub struct HttpStatsClient {
    client: Client,
    base: Url,
}

impl HttpStatsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("courtside/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    /// Build an endpoint URL under the base path. Query values are encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET a URL and decode a strict JSON contract.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl StatsService for HttpStatsClient {
    async fn search_players(&self, query: &str) -> Result<Vec<PlayerHit>, FetchError> {
        let url = self.endpoint(&["players", "search"], &[("q", query)])?;
        let body: PlayerSearchResponse = self.get_json(url).await?;
        Ok(body.players)
    }

    async fn search_teams(&self, query: &str) -> Result<Vec<TeamHit>, FetchError> {
        let url = self.endpoint(&["teams", "search"], &[("q", query)])?;
        let body: TeamSearchResponse = self.get_json(url).await?;
        Ok(body.teams)
    }

    async fn top_players(&self, n: u32, sort: SortKey) -> Result<Vec<TopPlayer>, FetchError> {
        let n = n.to_string();
        let url = self.endpoint(
            &["players", "top"],
            &[("n", n.as_str()), ("sort_by", sort.key())],
        )?;
        let body: TopPlayersResponse = self.get_json(url).await?;
        Ok(body.players)
    }

    async fn standings(&self) -> Result<Vec<TeamStanding>, FetchError> {
        let url = self.endpoint(&["teams", "standings"], &[])?;
        let body: StandingsResponse = self.get_json(url).await?;
        Ok(body.teams)
    }

    async fn player_stats(&self, player_id: u32, range: Range) -> Result<StatsData, FetchError> {
        let id = player_id.to_string();
        let url = self.endpoint(&["players", id.as_str(), "stats"], &[("range", range.key())])?;
        self.get_json(url).await
    }

    async fn player_trends(
        &self,
        player_id: u32,
        range: Range,
    ) -> Result<TrendData, FetchError> {
        let id = player_id.to_string();
        let url = self.endpoint(&["players", id.as_str(), "trends"], &[("range", range.key())])?;
        self.get_json(url).await
    }

    async fn team_roster(&self, team_id: u32, range: Range) -> Result<RosterData, FetchError> {
        let id = team_id.to_string();
        let url = self.endpoint(&["teams", id.as_str(), "roster"], &[("range", range.key())])?;
        self.get_json(url).await
    }
}
