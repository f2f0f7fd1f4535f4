//! Movie metadata API client.
//!
//! Talks to a TMDB-shaped HTTP API with bearer-token auth. Two endpoints
//! are consumed: `search/movie` for a non-empty query and
//! `discover/movie?sort_by=popularity.desc` for the empty one. The API can
//! signal an application-level failure inside an HTTP 200 body
//! (`{"Response": "False", "Error": "..."}`), which must be detected
//! before trusting `results`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::TmdbConfig;
use crate::models::Movie;

/// Default user-facing message for HTTP and application-level failures.
const FETCH_FAILED: &str = "Failed to fetch movies";

/// What went wrong during a metadata fetch.
///
/// `Display` renders the exact message shown to the user; transport detail
/// stays in the variant for debug logging only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The API answered with a non-success HTTP status.
    #[error("Failed to fetch movies")]
    Status { code: u16 },

    /// HTTP 200 carrying the application-level failure flag.
    #[error("{message}")]
    Api { message: String },

    /// Network, timeout, or body decode failure.
    #[error("Something went wrong. Please try again later.")]
    Transport { detail: String },
}

/// Abstraction over the metadata API, so the search controller can be
/// driven by scripted implementations in tests.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Fetch movies for `query`. An empty query returns the discover feed
    /// sorted by descending popularity.
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError>;
}

/// Top-level response shape of both endpoints.
#[derive(Debug, Deserialize)]
struct MoviePage {
    #[serde(default)]
    results: Vec<Movie>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Map a decoded page to results, surfacing the in-band failure flag.
fn interpret_page(page: MoviePage) -> Result<Vec<Movie>, FetchError> {
    if page.response.as_deref() == Some("False") {
        return Err(FetchError::Api {
            message: page.error.unwrap_or_else(|| FETCH_FAILED.to_string()),
        });
    }
    Ok(page.results)
}

/// HTTP client for the metadata API.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a client from configuration.
    ///
    /// The bearer token comes from the config or the `TMDB_API_KEY`
    /// environment variable. The request timeout is enforced here; a
    /// timed-out fetch surfaces as the generic transport error.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => match std::env::var("TMDB_API_KEY") {
                Ok(key) => key,
                Err(_) => bail!("TMDB_API_KEY environment variable not set"),
            },
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        // Binary endpoint branch, not a fallback chain.
        let request = if query.is_empty() {
            self.http
                .get(format!("{}/discover/movie", self.base_url))
                .query(&[("sort_by", "popularity.desc")])
        } else {
            self.http
                .get(format!("{}/search/movie", self.base_url))
                .query(&[("query", query)])
        };

        let response = request
            .header("accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let page: MoviePage = response.json().await.map_err(|e| FetchError::Transport {
            detail: e.to_string(),
        })?;

        interpret_page(page)
    }
}
