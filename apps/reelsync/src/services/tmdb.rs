//! TMDB (The Movie Database) service client.
//!
//! Provides the remote reads: now-playing movies and movie search.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{TmdbConfig, DEFAULT_TMDB_BASE_URL};
use crate::error::{AppError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// TMDB API client for fetching movie metadata.
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client against the public API.
    ///
    /// Returns an error if the API key is empty or if the HTTP client cannot be built.
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_TMDB_BASE_URL)
    }

    /// Create a new TMDB client against a custom host root, e.g. a local fake.
    ///
    /// The base URL must not include the `/3` version segment.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &TmdbConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(AppError::MissingApiKey)?;
        Self::with_base_url(api_key, config.base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the movies currently playing in theatres.
    pub async fn now_playing(&self) -> Result<Vec<Movie>> {
        tracing::debug!("Fetching TMDB now playing");

        let params = [("api_key", self.api_key.as_str())];
        let response: TmdbSearchResponse<Movie> =
            self.get_with_params("/3/movie/now_playing", &params).await?;
        Ok(response.results)
    }

    /// Search for movies by title.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        tracing::debug!(query = %query, "Searching TMDB movies");

        let params = [("api_key", self.api_key.as_str()), ("query", query)];
        let response: TmdbSearchResponse<Movie> =
            self.get_with_params("/3/search/movie", &params).await?;
        Ok(response.results)
    }

    /// Internal helper to perform GET requests with query parameters and deserialize JSON responses.
    async fn get_with_params<T, P>(&self, path: &str, params: &[P]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
        P: serde::Serialize,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("TMDB request to {} failed: {}", path, e)))?;

        let status = response.status();
        tracing::debug!(path = %path, status = %status, "TMDB response");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized(
                "TMDB API key is invalid or missing".to_string(),
            ));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDB resource not found: {}",
                path
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited(
                "TMDB rate limit exceeded, please try again later".to_string(),
            ));
        }

        if status != reqwest::StatusCode::OK {
            return Err(AppError::UnexpectedStatus {
                step: format!("GET {}", path),
                expected: "200".to_string(),
                actual: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            AppError::Decode(format!(
                "Failed to parse TMDB response from {}: {}",
                path, e
            ))
        })
    }
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Take the first element of a results list.
///
/// `what` names the read in the error when the list is empty.
pub fn first_result<T>(results: Vec<T>, what: &str) -> Result<T> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| AppError::EmptyResults(what.to_string()))
}

// =============================================================================
// Response Types
// =============================================================================

/// Paginated list response wrapper from TMDB API.
#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub total_pages: i32,
    #[serde(default)]
    pub total_results: i32,
}

/// Movie record from TMDB list and search results.
///
/// Serializes back to the same shape, so it can be sent on as a request body.
/// Optional fields that were absent in the source are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adult: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<i64>,
}

impl Movie {
    /// Append the update marker to the title, as sent in the PATCH body.
    pub fn mark_updated(&mut self) {
        self.title = format!("{} - updated", self.title);
    }
}
