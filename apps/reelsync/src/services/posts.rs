//! Write client for a JSONPlaceholder-style `/posts` resource.
//!
//! The client only transports: it hands back status and raw body for every
//! call and leaves judging the status to the caller.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Status and body of a write call, consumed right after the call.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpReply {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::Decode(format!("Failed to parse response body: {}", e)))
    }
}

/// Body returned by `POST /posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    pub id: Option<i64>,
}

/// Body returned by `PATCH /posts/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchedPost {
    pub title: Option<String>,
}

/// HTTP client for `/posts` on a given base URL.
#[derive(Debug, Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /posts` with `record` as the JSON body.
    pub async fn create<B: Serialize>(&self, record: &B) -> Result<HttpReply> {
        let url = format!("{}/posts", self.base_url);
        tracing::debug!(url = %url, "Creating post");
        self.send(self.client.post(&url).json(record), "POST /posts")
            .await
    }

    /// `PATCH /posts/{id}` with `record` as the JSON body.
    pub async fn update<B: Serialize>(&self, id: i64, record: &B) -> Result<HttpReply> {
        let url = format!("{}/posts/{}", self.base_url, id);
        tracing::debug!(url = %url, "Updating post");
        self.send(self.client.patch(&url).json(record), "PATCH /posts/{id}")
            .await
    }

    /// `DELETE /posts/{id}`.
    pub async fn delete(&self, id: i64) -> Result<HttpReply> {
        let url = format!("{}/posts/{}", self.base_url, id);
        tracing::debug!(url = %url, "Deleting post");
        self.send(self.client.delete(&url), "DELETE /posts/{id}")
            .await
    }

    async fn send(&self, request: reqwest::RequestBuilder, step: &str) -> Result<HttpReply> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Http(format!("{} failed: {}", step, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Http(format!("{}: failed to read body: {}", step, e)))?;

        tracing::debug!(step = %step, status = %status, bytes = body.len(), "Write response");

        Ok(HttpReply { status, body })
    }
}
