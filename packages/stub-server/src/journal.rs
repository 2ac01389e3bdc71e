//! Record of every request the stub server received.

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Index of the rule that answered, or `None` if nothing matched.
    pub matched_rule: Option<usize>,
}

impl RecordedRequest {
    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Shared handle to the request log. Cloning shares the same log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn record(&self, request: RecordedRequest) {
        self.entries.lock().await.push(request);
    }

    /// Snapshot of all requests received so far, in arrival order.
    pub async fn snapshot(&self) -> Vec<RecordedRequest> {
        self.entries.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
