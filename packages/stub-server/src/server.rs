//! The listener and request handler.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use bytes::Bytes;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::error::{Result, StubError};
use crate::journal::{Journal, RecordedRequest};
use crate::rule::{CompiledRule, StubRule};

struct StubState {
    rules: Vec<CompiledRule>,
    journal: Journal,
}

/// Build the stub router without binding a socket.
///
/// Returns the router together with the journal it records into. Useful for
/// driving the stubs through an in-memory test server.
pub fn build_router(rules: &[StubRule]) -> Result<(Router, Journal)> {
    let compiled = rules
        .iter()
        .map(StubRule::compile)
        .collect::<Result<Vec<_>>>()?;

    let journal = Journal::new();
    let state = Arc::new(StubState {
        rules: compiled,
        journal: journal.clone(),
    });

    let router = Router::new()
        .fallback(answer)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    Ok((router, journal))
}

async fn answer(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let matched_rule = state
        .rules
        .iter()
        .position(|rule| rule.matches(&method, &path));

    state
        .journal
        .record(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            headers,
            body,
            matched_rule,
        })
        .await;

    match matched_rule {
        Some(index) => {
            let rule = &state.rules[index];
            tracing::debug!(
                method = %method,
                path = %path,
                rule = index,
                status = %rule.status,
                "Stub matched"
            );

            let mut response = Response::new(Body::from(rule.body.clone()));
            *response.status_mut() = rule.status;
            *response.headers_mut() = rule.headers.clone();
            response
        }
        None => {
            tracing::warn!(method = %method, path = %path, "No stub matched request");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "no_stub_matched",
                    "method": method.as_str(),
                    "path": path,
                })),
            )
                .into_response()
        }
    }
}

/// A running stub server bound to `127.0.0.1` on a dynamic port.
///
/// Dropping the server signals shutdown; [`StubServer::stop`] also waits for
/// the serving task to finish.
pub struct StubServer {
    addr: SocketAddr,
    journal: Journal,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl StubServer {
    /// Compile `rules`, bind a listener and start serving in the background.
    ///
    /// Returns once the listener is bound, so requests can be sent right away.
    pub async fn start(rules: Vec<StubRule>) -> Result<Self> {
        let (router, journal) = build_router(&rules)?;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .map_err(StubError::Bind)?;
        let addr = listener.local_addr().map_err(StubError::Bind)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(addr = %addr, rules = rules.len(), "Stub server listening");

        Ok(Self {
            addr,
            journal,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Handle to the request journal.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Snapshot of every request received so far.
    pub async fn received_requests(&self) -> Vec<RecordedRequest> {
        self.journal.snapshot().await
    }

    /// Shut the server down and wait for the serving task to exit.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| StubError::Serve(format!("serving task failed: {}", e)))?
                .map_err(|e| StubError::Serve(e.to_string()))?;
        }

        tracing::info!(addr = %self.addr, "Stub server stopped");
        Ok(())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl std::fmt::Debug for StubServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubServer")
            .field("addr", &self.addr)
            .field("running", &self.shutdown.is_some())
            .finish()
    }
}
