//! In-process HTTP stub server.
//!
//! Serves a fixed list of [`StubRule`]s from a local listener bound to a
//! dynamically chosen port. Each rule maps a method and path pattern to a
//! canned response and always answers the same way, whatever the request
//! carries. Every request is recorded in a [`Journal`] so callers can inspect
//! what was sent.
//!
//! ```rust,ignore
//! use stub_server::{PathPattern, StubRule, StubServer};
//!
//! let server = StubServer::start(vec![
//!     StubRule::post(PathPattern::exact("/posts"))
//!         .status(201)
//!         .json_body(serde_json::json!({ "id": 101 })),
//! ])
//! .await?;
//!
//! let url = server.url("/posts");
//! // ... issue requests against `url` ...
//! server.stop().await?;
//! ```

mod error;
mod journal;
mod rule;
mod server;

pub use error::{Result, StubError};
pub use journal::{Journal, RecordedRequest};
pub use rule::{PathPattern, StubRule};
pub use server::{build_router, StubServer};

/// Re-exported so callers can build rules without depending on `axum` directly.
pub use axum::http::Method;
