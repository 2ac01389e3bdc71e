//! reelsync library
//!
//! Reads movie records from TMDB and replays them as create/update/delete
//! calls against a stubbed JSONPlaceholder-style `/posts` endpoint.
//! This library exposes modules for use in integration tests.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod scenario;
pub mod services;

pub use error::{AppError, Result};
