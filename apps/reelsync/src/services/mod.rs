//! HTTP clients for reelsync.

pub mod posts;
pub mod tmdb;

pub use posts::{CreatedPost, HttpReply, PatchedPost, PostsClient};
pub use tmdb::{first_result, Movie, TmdbClient};
