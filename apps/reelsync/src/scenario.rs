//! Read-then-write scenarios.
//!
//! Each scenario is a straight line of HTTP calls. The first failed check
//! returns its error and nothing after it runs.

use reqwest::StatusCode;

use crate::error::{AppError, Result};
use crate::services::{
    first_result, CreatedPost, HttpReply, Movie, PatchedPost, PostsClient, TmdbClient,
};

/// Outcome of [`now_playing_round_trip`].
#[derive(Debug, Clone)]
pub struct RoundTripReport {
    /// The record as sent in the PATCH body, title already updated
    pub movie: Movie,
    pub created_id: i64,
    pub patched_title: String,
    pub delete_status: StatusCode,
}

/// Outcome of [`search_and_post`].
#[derive(Debug, Clone)]
pub struct SearchPostReport {
    pub movie: Movie,
    pub created_id: i64,
}

/// Fetch now-playing movies, then create, patch and delete the first one.
pub async fn now_playing_round_trip(
    tmdb: &TmdbClient,
    posts: &PostsClient,
) -> Result<RoundTripReport> {
    let mut movie = first_result(tmdb.now_playing().await?, "now_playing")?;
    expect_non_empty("now_playing title", &movie.title)?;
    tracing::info!(movie_id = movie.id, title = %movie.title, "Fetched now playing movie");

    let created_id = create_post(posts, &movie).await?;

    movie.mark_updated();
    let patched = posts.update(created_id, &movie).await?;
    expect_status("PATCH /posts/{id}", &patched, StatusCode::OK)?;
    let patched_title = expect_present(
        "PATCH /posts/{id} title",
        patched.json::<PatchedPost>()?.title,
    )?;
    tracing::info!(post_id = created_id, title = %patched_title, "Patched post");

    let deleted = posts.delete(created_id).await?;
    expect_one_of(
        "DELETE /posts/{id}",
        &deleted,
        &[StatusCode::OK, StatusCode::NO_CONTENT],
    )?;
    tracing::info!(post_id = created_id, status = %deleted.status, "Deleted post");

    Ok(RoundTripReport {
        movie,
        created_id,
        patched_title,
        delete_status: deleted.status,
    })
}

/// Search TMDB for `query` and create a post from the first hit.
pub async fn search_and_post(
    tmdb: &TmdbClient,
    posts: &PostsClient,
    query: &str,
) -> Result<SearchPostReport> {
    let movie = first_result(tmdb.search_movies(query).await?, "search/movie")?;
    expect_non_empty("search/movie title", &movie.title)?;
    tracing::info!(query = %query, movie_id = movie.id, title = %movie.title, "Found movie");

    let created_id = create_post(posts, &movie).await?;

    Ok(SearchPostReport { movie, created_id })
}

async fn create_post(posts: &PostsClient, movie: &Movie) -> Result<i64> {
    let created = posts.create(movie).await?;
    expect_status("POST /posts", &created, StatusCode::CREATED)?;
    let id = expect_present("POST /posts id", created.json::<CreatedPost>()?.id)?;
    let id = expect_positive_id("POST /posts", id)?;
    tracing::info!(post_id = id, "Created post");
    Ok(id)
}

// =============================================================================
// Checks
// =============================================================================

/// Fail unless `reply` carries exactly `expected`.
pub fn expect_status(step: &str, reply: &HttpReply, expected: StatusCode) -> Result<()> {
    expect_one_of(step, reply, &[expected])
}

/// Fail unless `reply` carries one of `accepted`.
pub fn expect_one_of(step: &str, reply: &HttpReply, accepted: &[StatusCode]) -> Result<()> {
    if accepted.contains(&reply.status) {
        return Ok(());
    }

    let expected = accepted
        .iter()
        .map(|status| status.as_u16().to_string())
        .collect::<Vec<_>>()
        .join(" or ");

    tracing::error!(
        step = %step,
        expected = %expected,
        actual = %reply.status,
        "Unexpected status"
    );

    Err(AppError::UnexpectedStatus {
        step: step.to_string(),
        expected,
        actual: reply.status.as_u16(),
    })
}

/// Unwrap a field that must not be null or absent.
pub fn expect_present<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| AppError::MissingField(field.to_string()))
}

/// Fail if `value` is empty or only whitespace.
pub fn expect_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Fail unless `id` is a positive integer.
pub fn expect_positive_id(step: &str, id: i64) -> Result<i64> {
    if id > 0 {
        Ok(id)
    } else {
        Err(AppError::InvalidId {
            step: step.to_string(),
            id,
        })
    }
}
