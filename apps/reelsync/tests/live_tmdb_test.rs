//! Scenarios against the live TMDB API.
//!
//! Ignored by default. Needs network access and a key in `credentials.toml`
//! or `REELSYNC_TMDB__API_KEY`:
//!
//! ```text
//! cargo test -p reelsync --test live_tmdb_test -- --ignored
//! ```

use reqwest::StatusCode;
use stub_server::StubServer;

use reelsync::config::Config;
use reelsync::fixtures::{posts_stubs, CREATED_POST_ID};
use reelsync::scenario::{now_playing_round_trip, search_and_post};
use reelsync::services::{PostsClient, TmdbClient};

async fn live_clients() -> (TmdbClient, PostsClient, StubServer) {
    let config = Config::load().expect("Failed to load configuration");
    config
        .require_api_key()
        .expect("API key required in credentials.toml");

    let tmdb = TmdbClient::from_config(&config.tmdb).expect("Failed to create TMDB client");
    let stubs = StubServer::start(posts_stubs())
        .await
        .expect("Failed to start stub server");
    let posts = PostsClient::new(stubs.base_url()).expect("Failed to create posts client");

    (tmdb, posts, stubs)
}

#[tokio::test]
#[ignore = "hits the live TMDB API"]
async fn test_live_now_playing_round_trip() {
    let (tmdb, posts, stubs) = live_clients().await;

    let report = now_playing_round_trip(&tmdb, &posts)
        .await
        .expect("Round trip against live TMDB should pass");

    assert!(report.movie.title.ends_with(" - updated"));
    assert_eq!(report.created_id, CREATED_POST_ID);
    assert!(
        report.delete_status == StatusCode::OK || report.delete_status == StatusCode::NO_CONTENT
    );

    stubs.stop().await.unwrap();
}

#[tokio::test]
#[ignore = "hits the live TMDB API"]
async fn test_live_search_matrix_and_post() {
    let (tmdb, posts, stubs) = live_clients().await;

    let report = search_and_post(&tmdb, &posts, "matrix")
        .await
        .expect("Search and post against live TMDB should pass");

    assert!(!report.movie.title.is_empty());
    assert!(report.created_id > 0);

    stubs.stop().await.unwrap();
}
