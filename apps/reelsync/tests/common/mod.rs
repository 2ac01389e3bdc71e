//! Test infrastructure for reelsync integration tests.
//!
//! Provides a `TestEnv` pairing a wiremock fake of TMDB with the in-process
//! `/posts` stub server, plus clients pointed at both.

use serde_json::{json, Value};
use stub_server::{StubRule, StubServer};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelsync::fixtures;
use reelsync::services::{PostsClient, TmdbClient};

pub const TEST_API_KEY: &str = "test-api-key";

/// A fake TMDB plus a `/posts` stub, both on dynamic local ports.
pub struct TestEnv {
    tmdb_mock: MockServer,
    stubs: StubServer,
    tmdb: TmdbClient,
    posts: PostsClient,
}

impl TestEnv {
    /// Environment with the standard `/posts` stubs and no TMDB routes mounted.
    pub async fn new() -> Self {
        Self::with_stubs(fixtures::posts_stubs()).await
    }

    /// Environment with custom `/posts` stubs.
    pub async fn with_stubs(rules: Vec<StubRule>) -> Self {
        let tmdb_mock = MockServer::start().await;
        let stubs = StubServer::start(rules)
            .await
            .expect("Failed to start stub server");

        let tmdb = TmdbClient::with_base_url(TEST_API_KEY.to_string(), tmdb_mock.uri())
            .expect("Failed to create TMDB client");
        let posts = PostsClient::new(stubs.base_url()).expect("Failed to create posts client");

        Self {
            tmdb_mock,
            stubs,
            tmdb,
            posts,
        }
    }

    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    pub fn posts(&self) -> &PostsClient {
        &self.posts
    }

    pub fn stubs(&self) -> &StubServer {
        &self.stubs
    }

    /// Serve `results` from `GET /3/movie/now_playing` when the test key is sent.
    pub async fn mount_now_playing(&self, results: Value) {
        Mock::given(method("GET"))
            .and(path("/3/movie/now_playing"))
            .and(query_param("api_key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(results)))
            .mount(&self.tmdb_mock)
            .await;
    }

    /// Serve `results` from `GET /3/search/movie?query=<query>`.
    pub async fn mount_search(&self, query: &str, results: Value) {
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("api_key", TEST_API_KEY))
            .and(query_param("query", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(results)))
            .mount(&self.tmdb_mock)
            .await;
    }

    /// Answer every TMDB request with `status`.
    pub async fn mount_tmdb_status(&self, status: u16) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.tmdb_mock)
            .await;
    }

    pub async fn shutdown(self) {
        self.stubs.stop().await.expect("Failed to stop stub server");
    }
}

fn page(results: Value) -> Value {
    let total = results.as_array().map(Vec::len).unwrap_or(0);
    json!({
        "page": 1,
        "results": results,
        "total_pages": 1,
        "total_results": total,
    })
}

/// A typical now-playing result list.
pub fn now_playing_results() -> Value {
    json!([
        {
            "id": 872585,
            "title": "Oppenheimer",
            "original_title": "Oppenheimer",
            "original_language": "en",
            "overview": "The story of J. Robert Oppenheimer.",
            "release_date": "2023-07-19",
            "poster_path": "/8Gxv8gSFCU0XGDykEGv7zR1n2ua.jpg",
            "vote_average": 8.1,
            "popularity": 512.3,
            "adult": false,
            "genre_ids": [18, 36]
        },
        {
            "id": 346698,
            "title": "Barbie",
            "release_date": "2023-07-19"
        }
    ])
}

/// Search results for "matrix".
pub fn matrix_results() -> Value {
    json!([
        { "id": 603, "title": "The Matrix", "release_date": "1999-03-30" },
        { "id": 604, "title": "The Matrix Reloaded", "release_date": "2003-05-15" }
    ])
}
