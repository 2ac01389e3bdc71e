//! Canned responses for the mocked JSONPlaceholder `/posts` resource.
//!
//! These are literal test doubles. The id and title carry no meaning beyond
//! being recognisable in assertions.

use serde_json::json;
use stub_server::{PathPattern, StubRule};

/// Id returned by the stubbed `POST /posts`.
pub const CREATED_POST_ID: i64 = 101;

/// Title returned by the stubbed `PATCH /posts/{id}`.
pub const PATCHED_TITLE: &str = "updated";

/// Path pattern for a single post, `/posts/{numeric id}`.
pub const POST_ITEM_PATTERN: &str = r"/posts/\d+";

/// The three `/posts` stubs: create, update, delete.
pub fn posts_stubs() -> Vec<StubRule> {
    vec![
        StubRule::post(PathPattern::exact("/posts"))
            .status(201)
            .json_body(json!({ "id": CREATED_POST_ID })),
        StubRule::patch(PathPattern::regex(POST_ITEM_PATTERN))
            .status(200)
            .json_body(json!({ "title": PATCHED_TITLE })),
        StubRule::delete(PathPattern::regex(POST_ITEM_PATTERN)).status(200),
    ]
}
