//! Helpers shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset of the helpers")]

use serde_json::{Value, json};
use star_history_lib::Host;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// Test host that captures output to in-memory buffers.
pub struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }
}

/// A GraphQL stargazer page body. `stars` are `(login, starredAt)` pairs, oldest first.
pub fn stargazers_page(stars: &[(&str, &str)], has_previous_page: bool, start_cursor: Option<&str>) -> Value {
    let edges: Vec<_> = stars
        .iter()
        .map(|(login, starred_at)| json!({ "starredAt": starred_at, "node": { "login": login } }))
        .collect();

    json!({
        "data": {
            "repository": {
                "stargazers": {
                    "edges": edges,
                    "pageInfo": { "hasPreviousPage": has_previous_page, "startCursor": start_cursor }
                }
            }
        }
    })
}

pub fn star_count(count: u64) -> Value {
    json!({ "data": { "repository": { "stargazerCount": count } } })
}

/// Serve the stargazer page requested with the given `before` cursor.
pub async fn mount_page(server: &MockServer, owner: &str, before: Option<&str>, body: Value) {
    let before = before.map_or_else(|| "\"before\":null".to_string(), |cursor| format!("\"before\":\"{cursor}\""));

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", format!("bearer {TOKEN}").as_str()))
        .and(body_string_contains("hasPreviousPage"))
        .and(body_string_contains(format!("\"owner\":\"{owner}\"")))
        .and(body_string_contains(before))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve the current star count query.
pub async fn mount_count(server: &MockServer, count: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("stargazerCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(star_count(count)))
        .mount(server)
        .await;
}

/// Mount the stars of `coder/coder` reaching back past 2025-01-01 over two pages, and a total of 250.
///
/// The walk must stop after the second page; a third request fails the test.
pub async fn mount_coder_history(server: &MockServer) {
    mount_page(
        server,
        "coder",
        None,
        stargazers_page(&[("alice", "2025-03-10T12:00:00Z"), ("bob", "2025-03-15T08:30:00Z")], true, Some("c1")),
    )
    .await;

    mount_page(
        server,
        "coder",
        Some("c1"),
        stargazers_page(&[("carol", "2024-12-30T23:59:59Z"), ("dave", "2025-01-05T00:00:00Z")], true, Some("c0")),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("\"before\":\"c0\""))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;

    mount_count(server, 250).await;
}
