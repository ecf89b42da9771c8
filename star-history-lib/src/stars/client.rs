//! GitHub GraphQL client
//!
//! Minimal client for the two queries the collector needs: a page of the
//! stargazer connection, and the repository's current star count.

use super::source::{StarPage, StarSource};
use super::{RepoSpec, StarEvent};
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, bail};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

const LOG_TARGET: &str = "     stars";

/// Login reported for stars whose account has since been deleted.
pub const GHOST_ACTOR: &str = "ghost";

const STARGAZERS_QUERY: &str = "query($owner: String!, $name: String!, $last: Int!, $before: String) {
  repository(owner: $owner, name: $name) {
    stargazers(last: $last, before: $before, orderBy: {field: STARRED_AT, direction: ASC}) {
      edges { starredAt node { login } }
      pageInfo { hasPreviousPage startCursor }
    }
  }
}";

const STAR_COUNT_QUERY: &str = "query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    stargazerCount
  }
}";

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryData<T> {
    repository: Option<T>,
}

#[derive(Debug, Deserialize)]
struct StargazersRepository {
    stargazers: StargazerConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StargazerConnection {
    edges: Vec<StargazerEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StargazerEdge {
    starred_at: DateTime<Utc>,
    node: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_previous_page: bool,
    start_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarCountRepository {
    stargazer_count: u64,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// GitHub GraphQL API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client authenticating with `token` against `base_url` (e.g. `https://api.github.com`).
    pub fn new(token: &str, base_url: impl Into<String>) -> Result<Self> {
        use reqwest::header::{AUTHORIZATION, HeaderValue};

        let mut auth_val = HeaderValue::from_str(&format!("bearer {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("star-history")
                .default_headers(headers)
                .build()?,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    /// Run a GraphQL query and decode its `data` member.
    async fn query<T: DeserializeOwned>(&self, query: &str, variables: serde_json::Value) -> Result<T> {
        let resp = self
            .client
            .post(self.graphql_url())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .into_app_err_with(|| format!("sending GraphQL request to {}", self.base_url))?;

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        if let Some(rl) = &rate_limit {
            log::debug!(target: LOG_TARGET, "GraphQL rate limit: {} remaining, resets at {}", rl.remaining, rl.reset_at);
        }

        let status = resp.status();
        let body = resp.text().await.into_app_err("reading GraphQL response body")?;

        if !status.is_success() {
            if matches!(status.as_u16(), 403 | 429)
                && let Some(rl) = rate_limit.filter(|rl| rl.remaining == 0)
            {
                bail!("GitHub API rate limit exceeded; resets at {}", rl.reset_at.with_timezone(&chrono::Local).format("%T"));
            }

            bail!("GitHub API returned {status}: {}", body.trim());
        }

        decode_response(&body)
    }
}

/// Decode a GraphQL response body, turning a non-empty `errors` array into an error.
fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphQlResponse<T> = serde_json::from_str(body).into_app_err("decoding GraphQL response")?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        bail!("GraphQL query failed: {}", messages.join("; "));
    }

    response.data.into_app_err("GraphQL response contained no data")
}

fn decode_page(repo: &RepoSpec, connection: StargazerConnection) -> StarPage {
    StarPage {
        events: connection
            .edges
            .into_iter()
            .map(|edge| {
                let actor = edge.node.map_or_else(|| GHOST_ACTOR.to_string(), |node| node.login);
                StarEvent::new(repo.clone(), actor, edge.starred_at)
            })
            .collect(),
        has_previous_page: connection.page_info.has_previous_page,
        start_cursor: connection.page_info.start_cursor,
    }
}

impl StarSource for Client {
    async fn fetch_page(&self, repo: &RepoSpec, page_size: u8, before: Option<&str>) -> Result<StarPage> {
        let variables = json!({
            "owner": repo.owner(),
            "name": repo.name(),
            "last": page_size,
            "before": before,
        });

        let data: RepositoryData<StargazersRepository> = self.query(STARGAZERS_QUERY, variables).await?;
        let Some(repository) = data.repository else {
            bail!("repository '{repo}' not found");
        };

        Ok(decode_page(repo, repository.stargazers))
    }

    async fn fetch_total(&self, repo: &RepoSpec) -> Result<u64> {
        let variables = json!({
            "owner": repo.owner(),
            "name": repo.name(),
        });

        let data: RepositoryData<StarCountRepository> = self.query(STAR_COUNT_QUERY, variables).await?;
        let Some(repository) = data.repository else {
            bail!("repository '{repo}' not found");
        };

        Ok(repository.stargazer_count)
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
