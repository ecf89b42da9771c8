use super::{RepoSpec, StarEvent};
use crate::Result;

/// One page of a repository's stargazer connection.
///
/// Events are in ascending `starred_at` order, as the connection returns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarPage {
    pub events: Vec<StarEvent>,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
}

/// The remote query interface the collector talks to.
///
/// `fetch_page` returns the last `page_size` stars strictly before `before`
/// (or the most recent stars when `before` is `None`).
pub trait StarSource: Send + Sync {
    fn fetch_page(&self, repo: &RepoSpec, page_size: u8, before: Option<&str>) -> impl Future<Output = Result<StarPage>> + Send;

    /// Current all-time star count for `repo`.
    fn fetch_total(&self, repo: &RepoSpec) -> impl Future<Output = Result<u64>> + Send;
}
