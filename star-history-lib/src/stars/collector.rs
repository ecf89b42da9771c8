use super::pager::fetch_events_since;
use super::progress::Progress;
use super::source::StarSource;
use super::{RepoSpec, StarEvent};
use crate::Result;
use crate::history::{self, RepositoryTotals, StarHistory};
use chrono::NaiveDate;
use ohno::EnrichableExt;

const LOG_TARGET: &str = "     stars";

/// Everything fetched during one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub repositories: Vec<RepoSpec>,
    pub since: NaiveDate,
    pub events: Vec<StarEvent>,
    pub totals: RepositoryTotals,
}

impl Collection {
    /// Aggregate the fetched stars into a monthly history.
    #[must_use]
    pub fn history(&self) -> StarHistory {
        history::aggregate(&self.repositories, &self.events, &self.totals)
    }
}

/// Fetches star history for a list of repositories, one repository and one page at a time.
#[derive(Debug, Clone)]
pub struct Collector<S> {
    source: S,
    page_size: u8,
}

impl<S: StarSource> Collector<S> {
    #[must_use]
    pub const fn new(source: S, page_size: u8) -> Self {
        Self { source, page_size }
    }

    /// Fetch stars given on or after `since` for every repository, then each repository's current total.
    ///
    /// Any failure aborts the whole run.
    pub async fn collect(&self, repositories: &[RepoSpec], since: NaiveDate, progress: &dyn Progress) -> Result<Collection> {
        let mut events = Vec::new();

        for repo in repositories {
            log::info!(target: LOG_TARGET, "Fetching stars for '{repo}' since {since}");

            let repo_events = fetch_events_since(&self.source, repo, since, self.page_size, progress)
                .await
                .map_err(|e| e.enrich_with(|| format!("fetching stars for repository '{repo}'")))?;

            log::info!(target: LOG_TARGET, "Found {} star(s) for '{repo}'", repo_events.len());
            events.extend(repo_events);
        }

        let mut totals = RepositoryTotals::new();
        for repo in repositories {
            let total = self
                .source
                .fetch_total(repo)
                .await
                .map_err(|e| e.enrich_with(|| format!("fetching star count for repository '{repo}'")))?;

            log::info!(target: LOG_TARGET, "'{repo}' currently has {total} star(s)");
            let _ = totals.insert(repo.clone(), total);
        }

        progress.done();

        Ok(Collection {
            repositories: repositories.to_vec(),
            since,
            events,
            totals,
        })
    }
}
