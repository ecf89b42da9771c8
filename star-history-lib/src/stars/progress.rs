use super::RepoSpec;
use chrono::{DateTime, Utc};

/// Summary of one fetched page of stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReport {
    /// 1-based page number within the repository.
    pub page: u32,

    /// Stars on the page at or after the cutoff.
    pub kept: usize,

    /// Oldest star on the page, or `None` for an empty page.
    pub oldest: Option<DateTime<Utc>>,
}

/// A trait for reporting progress of a collection run.
pub trait Progress: Send + Sync {
    /// A repository's star history is about to be fetched.
    fn repository_started(&self, repo: &RepoSpec);

    /// A page of stars has been fetched for `repo`.
    fn page_fetched(&self, repo: &RepoSpec, report: &PageReport);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// Progress sink that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn repository_started(&self, _repo: &RepoSpec) {}
    fn page_fetched(&self, _repo: &RepoSpec, _report: &PageReport) {}
    fn done(&self) {}
}
