use super::{MonthKey, RepoSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One actor starring one repository at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEvent {
    pub repo: RepoSpec,
    pub actor: String,
    pub starred_at: DateTime<Utc>,
}

impl StarEvent {
    #[must_use]
    pub fn new(repo: RepoSpec, actor: impl Into<String>, starred_at: DateTime<Utc>) -> Self {
        Self {
            repo,
            actor: actor.into(),
            starred_at,
        }
    }

    /// The month this star falls in, by UTC calendar.
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of(&self.starred_at)
    }
}
