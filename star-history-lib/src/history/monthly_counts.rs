use crate::stars::{MonthKey, RepoSpec, StarEvent};
use std::collections::BTreeMap;

/// Number of stars each repository gained in each month.
///
/// Only months in which at least one tracked repository gained a star are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    counts: BTreeMap<MonthKey, BTreeMap<RepoSpec, u64>>,
}

impl MonthlyCounts {
    /// Group stars by the UTC month they were given in.
    #[must_use]
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a StarEvent>) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.add(event.month(), &event.repo, 1);
        }
        counts
    }

    pub fn add(&mut self, month: MonthKey, repo: &RepoSpec, count: u64) {
        let slot = self.counts.entry(month).or_default().entry(repo.clone()).or_default();
        *slot += count;
    }

    /// Stars `repo` gained during `month`, zero when none were recorded.
    #[must_use]
    pub fn get(&self, month: MonthKey, repo: &RepoSpec) -> u64 {
        self.counts.get(&month).and_then(|by_repo| by_repo.get(repo)).copied().unwrap_or(0)
    }

    /// Months with any recorded stars, oldest first.
    pub fn months(&self) -> impl DoubleEndedIterator<Item = MonthKey> + '_ {
        self.counts.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
