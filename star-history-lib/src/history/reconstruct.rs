use super::MonthlyCounts;
use crate::stars::{MonthKey, RepoSpec};
use std::collections::BTreeMap;

/// Current all-time star count per repository, as reported at collection time.
pub type RepositoryTotals = BTreeMap<RepoSpec, u64>;

/// Reconstructed all-time star count per repository at the end of each month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeSeries {
    totals: BTreeMap<(MonthKey, RepoSpec), u64>,
}

impl CumulativeSeries {
    /// All-time total for `repo` at the end of `month`, if one was reconstructed.
    #[must_use]
    pub fn get(&self, month: MonthKey, repo: &RepoSpec) -> Option<u64> {
        self.totals.get(&(month, repo.clone())).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Derive each repository's all-time total at the end of every month from its current total.
///
/// Months are walked newest first. The newest month carries the current total; each older
/// month carries the newer month's value minus the stars gained during that newer month.
/// Every repository with a known total gets an entry for every month any repository has data
/// for, so quiet months carry the previous value forward.
#[must_use]
pub fn reconstruct_cumulative(monthly: &MonthlyCounts, current_totals: &RepositoryTotals) -> CumulativeSeries {
    let mut series = CumulativeSeries::default();

    for (repo, &current) in current_totals {
        let walk = monthly.months().rev().scan(current, |running, month| {
            let at_end_of_month = *running;
            *running = running.saturating_sub(monthly.get(month, repo));
            Some(((month, repo.clone()), at_end_of_month))
        });

        series.totals.extend(walk);
    }

    series
}
