//! Monthly aggregation and backward reconstruction of all-time star counts
//!
//! Stars are grouped into [`MonthlyCounts`] by the UTC month they were given in.
//! Because the hosting API only reports a repository's *current* total, historical
//! all-time totals are reconstructed backward from it by [`reconstruct_cumulative`],
//! and the two are assembled into a [`StarHistory`] table ready for export.

mod monthly_counts;
mod reconstruct;
mod star_history;

pub use monthly_counts::MonthlyCounts;
pub use reconstruct::{CumulativeSeries, RepositoryTotals, reconstruct_cumulative};
pub use star_history::{HistoryRow, StarHistory};

use crate::stars::{RepoSpec, StarEvent};

const LOG_TARGET: &str = "   history";

/// Group `events` by month and reconstruct all-time totals from `current_totals`.
#[must_use]
pub fn aggregate(repositories: &[RepoSpec], events: &[StarEvent], current_totals: &RepositoryTotals) -> StarHistory {
    let monthly = MonthlyCounts::from_events(events);
    let cumulative = reconstruct_cumulative(&monthly, current_totals);

    log::debug!(
        target: LOG_TARGET,
        "Aggregated {} stars into {} month(s) for {} repositories",
        events.len(),
        monthly.months().count(),
        repositories.len()
    );

    StarHistory::build(repositories, &monthly, &cumulative)
}
