use super::{CumulativeSeries, MonthlyCounts};
use crate::Result;
use crate::stars::{MonthKey, RepoSpec};
use ohno::bail;

/// One month of the star history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub month: MonthKey,

    /// Stars gained during the month, one per repository.
    pub monthly: Vec<u64>,

    /// All-time total at the end of the month, one per repository. `None` when unknown.
    pub all_time: Vec<Option<u64>>,
}

/// Monthly and all-time star counts for a fixed set of repositories, oldest month first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarHistory {
    repositories: Vec<RepoSpec>,
    rows: Vec<HistoryRow>,
}

impl StarHistory {
    /// Assemble the table from aggregated counts.
    ///
    /// There is one row per month present in `monthly`, with a column per repository in
    /// `repositories` order.
    #[must_use]
    pub fn build(repositories: &[RepoSpec], monthly: &MonthlyCounts, cumulative: &CumulativeSeries) -> Self {
        let rows = monthly
            .months()
            .map(|month| HistoryRow {
                month,
                monthly: repositories.iter().map(|repo| monthly.get(month, repo)).collect(),
                all_time: repositories.iter().map(|repo| cumulative.get(month, repo)).collect(),
            })
            .collect();

        Self {
            repositories: repositories.to_vec(),
            rows,
        }
    }

    /// Create a history from already-assembled rows, checking their shape.
    pub fn new(repositories: Vec<RepoSpec>, rows: Vec<HistoryRow>) -> Result<Self> {
        for row in &rows {
            if row.monthly.len() != repositories.len() || row.all_time.len() != repositories.len() {
                bail!(
                    "row for {} has {} monthly and {} all-time values, expected {} of each",
                    row.month,
                    row.monthly.len(),
                    row.all_time.len(),
                    repositories.len()
                );
            }
        }

        if let Some(pair) = rows.windows(2).find(|pair| pair[0].month >= pair[1].month) {
            bail!("months must be strictly ascending, found {} before {}", pair[0].month, pair[1].month);
        }

        Ok(Self { repositories, rows })
    }

    #[must_use]
    pub fn repositories(&self) -> &[RepoSpec] {
        &self.repositories
    }

    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    #[must_use]
    pub fn months(&self) -> Vec<MonthKey> {
        self.rows.iter().map(|row| row.month).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Monthly gains for the repository at `index`, oldest month first.
    pub fn monthly_series(&self, index: usize) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(move |row| row.monthly[index])
    }

    /// All-time totals for the repository at `index`, oldest month first.
    pub fn all_time_series(&self, index: usize) -> impl Iterator<Item = Option<u64>> + '_ {
        self.rows.iter().map(move |row| row.all_time[index])
    }
}
