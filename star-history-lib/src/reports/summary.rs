use crate::history::StarHistory;
use crate::stars::{MonthKey, RepoSpec};

/// Latest standing of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub repository: RepoSpec,

    /// All-time total at the end of the latest month, if known.
    pub current: Option<u64>,

    /// All-time total one month earlier; equal to `current` when there is only one month.
    pub previous: Option<u64>,
}

impl RepositorySummary {
    /// Change from the previous month, if both totals are known.
    #[must_use]
    pub fn delta(&self) -> Option<i64> {
        let (current, previous) = (self.current?, self.previous?);
        let magnitude = i64::try_from(current.abs_diff(previous)).unwrap_or(i64::MAX);
        Some(if current >= previous { magnitude } else { -magnitude })
    }
}

/// Headline figures for a star history: per-repository totals and their last change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub latest_month: MonthKey,
    pub repositories: Vec<RepositorySummary>,
}

impl DashboardSummary {
    /// Summarize the last two rows of `history`. Returns `None` for an empty history.
    #[must_use]
    pub fn from_history(history: &StarHistory) -> Option<Self> {
        let rows = history.rows();
        let last = rows.last()?;
        let before_last = rows.len().checked_sub(2).map_or(last, |index| &rows[index]);

        let repositories = history
            .repositories()
            .iter()
            .enumerate()
            .map(|(index, repo)| RepositorySummary {
                repository: repo.clone(),
                current: last.all_time[index],
                previous: before_last.all_time[index],
            })
            .collect();

        Some(Self {
            latest_month: last.month,
            repositories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryRow;

    fn history(all_time: &[(&str, Vec<Option<u64>>)]) -> StarHistory {
        let repositories = vec![RepoSpec::new("coder", "coder"), RepoSpec::new("coder", "blink")];
        let rows = all_time
            .iter()
            .map(|(month, totals)| HistoryRow {
                month: month.parse().unwrap(),
                monthly: vec![0; totals.len()],
                all_time: totals.clone(),
            })
            .collect();
        StarHistory::new(repositories, rows).unwrap()
    }

    #[test]
    fn test_delta_from_last_two_rows() {
        let history = history(&[
            ("2025-01", vec![Some(75), Some(3)]),
            ("2025-02", vec![Some(95), Some(4)]),
            ("2025-03", vec![Some(100), Some(4)]),
        ]);

        let summary = DashboardSummary::from_history(&history).unwrap();
        assert_eq!(summary.latest_month.to_string(), "2025-03");
        assert_eq!(summary.repositories[0].current, Some(100));
        assert_eq!(summary.repositories[0].delta(), Some(5));
        assert_eq!(summary.repositories[1].delta(), Some(0));
    }

    #[test]
    fn test_single_row_has_zero_delta() {
        let history = history(&[("2025-03", vec![Some(100), Some(4)])]);

        let summary = DashboardSummary::from_history(&history).unwrap();
        assert_eq!(summary.repositories[0].delta(), Some(0));
        assert_eq!(summary.repositories[1].delta(), Some(0));
    }

    #[test]
    fn test_unknown_totals_have_no_delta() {
        let history = history(&[("2025-02", vec![Some(90), None]), ("2025-03", vec![Some(100), None])]);

        let summary = DashboardSummary::from_history(&history).unwrap();
        assert_eq!(summary.repositories[1].current, None);
        assert_eq!(summary.repositories[1].delta(), None);
    }

    #[test]
    fn test_decrease_is_negative() {
        let history = history(&[("2025-02", vec![Some(100), Some(4)]), ("2025-03", vec![Some(97), Some(4)])]);

        let summary = DashboardSummary::from_history(&history).unwrap();
        assert_eq!(summary.repositories[0].delta(), Some(-3));
    }

    #[test]
    fn test_empty_history_has_no_summary() {
        let history = history(&[]);
        assert!(DashboardSummary::from_history(&history).is_none());
    }
}
