//! Backward pagination over a repository's stargazers with an early-stop cutoff.
//!
//! Stars are requested newest page first ("last N before cursor"). Every page is
//! filtered against the cutoff instant, and pagination stops as soon as a page
//! reaches back past the cutoff or the connection reports no earlier page.

use super::progress::{PageReport, Progress};
use super::source::StarSource;
use super::{RepoSpec, StarEvent};
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use core::pin::pin;
use futures::{Stream, TryStreamExt};

const LOG_TARGET: &str = "     stars";

/// Largest page the stargazer connection will serve.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Where a [`StarPager`] is in its walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// More pages may follow; the next request goes before `cursor` (or from the tail when `None`).
    Fetching { cursor: Option<String> },

    /// A page reached back past the cutoff; older pages are irrelevant.
    CutoffReached,

    /// The connection has no earlier page.
    Exhausted,
}

impl PageState {
    #[must_use]
    pub const fn is_done(&self) -> bool {
        !matches!(self, Self::Fetching { .. })
    }
}

/// The stars kept from one page, along with what was observed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedPage {
    pub report: PageReport,
    pub events: Vec<StarEvent>,
}

/// Midnight UTC at the start of `since`.
#[must_use]
pub fn cutoff_instant(since: NaiveDate) -> DateTime<Utc> {
    since.and_time(NaiveTime::MIN).and_utc()
}

/// Walks a repository's stargazers backward from the most recent star.
///
/// A pager is single use: cursors are server-assigned, so a fresh walk needs a fresh pager.
#[derive(Debug)]
pub struct StarPager<'a, S> {
    source: &'a S,
    repo: RepoSpec,
    cutoff: DateTime<Utc>,
    page_size: u8,
    state: PageState,
    pages_fetched: u32,
}

impl<'a, S: StarSource> StarPager<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, repo: RepoSpec, since: NaiveDate, page_size: u8) -> Self {
        Self {
            source,
            repo,
            cutoff: cutoff_instant(since),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            state: PageState::Fetching { cursor: None },
            pages_fetched: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the walk is over.
    pub async fn next_page(&mut self) -> Result<Option<RetainedPage>> {
        let PageState::Fetching { cursor } = &self.state else {
            return Ok(None);
        };

        let page = self.source.fetch_page(&self.repo, self.page_size, cursor.as_deref()).await?;
        self.pages_fetched += 1;

        let oldest = page.events.iter().map(|e| e.starred_at).min();
        let events: Vec<_> = page.events.into_iter().filter(|e| e.starred_at >= self.cutoff).collect();

        let next_state = if oldest.is_some_and(|oldest| oldest < self.cutoff) {
            PageState::CutoffReached
        } else if !page.has_previous_page {
            PageState::Exhausted
        } else {
            match page.start_cursor {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    log::warn!(target: LOG_TARGET, "Cursor for '{}' did not advance, stopping", self.repo);
                    PageState::Exhausted
                }
                Some(next) => PageState::Fetching { cursor: Some(next) },
                None => PageState::Exhausted,
            }
        };

        let report = PageReport {
            page: self.pages_fetched,
            kept: events.len(),
            oldest,
        };

        log::debug!(
            target: LOG_TARGET,
            "'{}' page {}: {} stars (oldest: {})",
            self.repo,
            report.page,
            report.kept,
            oldest.map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
        );

        self.state = next_state;
        Ok(Some(RetainedPage { report, events }))
    }

    /// Turn the pager into a lazy stream of retained pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<RetainedPage>> + 'a
    where
        S: 'a,
    {
        futures::stream::try_unfold(self, |mut pager| async move {
            Ok::<_, ohno::AppError>(pager.next_page().await?.map(|page| (page, pager)))
        })
    }
}

/// Fetch every star on `repo` at or after midnight UTC of `since`, oldest first.
pub async fn fetch_events_since<S: StarSource>(
    source: &S,
    repo: &RepoSpec,
    since: NaiveDate,
    page_size: u8,
    progress: &dyn Progress,
) -> Result<Vec<StarEvent>> {
    progress.repository_started(repo);

    let mut pages = pin!(StarPager::new(source, repo.clone(), since, page_size).into_stream());
    let mut events = Vec::new();

    while let Some(page) = pages.try_next().await? {
        progress.page_fetched(repo, &page.report);
        events.extend(page.events);
    }

    events.sort_by_key(|e| e.starred_at);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::source::StarPage;
    use crate::stars::test_support::{PagedSource, ts};
    use crate::stars::NoProgress;

    fn since(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn repo() -> RepoSpec {
        RepoSpec::new("coder", "coder")
    }

    #[test]
    fn test_cutoff_instant_is_midnight_utc() {
        assert_eq!(cutoff_instant(since("2025-01-01")).to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_keeps_only_events_after_cutoff() {
        let source = PagedSource::from_timestamps(&repo(), &["2024-12-30T10:00:00Z", "2024-12-31T23:59:59Z", "2025-01-01T00:00:00Z", "2025-01-05T12:00:00Z"]);

        let events = fetch_events_since(&source, &repo(), since("2025-01-01"), 10, &NoProgress).await.unwrap();

        let stamps: Vec<_> = events.iter().map(|e| e.starred_at).collect();
        assert_eq!(stamps, [ts("2025-01-01T00:00:00Z"), ts("2025-01-05T12:00:00Z")]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_history_entirely_before_cutoff_stops_after_one_page() {
        let stamps: Vec<String> = (1..=28).map(|day| format!("2023-02-{day:02}T00:00:00Z")).collect();
        let refs: Vec<&str> = stamps.iter().map(String::as_str).collect();
        let source = PagedSource::from_timestamps(&repo(), &refs);

        let events = fetch_events_since(&source, &repo(), since("2025-01-01"), 5, &NoProgress).await.unwrap();

        assert!(events.is_empty());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_walks_pages_until_cutoff_crossed() {
        // 12 days of stars, 3 per page; cutoff falls in the third page from the end
        let stamps: Vec<String> = (1..=12).map(|day| format!("2025-03-{day:02}T12:00:00Z")).collect();
        let refs: Vec<&str> = stamps.iter().map(String::as_str).collect();
        let source = PagedSource::from_timestamps(&repo(), &refs);

        let events = fetch_events_since(&source, &repo(), since("2025-03-05"), 3, &NoProgress).await.unwrap();

        assert_eq!(events.len(), 8);
        assert_eq!(events.first().unwrap().starred_at, ts("2025-03-05T12:00:00Z"));
        assert_eq!(events.last().unwrap().starred_at, ts("2025-03-12T12:00:00Z"));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausts_history_entirely_after_cutoff() {
        let stamps: Vec<String> = (1..=10).map(|day| format!("2025-06-{day:02}T00:00:00Z")).collect();
        let refs: Vec<&str> = stamps.iter().map(String::as_str).collect();
        let source = PagedSource::from_timestamps(&repo(), &refs);

        let mut pager = StarPager::new(&source, repo(), since("2025-01-01"), 4);
        let mut total = 0;
        while let Some(page) = pager.next_page().await.unwrap() {
            total += page.events.len();
        }

        assert_eq!(total, 10);
        assert_eq!(pager.state(), &PageState::Exhausted);
        assert_eq!(pager.pages_fetched(), 3);
        assert!(pager.next_page().await.unwrap().is_none());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_repository_terminates() {
        let source = PagedSource::from_timestamps(&repo(), &[]);

        let mut pager = StarPager::new(&source, repo(), since("2025-01-01"), 100);
        let page = pager.next_page().await.unwrap().unwrap();

        assert!(page.events.is_empty());
        assert!(page.report.oldest.is_none());
        assert_eq!(pager.state(), &PageState::Exhausted);
        assert!(pager.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_page_with_previous_page_keeps_going() {
        let source = PagedSource::from_pages(vec![
            StarPage {
                events: Vec::new(),
                has_previous_page: true,
                start_cursor: Some("c1".into()),
            },
            StarPage {
                events: vec![crate::stars::StarEvent::new(repo(), "alice", ts("2025-02-01T00:00:00Z"))],
                has_previous_page: false,
                start_cursor: Some("c0".into()),
            },
        ]);

        let events = fetch_events_since(&source, &repo(), since("2025-01-01"), 100, &NoProgress).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_start_cursor_is_treated_as_exhausted() {
        let source = PagedSource::from_pages(vec![StarPage {
            events: vec![crate::stars::StarEvent::new(repo(), "alice", ts("2025-02-01T00:00:00Z"))],
            has_previous_page: true,
            start_cursor: None,
        }]);

        let mut pager = StarPager::new(&source, repo(), since("2025-01-01"), 100);
        let _ = pager.next_page().await.unwrap();
        assert_eq!(pager.state(), &PageState::Exhausted);
    }

    #[tokio::test]
    async fn test_cutoff_state_reported() {
        let source = PagedSource::from_timestamps(&repo(), &["2024-06-01T00:00:00Z", "2025-06-01T00:00:00Z"]);

        let mut pager = StarPager::new(&source, repo(), since("2025-01-01"), 100);
        let page = pager.next_page().await.unwrap().unwrap();

        assert_eq!(page.report.kept, 1);
        assert_eq!(page.report.oldest, Some(ts("2024-06-01T00:00:00Z")));
        assert_eq!(pager.state(), &PageState::CutoffReached);
        assert!(pager.state().is_done());
    }

    #[tokio::test]
    async fn test_source_error_aborts() {
        let source = PagedSource::failing();
        let err = fetch_events_since(&source, &repo(), since("2025-01-01"), 100, &NoProgress).await.unwrap_err();
        assert!(err.to_string().contains("synthetic failure"));
    }

    #[tokio::test]
    async fn test_stream_yields_newest_page_first() {
        let stamps: Vec<String> = (1..=6).map(|day| format!("2025-05-{day:02}T00:00:00Z")).collect();
        let refs: Vec<&str> = stamps.iter().map(String::as_str).collect();
        let source = PagedSource::from_timestamps(&repo(), &refs);

        let pages: Vec<RetainedPage> = StarPager::new(&source, repo(), since("2025-01-01"), 2).into_stream().try_collect().await.unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].events[0].starred_at, ts("2025-05-05T00:00:00Z"));
        assert_eq!(pages[2].events[0].starred_at, ts("2025-05-01T00:00:00Z"));
        let numbers: Vec<_> = pages.iter().map(|p| p.report.page).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }
}
