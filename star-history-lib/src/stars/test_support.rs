//! In-memory [`StarSource`] implementations for tests.

use super::source::{StarPage, StarSource};
use super::{RepoSpec, StarEvent};
use crate::Result;
use chrono::{DateTime, Utc};
use core::sync::atomic::{AtomicUsize, Ordering};
use ohno::bail;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[derive(Debug)]
enum Pages {
    /// Ascending star history, paged on demand with index cursors.
    History(Vec<StarEvent>),

    /// Canned pages served in order regardless of cursor.
    Scripted(Mutex<Vec<StarPage>>),

    Failing,
}

/// A synthetic, finite, paginated stargazer source.
#[derive(Debug)]
pub struct PagedSource {
    pages: Pages,
    totals: HashMap<RepoSpec, u64>,
    calls: AtomicUsize,
}

impl PagedSource {
    pub fn from_timestamps(repo: &RepoSpec, stamps: &[&str]) -> Self {
        let events = stamps
            .iter()
            .enumerate()
            .map(|(i, s)| StarEvent::new(repo.clone(), format!("user{i}"), ts(s)))
            .collect();
        Self::from_events(events)
    }

    pub fn from_events(mut events: Vec<StarEvent>) -> Self {
        events.sort_by_key(|e| e.starred_at);
        Self {
            pages: Pages::History(events),
            totals: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_pages(mut pages: Vec<StarPage>) -> Self {
        pages.reverse();
        Self {
            pages: Pages::Scripted(Mutex::new(pages)),
            totals: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            pages: Pages::Failing,
            totals: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_total(mut self, repo: &RepoSpec, total: u64) -> Self {
        let _ = self.totals.insert(repo.clone(), total);
        self
    }

    /// Number of page requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StarSource for PagedSource {
    async fn fetch_page(&self, repo: &RepoSpec, page_size: u8, before: Option<&str>) -> Result<StarPage> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.pages {
            Pages::History(events) => {
                let events: Vec<_> = events.iter().filter(|e| &e.repo == repo).cloned().collect();
                let end = before.map_or(events.len(), |c| c.parse::<usize>().unwrap());
                let start = end.saturating_sub(usize::from(page_size));
                Ok(StarPage {
                    events: events[start..end].to_vec(),
                    has_previous_page: start > 0,
                    start_cursor: (start < end).then(|| start.to_string()),
                })
            }
            Pages::Scripted(pages) => Ok(pages.lock().unwrap().pop().unwrap_or_default()),
            Pages::Failing => bail!("synthetic failure fetching '{repo}'"),
        }
    }

    async fn fetch_total(&self, repo: &RepoSpec) -> Result<u64> {
        match &self.pages {
            Pages::Failing => bail!("synthetic failure fetching total for '{repo}'"),
            _ => Ok(self.totals.get(repo).copied().unwrap_or_default()),
        }
    }
}
