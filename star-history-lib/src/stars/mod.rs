//! Star-event collection from the hosting API
//!
//! This module fetches the dated star events of tracked repositories along with
//! each repository's current star count.
//!
//! # Implementation Model
//!
//! [`StarSource`] is the seam to the remote query interface; [`Client`] implements it
//! over GitHub's GraphQL API. The stargazer connection can only be walked efficiently
//! from its tail, so [`StarPager`] requests pages newest first and stops as soon as a
//! page reaches back past the cutoff date, modelled as the [`PageState`] machine.
//! [`Collector`] drives the pager for each repository in turn and then fetches the
//! current totals, producing a [`Collection`]. Requests are strictly sequential and
//! any failure aborts the run.

mod client;
mod collector;
mod credentials;
mod month_key;
mod pager;
mod progress;
mod repo_spec;
mod source;
mod star_event;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{Client, GHOST_ACTOR};
pub use collector::{Collection, Collector};
pub use credentials::resolve_token;
pub use month_key::MonthKey;
pub use pager::{MAX_PAGE_SIZE, PageState, RetainedPage, StarPager, cutoff_instant, fetch_events_since};
pub use progress::{NoProgress, PageReport, Progress};
pub use repo_spec::RepoSpec;
pub use source::{StarPage, StarSource};
pub use star_event::StarEvent;
