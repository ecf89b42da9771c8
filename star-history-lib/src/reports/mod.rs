//! Human-facing renderings of a star history
//!
//! # Implementation Model
//!
//! Two generators are provided, both writing to any `core::fmt::Write`:
//! - **Console**: a fixed-width monthly table, current totals and a summary of the latest month,
//!   with optional ANSI colors
//! - **HTML**: a self-contained dashboard page with summary cards, SVG bar and line charts,
//!   the raw table and a CSV download link
//!
//! Both work from a [`StarHistory`](crate::history::StarHistory) plus a [`DashboardSummary`],
//! which holds each repository's latest all-time total and its change over the last month.

mod common;
mod console;
mod html;
mod summary;

pub use console::{
    generate_summary as generate_console_summary, generate_table as generate_console_table, generate_totals as generate_console_totals,
};
pub use html::{download_file_name, generate as generate_html};
pub use summary::{DashboardSummary, RepositorySummary};
