//! Command-line interface and orchestration for star-history
//!
//! This module implements the CLI commands and ties the collector, the history
//! model, the CSV table layer and the report generators together.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **collect**: Fetch star events since a cutoff date for every tracked repository,
//!   reconstruct all-time totals, write the CSV table with its schema sidecar and
//!   print the totals and the monthly table
//! - **dashboard**: Load the most recent CSV table and show current totals, monthly
//!   deltas and the full table, optionally rendered as a self-contained HTML page
//! - **init**: Generate a default configuration file listing the tracked repositories
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate handler. All output goes through a [`Host`] so commands can be driven
//! against in-memory buffers.
//!
//! Configuration lives in an optional `stars.toml` holding the repository list,
//! the page size and the CSV file prefix.

mod collect;
mod common;
mod config;
mod dashboard;
mod host;
mod init;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use collect::{CollectArgs, DEFAULT_API_URL, collect_stars};
pub use common::{ColorMode, LogLevel};
pub use dashboard::{DashboardArgs, show_dashboard};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
