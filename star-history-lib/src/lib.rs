#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for star-history
//!
//! This library holds all functionality of the star-history tool, which records how
//! many GitHub stars a set of repositories gained each month and how their all-time
//! totals evolved.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`stars`]: Star-event collection from the GitHub API
//! - [`history`]: Monthly aggregation and cumulative reconstruction
//! - [`table`]: CSV persistence with a column schema sidecar
//! - [`reports`]: Console and HTML renderings

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod history;
#[cfg(not(any(debug_assertions, test)))]
mod history;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod stars;
#[cfg(not(any(debug_assertions, test)))]
mod stars;

#[cfg(any(debug_assertions, test))]
pub mod table;
#[cfg(not(any(debug_assertions, test)))]
mod table;

pub use crate::commands::{Host, run};
