use super::Host;
use super::ProgressReporter;
use super::common::{CommonArgs, LogLevel, init_logging};
use super::config::{Config, validate_repositories};
use crate::Result;
use crate::reports::{generate_console_table, generate_console_totals};
use crate::stars::{Client, Collector, RepoSpec, resolve_token};
use crate::table::save_history;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::Parser;
use core::time::Duration;
use std::io::Write;

/// GitHub's public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// Count stars given on or after this date (YYYY-MM-DD)
    #[arg(value_name = "SINCE", default_value = "2025-01-01")]
    pub since: NaiveDate,

    /// CSV file to write (default is `<file_prefix>.csv`, normally `github_stars.csv`)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<Utf8PathBuf>,

    /// Repository to track, as `owner/name` or a GitHub URL (repeatable; overrides the configured list)
    #[arg(long = "repo", value_name = "REPO")]
    pub repositories: Vec<RepoSpec>,

    /// GitHub personal access token (default is the GitHub CLI login)
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Fetch star history for the tracked repositories and write it as CSV.
pub async fn collect_stars<H: Host>(host: &mut H, args: &CollectArgs) -> Result<()> {
    init_logging(args.common.log_level);

    let config = Config::load(Utf8Path::new("."), args.common.config.as_deref())?;
    let repositories = if args.repositories.is_empty() {
        config.repositories.clone()
    } else {
        args.repositories.clone()
    };
    validate_repositories(&repositories)?;

    let output = args.output.clone().unwrap_or_else(|| config.default_output());

    let _ = writeln!(host.output(), "Fetching stars since {}", args.since);
    let _ = writeln!(host.output(), "Tracking {} repositories", repositories.len());

    let token = resolve_token(args.github_token.as_deref()).await?;
    let client = Client::new(&token, args.api_url.as_str())?;

    let delay = if args.common.log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_hours(365 * 24)
    };
    let reporter = ProgressReporter::new(delay, args.common.color.for_stderr(), args.common.log_level == LogLevel::None);

    let collection = Collector::new(client, config.page_size)
        .collect(&repositories, args.since, &reporter)
        .await?;

    let history = collection.history();
    save_history(&history, &output)?;

    let use_colors = args.common.color.for_stdout();
    let mut report = String::new();
    generate_console_totals(&collection.repositories, &collection.totals, &mut report)?;
    report.push('\n');
    if history.is_empty() {
        report.push_str("No stars found since the cutoff date\n");
    } else {
        generate_console_table(&history, use_colors, &mut report)?;
    }

    let _ = writeln!(host.output(), "\nWritten to {output}\n");
    let _ = write!(host.output(), "{report}");
    Ok(())
}
