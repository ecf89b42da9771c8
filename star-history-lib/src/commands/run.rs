//! Command dispatch logic for star-history

use super::{CollectArgs, DashboardArgs, InitArgs, collect_stars, init_config, show_dashboard};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "star-history", version, author, long_about = None)]
#[command(about = "Track the monthly star history of GitHub repositories")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch star history from GitHub and write it as CSV
    Collect(Box<CollectArgs>),
    /// Show the most recent star history on the console and optionally as HTML
    Dashboard(Box<DashboardArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// `args` includes the program name, as returned by `std::env::args()`.
///
/// # Errors
///
/// Returns an error if the executed command fails. Invalid arguments make clap print
/// usage and exit the process.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Collect(collect_args) => collect_stars(host, collect_args).await,
        Command::Dashboard(dashboard_args) => show_dashboard(host, dashboard_args),
        Command::Init(init_args) => init_config(host, init_args),
    }
}
