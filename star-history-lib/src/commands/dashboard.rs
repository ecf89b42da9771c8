use super::Host;
use super::common::{CommonArgs, init_logging};
use super::config::Config;
use crate::Result;
use crate::reports::{DashboardSummary, generate_console_summary, generate_console_table, generate_html};
use crate::table::{find_latest, load_history, save_history};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct DashboardArgs {
    /// Directory to search for star history CSV files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: Utf8PathBuf,

    /// File name prefix of star history CSV files (default is the configured `file_prefix`)
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Write a self-contained HTML dashboard to this file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub html: Option<Utf8PathBuf>,

    /// Re-export the loaded star history as CSV to this file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Show the most recent star history: totals and deltas on the console, plus optional HTML and CSV output.
///
/// Finding no data is not an error; a message explaining how to produce some is printed instead.
pub fn show_dashboard<H: Host>(host: &mut H, args: &DashboardArgs) -> Result<()> {
    init_logging(args.common.log_level);

    let config = Config::load(Utf8Path::new("."), args.common.config.as_deref())?;
    let prefix = args.prefix.as_deref().unwrap_or(&config.file_prefix);

    let Some(path) = find_latest(&args.dir, prefix)? else {
        let _ = writeln!(
            host.error(),
            "No star history found in '{}' (looking for {prefix}*.csv). Run `star-history collect` first.",
            args.dir
        );
        return Ok(());
    };

    let table = load_history(&path)?;
    let Some(summary) = DashboardSummary::from_history(&table.history) else {
        let _ = writeln!(
            host.error(),
            "'{path}' contains no star history. Run `star-history collect` to refresh it."
        );
        return Ok(());
    };

    let use_colors = args.common.color.for_stdout();
    let mut report = String::new();
    generate_console_summary(&summary, use_colors, &mut report)?;
    report.push('\n');
    generate_console_table(&table.history, use_colors, &mut report)?;

    let _ = writeln!(host.output(), "Data source: {path}\n");
    let _ = write!(host.output(), "{report}");

    if let Some(filename) = &args.html {
        let mut html = String::new();
        generate_html(&table, &summary, prefix, Local::now(), &mut html)?;
        fs::write(filename, html).into_app_err_with(|| format!("writing HTML dashboard to '{filename}'"))?;
        let _ = writeln!(host.output(), "Wrote HTML dashboard to {filename}");
    }

    if let Some(filename) = &args.csv {
        save_history(&table.history, filename)?;
        let _ = writeln!(host.output(), "Wrote CSV to {filename}");
    }

    Ok(())
}
