use super::common::{format_count, format_delta, short_name};
use super::summary::DashboardSummary;
use crate::Result;
use crate::history::{RepositoryTotals, StarHistory};
use crate::stars::RepoSpec;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

const MONTH_WIDTH: usize = 10;
const MONTHLY_WIDTH: usize = 12;
const ALL_TIME_WIDTH: usize = 14;
const ALL_TIME_LABEL: &str = " Tot";

/// Print the history as a fixed-width table: monthly gains on the left, all-time totals on the right.
pub fn generate_table<W: Write>(history: &StarHistory, use_colors: bool, writer: &mut W) -> Result<()> {
    let repositories = history.repositories();
    let table_width = MONTH_WIDTH + repositories.len() * (MONTHLY_WIDTH + ALL_TIME_WIDTH + 2) + 2;
    let rule_width = table_width.min(get_terminal_width().max(MONTH_WIDTH));

    let mut header = format!("{:<MONTH_WIDTH$}", "Month");
    for repo in repositories {
        write!(header, " {:>MONTHLY_WIDTH$}", short_name(repo, MONTHLY_WIDTH))?;
    }
    header.push_str(" |");
    for repo in repositories {
        let label = format!("{}{ALL_TIME_LABEL}", short_name(repo, ALL_TIME_WIDTH - ALL_TIME_LABEL.len()));
        write!(header, " {label:>ALL_TIME_WIDTH$}")?;
    }

    writeln!(writer, "{}", "═".repeat(rule_width))?;
    if use_colors {
        writeln!(writer, "{}", header.bold())?;
    } else {
        writeln!(writer, "{header}")?;
    }
    writeln!(writer, "{}", "─".repeat(rule_width))?;

    for row in history.rows() {
        write!(writer, "{:<MONTH_WIDTH$}", row.month.to_string())?;
        for &count in &row.monthly {
            write!(writer, " {:>MONTHLY_WIDTH$}", format_count(count))?;
        }
        write!(writer, " |")?;
        for total in &row.all_time {
            let cell = total.map_or_else(String::new, format_count);
            write!(writer, " {cell:>ALL_TIME_WIDTH$}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "─".repeat(rule_width))?;
    Ok(())
}

/// Print each repository's current total and its change over the latest month.
pub fn generate_summary<W: Write>(summary: &DashboardSummary, use_colors: bool, writer: &mut W) -> Result<()> {
    writeln!(writer, "Current totals (as of {}):", summary.latest_month)?;

    let name_width = summary
        .repositories
        .iter()
        .map(|r| r.repository.to_string().len())
        .max()
        .unwrap_or(0);

    for repo in &summary.repositories {
        let name = repo.repository.to_string();
        let Some(current) = repo.current else {
            writeln!(writer, "  {name:<name_width$} : n/a")?;
            continue;
        };

        let delta = repo.delta().unwrap_or(0);
        let delta_text = format!("{} this month", format_delta(delta));
        let delta_text = if !use_colors {
            delta_text
        } else if delta > 0 {
            delta_text.green().to_string()
        } else if delta < 0 {
            delta_text.red().to_string()
        } else {
            delta_text.dimmed().to_string()
        };

        writeln!(writer, "  {name:<name_width$} : {} ({delta_text})", format_count(current))?;
    }

    Ok(())
}

/// Print the current star count of each repository, in `repositories` order.
pub fn generate_totals<W: Write>(repositories: &[RepoSpec], totals: &RepositoryTotals, writer: &mut W) -> Result<()> {
    writeln!(writer, "Current totals:")?;
    for repo in repositories {
        let total = totals.get(repo).map_or_else(|| "n/a".to_string(), |&total| format_count(total));
        writeln!(writer, "  {repo}: {total}")?;
    }
    Ok(())
}

/// Get the terminal width, defaulting to 120 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(120, |(Width(w), _)| usize::from(w))
}
