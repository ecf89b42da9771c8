use crate::stars::{PageReport, Progress, RepoSpec};
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Instant;

/// Refresh rate for the spinner (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{spinner}] {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{spinner}] {msg}";

const TICK_STRINGS: &[&str] = &[
    "=>       ", "==>      ", " ==>     ", "  ==>    ", "   ==>   ", "    ==>  ", "     ==> ", "      ==>", "       ==",
    "        =", "       <=", "      <==", "     <== ", "    <==  ", "   <==   ", "  <==    ", " <==     ", "<==      ",
    "==       ", "=        ", "         ",
];

/// Reports collection progress on stderr: a spinner naming the current repository plus one
/// line per fetched page.
///
/// The spinner only becomes visible once the run has lasted longer than the configured delay.
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Instant,
    visible: AtomicBool,
    stars_kept: AtomicUsize,
    echo_pages: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// When `use_colors` is false, spinner chrome is rendered without ANSI styling. Page lines are
    /// printed only when `echo_pages` is set.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool, echo_pages: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_draw_target(ProgressDrawTarget::hidden());
        bar.set_prefix("Fetching");

        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        match ProgressStyle::default_spinner().template(template) {
            Ok(style) => bar.set_style(style.tick_strings(TICK_STRINGS)),
            Err(e) => log::debug!("could not create progress style: {e}"),
        }

        Self {
            bar,
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
            stars_kept: AtomicUsize::new(0),
            echo_pages,
        }
    }

    fn reveal_if_due(&self) {
        if !self.visible.load(Ordering::Relaxed) && Instant::now() >= self.visible_after {
            self.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
            self.bar.enable_steady_tick(Duration::from_millis(REFRESH_INTERVAL_MS));
        }
    }

    /// Print a message line without disrupting the spinner.
    fn println(&self, msg: &str) {
        self.bar.suspend(|| eprintln!("{msg}"));
    }
}

impl Progress for ProgressReporter {
    fn repository_started(&self, repo: &RepoSpec) {
        self.reveal_if_due();
        self.stars_kept.store(0, Ordering::Relaxed);
        self.bar.set_message(format!("{repo} (newest first)"));

        if self.echo_pages {
            self.println(&format!("Fetching {repo} stars (newest first)..."));
        }
    }

    fn page_fetched(&self, repo: &RepoSpec, report: &PageReport) {
        self.reveal_if_due();
        let kept = self.stars_kept.fetch_add(report.kept, Ordering::Relaxed) + report.kept;
        let oldest = report
            .oldest
            .map_or_else(|| "N/A".to_string(), |oldest| oldest.format("%Y-%m-%d").to_string());

        self.bar.set_message(format!("{repo}: page {}, {kept} star(s) so far, reached {oldest}", report.page));

        if self.echo_pages {
            self.println(&format!("  Page {}: {} stars (oldest: {oldest})", report.page, report.kept));
        }
    }

    /// Finish and clear the progress indicator.
    fn done(&self) {
        if self.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("stars_kept", &self.stars_kept)
            .field("echo_pages", &self.echo_pages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_stays_hidden_before_delay() {
        let reporter = ProgressReporter::new(Duration::from_secs(3600), false, false);
        let repo = RepoSpec::new("coder", "coder");

        reporter.repository_started(&repo);
        reporter.page_fetched(
            &repo,
            &PageReport {
                page: 1,
                kept: 10,
                oldest: None,
            },
        );

        assert!(!reporter.visible.load(Ordering::Relaxed));
        reporter.done();
    }

    #[test]
    fn test_counts_stars_per_repository() {
        let reporter = ProgressReporter::new(Duration::from_secs(3600), false, false);
        let coder = RepoSpec::new("coder", "coder");
        let blink = RepoSpec::new("coder", "blink");
        let oldest = Some(Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap());

        reporter.repository_started(&coder);
        reporter.page_fetched(&coder, &PageReport { page: 1, kept: 100, oldest });
        reporter.page_fetched(&coder, &PageReport { page: 2, kept: 40, oldest });
        assert_eq!(reporter.stars_kept.load(Ordering::Relaxed), 140);
        assert_eq!(reporter.bar.message(), "coder/coder: page 2, 140 star(s) so far, reached 2025-02-03");

        reporter.repository_started(&blink);
        assert_eq!(reporter.stars_kept.load(Ordering::Relaxed), 0);
        reporter.done();
    }

    #[test]
    fn test_becomes_visible_after_delay() {
        let reporter = ProgressReporter::new(Duration::ZERO, true, false);
        reporter.repository_started(&RepoSpec::new("coder", "coder"));
        assert!(reporter.visible.load(Ordering::Relaxed));
        reporter.done();
    }
}
