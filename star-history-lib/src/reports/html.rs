use super::common::{format_count, format_delta};
use super::summary::DashboardSummary;
use crate::Result;
use crate::history::StarHistory;
use crate::table::{ColumnKind, LoadedTable, write_history};
use chrono::{DateTime, Local};
use core::fmt::Write;
use ohno::IntoAppError;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

const STAR_FAVICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'%3E%3Cpath d='M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z' fill='%23f5b301'/%3E%3C/svg%3E";

const REFRESH_COMMAND: &str = "star-history collect";

/// Series colours, reused cyclically when there are more repositories than entries.
const PALETTE: [&str; 8] = ["#3b82f6", "#f97316", "#16a34a", "#dc2626", "#9333ea", "#0891b2", "#ca8a04", "#db2777"];

const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 320;
const PLOT_LEFT: u32 = 64;
const PLOT_RIGHT: u32 = 16;
const PLOT_TOP: u32 = 16;
const PLOT_BOTTOM: u32 = 40;

/// Write a self-contained HTML dashboard for `table`.
///
/// `file_prefix` names the file offered by the download link.
pub fn generate<W: Write>(
    table: &LoadedTable,
    summary: &DashboardSummary,
    file_prefix: &str,
    timestamp: DateTime<Local>,
    writer: &mut W,
) -> Result<()> {
    let history = &table.history;

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>GitHub Star Tracking</title>")?;
    writeln!(writer, "  <link rel=\"icon\" type=\"image/svg+xml\" href=\"{STAR_FAVICON}\">")?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    writeln!(writer, "  <div class=\"header\">")?;
    writeln!(writer, "    <h1>GitHub Star Tracking Dashboard</h1>")?;
    writeln!(writer, "    <p class=\"subtitle\">Monthly star metrics. Data source: {}</p>", html_escape(table.path.as_str()))?;
    writeln!(writer, "  </div>")?;

    write_summary(writer, summary)?;

    writeln!(writer, "  <div class=\"charts\">")?;
    writeln!(writer, "    <div class=\"panel\">")?;
    writeln!(writer, "      <h2>Monthly New Stars</h2>")?;
    write_bar_chart(writer, history)?;
    writeln!(writer, "    </div>")?;
    writeln!(writer, "    <div class=\"panel\">")?;
    writeln!(writer, "      <h2>Cumulative Stars Over Time</h2>")?;
    write_line_chart(writer, history)?;
    writeln!(writer, "    </div>")?;
    writeln!(writer, "  </div>")?;
    write_legend(writer, history)?;

    writeln!(writer, "  <div class=\"panel\">")?;
    writeln!(writer, "    <h2>Raw Data</h2>")?;
    write_data_table(writer, table)?;
    write_download_link(writer, table, file_prefix, timestamp)?;
    writeln!(writer, "  </div>")?;

    writeln!(writer, "  <div class=\"footer\">")?;
    writeln!(writer, "    <p>Last updated: {}</p>", timestamp.format("%Y-%m-%d %H:%M"))?;
    writeln!(writer, "    <p>To refresh data, run: <code>{REFRESH_COMMAND}</code></p>")?;
    writeln!(writer, "  </div>")?;

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1a202c;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0;")?;
    writeln!(writer, "      --hover-bg: #f8fafc;")?;
    writeln!(writer, "      --accent-color: #3b82f6;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04);")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    @media (prefers-color-scheme: dark) {{")?;
    writeln!(writer, "      :root {{")?;
    writeln!(writer, "        --bg-color: #0f172a;")?;
    writeln!(writer, "        --card-bg: #1e293b;")?;
    writeln!(writer, "        --text-color: #e2e8f0;")?;
    writeln!(writer, "        --text-secondary: #94a3b8;")?;
    writeln!(writer, "        --border-color: #334155;")?;
    writeln!(writer, "        --hover-bg: #263044;")?;
    writeln!(writer, "        --accent-color: #60a5fa;")?;
    writeln!(writer, "        --shadow: 0 1px 3px rgba(0,0,0,0.3), 0 4px 16px rgba(0,0,0,0.2);")?;
    writeln!(writer, "      }}")?;
    writeln!(writer, "    }}")?;

    writeln!(writer, "    * {{ box-sizing: border-box; }}")?;
    writeln!(writer, "    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; padding: 32px; background: var(--bg-color); color: var(--text-color); line-height: 1.5; }}")?;
    writeln!(writer, "    .header {{ margin-bottom: 24px; }}")?;
    writeln!(writer, "    h1 {{ margin: 0 0 2px 0; font-size: 26px; font-weight: 700; letter-spacing: -0.5px; }}")?;
    writeln!(writer, "    h2 {{ margin: 0 0 12px 0; font-size: 16px; font-weight: 600; }}")?;
    writeln!(writer, "    .subtitle {{ margin: 0; font-size: 13px; color: var(--text-secondary); }}")?;

    // Summary cards
    writeln!(writer, "    .summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin-bottom: 20px; }}")?;
    writeln!(writer, "    .summary-card {{ background: var(--card-bg); border-radius: 10px; padding: 16px 20px; box-shadow: var(--shadow); border: 1px solid var(--border-color); }}")?;
    writeln!(writer, "    .summary-card .label {{ font-size: 12px; color: var(--text-secondary); font-weight: 600; margin-bottom: 4px; }}")?;
    writeln!(writer, "    .summary-card .value {{ font-size: 26px; font-weight: 700; }}")?;
    writeln!(writer, "    .delta {{ font-size: 13px; font-weight: 600; }}")?;
    writeln!(writer, "    .delta.up {{ color: #16a34a; }}")?;
    writeln!(writer, "    .delta.down {{ color: #dc2626; }}")?;
    writeln!(writer, "    .delta.flat {{ color: var(--text-secondary); }}")?;

    // Panels and charts
    writeln!(writer, "    .charts {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap: 20px; }}")?;
    writeln!(writer, "    .panel {{ background: var(--card-bg); border-radius: 12px; box-shadow: var(--shadow); border: 1px solid var(--border-color); padding: 20px; margin-bottom: 20px; overflow-x: auto; }}")?;
    writeln!(writer, "    svg.chart {{ width: 100%; height: auto; }}")?;
    writeln!(writer, "    svg.chart text {{ fill: var(--text-secondary); font-size: 11px; }}")?;
    writeln!(writer, "    svg.chart .axis {{ stroke: var(--border-color); stroke-width: 1; }}")?;
    writeln!(writer, "    .legend {{ display: flex; flex-wrap: wrap; gap: 16px; margin: -8px 0 20px 0; font-size: 13px; }}")?;
    writeln!(writer, "    .swatch {{ display: inline-block; width: 12px; height: 12px; border-radius: 3px; margin-right: 6px; vertical-align: middle; }}")?;

    // Data table
    writeln!(writer, "    table {{ border-collapse: collapse; width: 100%; }}")?;
    writeln!(writer, "    th {{ text-align: right; padding: 8px 12px; font-size: 11px; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; color: var(--text-secondary); border-bottom: 2px solid var(--border-color); white-space: nowrap; }}")?;
    writeln!(writer, "    td {{ text-align: right; padding: 6px 12px; font-size: 14px; border-bottom: 1px solid var(--border-color); font-variant-numeric: tabular-nums; }}")?;
    writeln!(writer, "    th:first-child, td:first-child {{ text-align: left; }}")?;
    writeln!(writer, "    tr:hover td {{ background: var(--hover-bg); }}")?;

    // Misc
    writeln!(writer, "    a.download {{ display: inline-block; margin-top: 16px; padding: 8px 16px; border-radius: 8px; background: var(--accent-color); color: #ffffff; text-decoration: none; font-weight: 600; font-size: 14px; }}")?;
    writeln!(writer, "    .footer {{ font-size: 12px; color: var(--text-secondary); }}")?;
    writeln!(writer, "    .footer p {{ margin: 2px 0; }}")?;
    writeln!(writer, "    @media (max-width: 640px) {{ body {{ padding: 16px; }} .charts {{ grid-template-columns: 1fr; }} }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, summary: &DashboardSummary) -> Result<()> {
    writeln!(writer, "  <h2>Current Totals</h2>")?;
    writeln!(writer, "  <div class=\"summary\">")?;
    for repo in &summary.repositories {
        let name = html_escape(&repo.repository.to_string());
        let value = repo.current.map_or_else(|| "n/a".to_string(), format_count);
        let (class, delta) = match repo.delta() {
            Some(d) if d > 0 => ("up", format_delta(d)),
            Some(d) if d < 0 => ("down", format_delta(d)),
            Some(_) => ("flat", format_delta(0)),
            None => ("flat", "n/a".to_string()),
        };

        writeln!(
            writer,
            "    <div class=\"summary-card\"><div class=\"label\">{name}</div><div class=\"value\">{value}</div><div class=\"delta {class}\">{delta} this month</div></div>"
        )?;
    }
    writeln!(writer, "  </div>")?;
    Ok(())
}

/// Maps data values onto the plot area of a chart.
#[derive(Debug, Clone, Copy)]
struct Plot {
    slots: usize,
    max_value: u64,
}

impl Plot {
    const WIDTH: u32 = CHART_WIDTH - PLOT_LEFT - PLOT_RIGHT;
    const HEIGHT: u32 = CHART_HEIGHT - PLOT_TOP - PLOT_BOTTOM;

    fn new(slots: usize, max_value: u64) -> Self {
        Self {
            slots: slots.max(1),
            max_value: max_value.max(1),
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "chart coordinates do not need full precision")]
    fn slot_width(self) -> f64 {
        f64::from(Self::WIDTH) / self.slots as f64
    }

    #[expect(clippy::cast_precision_loss, reason = "chart coordinates do not need full precision")]
    fn slot_left(self, slot: usize) -> f64 {
        f64::from(PLOT_LEFT) + self.slot_width() * slot as f64
    }

    fn slot_center(self, slot: usize) -> f64 {
        self.slot_left(slot) + self.slot_width() / 2.0
    }

    #[expect(clippy::cast_precision_loss, reason = "chart coordinates do not need full precision")]
    fn y(self, value: u64) -> f64 {
        let fraction = value as f64 / self.max_value as f64;
        f64::from(PLOT_TOP) + f64::from(Self::HEIGHT) * (1.0 - fraction)
    }

    fn baseline() -> u32 {
        PLOT_TOP + Self::HEIGHT
    }
}

fn write_chart_frame<W: Write>(writer: &mut W, history: &StarHistory, plot: Plot, label: &str) -> Result<()> {
    writeln!(
        writer,
        "      <svg class=\"chart\" viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{label}\">"
    )?;

    let baseline = Plot::baseline();
    let right = CHART_WIDTH - PLOT_RIGHT;
    writeln!(writer, "        <line class=\"axis\" x1=\"{PLOT_LEFT}\" y1=\"{baseline}\" x2=\"{right}\" y2=\"{baseline}\"/>")?;
    writeln!(writer, "        <line class=\"axis\" x1=\"{PLOT_LEFT}\" y1=\"{PLOT_TOP}\" x2=\"{PLOT_LEFT}\" y2=\"{baseline}\"/>")?;

    for tick in [0, plot.max_value / 2, plot.max_value] {
        let y = plot.y(tick);
        let label_x = PLOT_LEFT - 6;
        writeln!(
            writer,
            "        <text x=\"{label_x}\" y=\"{:.1}\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            y,
            format_count(tick)
        )?;
    }

    for (slot, month) in history.months().iter().enumerate() {
        let label_y = baseline + 16;
        writeln!(
            writer,
            "        <text x=\"{:.1}\" y=\"{label_y}\" text-anchor=\"middle\">{month}</text>",
            plot.slot_center(slot)
        )?;
    }

    Ok(())
}

/// Grouped bars: one group per month, one bar per repository.
fn write_bar_chart<W: Write>(writer: &mut W, history: &StarHistory) -> Result<()> {
    let repositories = history.repositories();
    let max_value = (0..repositories.len())
        .flat_map(|index| history.monthly_series(index))
        .max()
        .unwrap_or(0);
    let plot = Plot::new(history.rows().len(), max_value);

    write_chart_frame(writer, history, plot, "Monthly new stars per repository")?;

    let group_width = plot.slot_width() * 0.8;
    #[expect(clippy::cast_precision_loss, reason = "chart coordinates do not need full precision")]
    let bar_width = group_width / repositories.len().max(1) as f64;
    let baseline = f64::from(Plot::baseline());

    for (index, repo) in repositories.iter().enumerate() {
        let name = html_escape(&repo.to_string());
        for (slot, (count, month)) in history.monthly_series(index).zip(history.months()).enumerate() {
            #[expect(clippy::cast_precision_loss, reason = "chart coordinates do not need full precision")]
            let x = plot.slot_left(slot) + plot.slot_width() * 0.1 + bar_width * index as f64;
            let y = plot.y(count);
            writeln!(
                writer,
                "        <rect class=\"bar\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{name} {month}: {}</title></rect>",
                baseline - y,
                series_color(index),
                format_count(count)
            )?;
        }
    }

    writeln!(writer, "      </svg>")?;
    Ok(())
}

/// One line per repository through its known all-time totals.
fn write_line_chart<W: Write>(writer: &mut W, history: &StarHistory) -> Result<()> {
    let repositories = history.repositories();
    let max_value = history
        .rows()
        .iter()
        .flat_map(|row| row.all_time.iter().flatten().copied())
        .max()
        .unwrap_or(0);
    let plot = Plot::new(history.rows().len(), max_value);

    write_chart_frame(writer, history, plot, "Cumulative stars per repository")?;

    for (index, repo) in repositories.iter().enumerate() {
        let points: Vec<(f64, f64, u64)> = history
            .all_time_series(index)
            .enumerate()
            .filter_map(|(slot, total)| total.map(|total| (plot.slot_center(slot), plot.y(total), total)))
            .collect();

        if points.is_empty() {
            continue;
        }

        let color = series_color(index);
        let path: Vec<String> = points.iter().map(|(x, y, _)| format!("{x:.1},{y:.1}")).collect();
        writeln!(
            writer,
            "        <polyline class=\"line\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" points=\"{}\"><title>{}</title></polyline>",
            path.join(" "),
            html_escape(&repo.to_string())
        )?;

        for (x, y, total) in &points {
            writeln!(
                writer,
                "        <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{color}\"><title>{}: {}</title></circle>",
                html_escape(&repo.to_string()),
                format_count(*total)
            )?;
        }
    }

    writeln!(writer, "      </svg>")?;
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, history: &StarHistory) -> Result<()> {
    writeln!(writer, "  <div class=\"legend\">")?;
    for (index, repo) in history.repositories().iter().enumerate() {
        writeln!(
            writer,
            "    <span><span class=\"swatch\" style=\"background: {}\"></span>{}</span>",
            series_color(index),
            html_escape(&repo.to_string())
        )?;
    }
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_data_table<W: Write>(writer: &mut W, table: &LoadedTable) -> Result<()> {
    let history = &table.history;
    let repositories = history.repositories();

    // Columns follow the schema so the page matches the file on disk.
    let columns: Vec<_> = table
        .schema
        .columns
        .iter()
        .filter_map(|column| {
            repositories
                .iter()
                .position(|repo| repo == &column.repository)
                .map(|index| (column, index))
        })
        .collect();

    writeln!(writer, "    <table>")?;
    write!(writer, "      <tr><th>{}</th>", html_escape(&table.schema.month_column))?;
    for (column, _) in &columns {
        write!(writer, "<th>{}</th>", html_escape(&column.name))?;
    }
    writeln!(writer, "</tr>")?;

    for row in history.rows() {
        write!(writer, "      <tr><td>{}</td>", row.month)?;
        for (column, index) in &columns {
            let cell = match column.kind {
                ColumnKind::Monthly => format_count(row.monthly[*index]),
                ColumnKind::AllTime => row.all_time[*index].map_or_else(String::new, format_count),
            };
            write!(writer, "<td>{cell}</td>")?;
        }
        writeln!(writer, "</tr>")?;
    }

    writeln!(writer, "    </table>")?;
    Ok(())
}

fn write_download_link<W: Write>(writer: &mut W, table: &LoadedTable, file_prefix: &str, timestamp: DateTime<Local>) -> Result<()> {
    let mut csv = Vec::new();
    write_history(&table.history, &table.schema, &mut csv)?;
    let csv = String::from_utf8(csv).into_app_err("CSV export is not valid UTF-8")?;

    let file_name = download_file_name(file_prefix, timestamp);
    writeln!(
        writer,
        "    <a class=\"download\" href=\"data:text/csv;charset=utf-8,{}\" download=\"{}\">Download CSV</a>",
        utf8_percent_encode(&csv, NON_ALPHANUMERIC),
        html_escape(&file_name)
    )?;
    Ok(())
}

/// Name offered for downloaded CSV files, e.g. `github_stars_20250314.csv`.
pub fn download_file_name(file_prefix: &str, timestamp: DateTime<Local>) -> String {
    format!("{file_prefix}_{}.csv", timestamp.format("%Y%m%d"))
}

fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
