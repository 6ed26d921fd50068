//! Text and JSON rendering of the dashboard.
//!
//! Rendering is a pure function of the [`Dashboard`] snapshot; the event
//! loop decides when to print.

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

use crate::cli::TimeFormatArg;
use crate::dashboard::{Dashboard, LoadPhase};
use crate::metrics_api::RECENT_CALLS_LIMIT;
use crate::series::{CostPoint, cost_range, derive_cost_series};
use crate::utils::{format_currency, format_duration, time_label, truncate};

pub const DETAIL_PLACEHOLDER: &str = "Select a row to view details.";
const MODEL_COL_WIDTH: usize = 22;
const TIME_COL_WIDTH: usize = 12;
const MIN_CHART_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    pub time_fmt: TimeFormatArg,
    pub chart_height: usize,
    /// Terminal columns available to the chart
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            color: false,
            time_fmt: TimeFormatArg::Auto,
            chart_height: 8,
            width: 100,
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Title,
    Muted,
    Value,
    Error,
    Selected,
    Accent,
}

fn paint(text: &str, tone: Tone, color: bool) -> String {
    #[cfg(feature = "colors")]
    if color {
        return match tone {
            Tone::Title => text.bold().to_string(),
            Tone::Muted => text.bright_black().to_string(),
            Tone::Value => text.bright_white().bold().to_string(),
            Tone::Error => text.red().bold().to_string(),
            Tone::Selected => text.bright_cyan().bold().to_string(),
            Tone::Accent => text.bright_blue().to_string(),
        };
    }
    let _ = (tone, color);
    text.to_string()
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// Render the whole dashboard as terminal text
pub fn render_dashboard(view: &Dashboard, opts: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.extend(render_header(view, opts));
    lines.push(String::new());
    if let Some(err) = view.error() {
        lines.push(paint(&format!("✖ {err}"), Tone::Error, opts.color));
        lines.push(String::new());
    }

    lines.extend(render_cards(view, opts));
    if let Some(summary) = view.summary()
        && !summary.by_model.is_empty()
    {
        lines.push(String::new());
        lines.push(paint("By Model", Tone::Title, opts.color));
        for m in &summary.by_model {
            let name = truncate(m.model.as_deref().unwrap_or("unknown"), MODEL_COL_WIDTH);
            lines.push(format!(
                "  {} {:>8} calls  {}",
                pad(&name, MODEL_COL_WIDTH),
                m.calls,
                format_currency(Some(m.cost_usd))
            ));
        }
    }

    lines.push(String::new());
    lines.push(paint(
        &format!("Cost (last {RECENT_CALLS_LIMIT} calls)"),
        Tone::Title,
        opts.color,
    ));
    let series = derive_cost_series(view.calls(), opts.time_fmt);
    lines.extend(render_chart(&series, opts));

    lines.push(String::new());
    lines.push(paint("Recent Calls", Tone::Title, opts.color));
    lines.extend(render_table(view, opts));

    lines.push(String::new());
    lines.push(paint("Selected Call", Tone::Title, opts.color));
    lines.extend(render_detail(view, opts));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_header(view: &Dashboard, opts: &RenderOptions) -> Vec<String> {
    let status = match view.phase() {
        LoadPhase::Idle => paint("not loaded", Tone::Muted, opts.color),
        LoadPhase::Loading => paint("loading…", Tone::Accent, opts.color),
        LoadPhase::Loaded => paint("up to date", Tone::Muted, opts.color),
        LoadPhase::Failed => paint("last load failed", Tone::Error, opts.color),
    };
    vec![
        format!(
            "{}  {} {}  {}",
            paint("TokeScope", Tone::Title, opts.color),
            paint("Workspace:", Tone::Muted, opts.color),
            paint(view.credential().as_str(), Tone::Value, opts.color),
            status
        ),
        paint(
            "key <value> edit · load save+reload · refresh reload · select <n> · help · quit",
            Tone::Muted,
            opts.color,
        ),
    ]
}

/// Values shown on the three metric cards, zeroed before the first load
pub fn card_values(view: &Dashboard) -> [(&'static str, String); 3] {
    let summary = view.summary();
    [
        (
            "Total Calls",
            summary.map(|s| s.total_calls).unwrap_or(0).to_string(),
        ),
        (
            "Total Cost",
            format_currency(Some(summary.map(|s| s.total_cost_usd).unwrap_or(0.0))),
        ),
        (
            "Avg Latency",
            format_duration(Some(summary.map(|s| s.avg_latency_ms).unwrap_or(0.0))),
        ),
    ]
}

fn render_cards(view: &Dashboard, opts: &RenderOptions) -> Vec<String> {
    let cards = card_values(view);
    let mut top = String::new();
    let mut title_row = String::new();
    let mut value_row = String::new();
    let mut bottom = String::new();
    for (title, value) in &cards {
        let inner = title.chars().count().max(value.chars().count()) + 2;
        top.push_str(&format!("╭{}╮ ", "─".repeat(inner)));
        title_row.push_str(&format!(
            "│ {}│ ",
            paint(&pad(title, inner - 1), Tone::Muted, opts.color)
        ));
        value_row.push_str(&format!(
            "│ {}│ ",
            paint(&pad(value, inner - 1), Tone::Value, opts.color)
        ));
        bottom.push_str(&format!("╰{}╯ ", "─".repeat(inner)));
    }
    vec![top, title_row, value_row, bottom]
        .into_iter()
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// Plot the series as a line chart, one column per sample.
///
/// Series wider than the terminal are sampled down to fit.
pub fn render_chart(series: &[CostPoint], opts: &RenderOptions) -> Vec<String> {
    let Some((lo, hi)) = cost_range(series) else {
        return vec![paint("  (no data)", Tone::Muted, opts.color)];
    };
    let height = opts.chart_height.max(2);
    let hi_label = format_currency(Some(hi));
    let lo_label = format_currency(Some(lo));
    let axis_width = hi_label.chars().count().max(lo_label.chars().count());
    let columns = series
        .len()
        .min(opts.width.saturating_sub(axis_width + 2).max(MIN_CHART_WIDTH));

    let span = hi - lo;
    let levels: Vec<usize> = (0..columns)
        .map(|col| {
            let point = &series[col * series.len() / columns];
            if span > 0.0 {
                (((point.cost - lo) / span) * (height - 1) as f64).round() as usize
            } else {
                (height - 1) / 2
            }
        })
        .collect();

    let mut grid = vec![vec![' '; columns]; height];
    for (col, &level) in levels.iter().enumerate() {
        grid[level][col] = '•';
        if col > 0 {
            let prev = levels[col - 1];
            let (a, b) = (prev.min(level), prev.max(level));
            for row in grid.iter_mut().take(b).skip(a + 1) {
                row[col] = '│';
            }
        }
    }

    let mut lines = Vec::with_capacity(height + 2);
    for row in (0..height).rev() {
        let label = if row == height - 1 {
            hi_label.as_str()
        } else if row == 0 {
            lo_label.as_str()
        } else {
            ""
        };
        let plot: String = grid[row].iter().collect();
        lines.push(format!(
            "{} ┤{}",
            paint(&format!("{label:>axis_width$}"), Tone::Muted, opts.color),
            paint(&plot, Tone::Accent, opts.color)
        ));
    }
    lines.push(format!("{} └{}", " ".repeat(axis_width), "─".repeat(columns)));

    let first = &series[0].label;
    let labels = match series.last() {
        Some(last) if series.len() > 1 => {
            let last = &last.label;
            let gap = columns.saturating_sub(first.chars().count() + last.chars().count()).max(1);
            format!("{first}{}{last}", " ".repeat(gap))
        }
        _ => first.clone(),
    };
    lines.push(paint(
        &format!("{}  {labels}", " ".repeat(axis_width)),
        Tone::Muted,
        opts.color,
    ));
    lines
}

fn render_table(view: &Dashboard, opts: &RenderOptions) -> Vec<String> {
    let calls = view.calls();
    let mut lines = vec![paint(
        &format!(
            "   {:>3}  {} {} {:>12}  {:>9}",
            "#",
            pad("Time", TIME_COL_WIDTH),
            pad("Model", MODEL_COL_WIDTH),
            "Cost",
            "Latency"
        ),
        Tone::Muted,
        opts.color,
    )];
    if calls.is_empty() {
        lines.push(paint("    (no calls)", Tone::Muted, opts.color));
        return lines;
    }
    for (i, c) in calls.iter().take(RECENT_CALLS_LIMIT).enumerate() {
        let is_selected = view.selected_index() == Some(i);
        let row = format!(
            "{} {:>3}  {} {} {:>12}  {:>9}",
            if is_selected { " ▶" } else { "  " },
            i + 1,
            pad(&truncate(&time_label(c.created_at(), opts.time_fmt), TIME_COL_WIDTH), TIME_COL_WIDTH),
            pad(&truncate(c.model_name(), MODEL_COL_WIDTH), MODEL_COL_WIDTH),
            format_currency(c.cost_usd()),
            format_duration(c.latency_ms())
        );
        lines.push(if is_selected {
            paint(&row, Tone::Selected, opts.color)
        } else {
            row
        });
    }
    lines
}

fn render_detail(view: &Dashboard, opts: &RenderOptions) -> Vec<String> {
    match view.selected() {
        None => vec![paint(&format!("  {DETAIL_PLACEHOLDER}"), Tone::Muted, opts.color)],
        Some(record) => match serde_json::to_string_pretty(record) {
            Ok(json) => json.lines().map(|l| format!("  {l}")).collect(),
            Err(e) => vec![paint(&format!("  <unrenderable record: {e}>"), Tone::Error, opts.color)],
        },
    }
}

/// Machine-readable snapshot of the dashboard
pub fn render_json(view: &Dashboard, time_fmt: TimeFormatArg) -> serde_json::Value {
    let cards = card_values(view);
    serde_json::json!({
        "workspace": view.credential().as_str(),
        "phase": view.phase().as_str(),
        "error": view.error(),
        "summary": view.summary(),
        "cards": {
            "total_calls": cards[0].1,
            "total_cost": cards[1].1,
            "avg_latency": cards[2].1,
        },
        "series": derive_cost_series(view.calls(), time_fmt),
        "calls": view.calls(),
        "selected_index": view.selected_index(),
        "selected": view.selected(),
    })
}
