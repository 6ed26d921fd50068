use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::env;

use crate::cli::TimeFormatArg;

pub const ZERO_CURRENCY: &str = "$0.00";
pub const ZERO_DURATION: &str = "0 ms";

/// Render a USD amount with six decimals; absent values use the zero form
pub fn format_currency(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("${v:.6}"),
        None => ZERO_CURRENCY.to_string(),
    }
}

/// Render a latency as whole milliseconds, rounded to nearest
pub fn format_duration(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{} ms", v.round() as i64),
        None => ZERO_DURATION.to_string(),
    }
}

/// Whether time labels should use a 12-hour clock.
///
/// `Auto` honours `TOKESCOPE_TIME_FORMAT=12|24` first, then falls back to the
/// `LC_TIME`/`LANG` locale (en_US prefers 12-hour).
pub fn uses_12h_clock(fmt: TimeFormatArg) -> bool {
    match fmt {
        TimeFormatArg::H12 => true,
        TimeFormatArg::H24 => false,
        TimeFormatArg::Auto => {
            if let Ok(forced) = env::var("TOKESCOPE_TIME_FORMAT") {
                forced.trim() == "12"
            } else {
                let lc = env::var("LC_TIME")
                    .or_else(|_| env::var("LANG"))
                    .unwrap_or_default()
                    .to_lowercase();
                lc.contains("en_us")
            }
        }
    }
}

/// Local time-of-day label for a call timestamp
pub fn format_time_of_day(ts: DateTime<Utc>, fmt: TimeFormatArg) -> String {
    let pattern = if uses_12h_clock(fmt) {
        "%-I:%M:%S %p"
    } else {
        "%H:%M:%S"
    };
    ts.with_timezone(&Local).format(pattern).to_string()
}

/// Time label for a raw `created_at` field; unparseable input is shown as-is
pub fn time_label(raw: &str, fmt: TimeFormatArg) -> String {
    match parse_timestamp(raw) {
        Some(ts) => format_time_of_day(ts, fmt),
        None => raw.to_string(),
    }
}

/// Parse a service timestamp.
///
/// The metrics service emits naive ISO-8601 values (UTC without offset);
/// RFC 3339 with an explicit offset is accepted too.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Clip `s` to at most `width` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}
