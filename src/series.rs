//! # Series Module
//!
//! Turns the newest-first call list into a chronological cost series for
//! the chart.

use serde::Serialize;

use crate::cli::TimeFormatArg;
use crate::models::CallRecord;
use crate::utils::time_label;

/// One chart sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostPoint {
    pub label: String,
    pub cost: f64,
}

/// Build the cost series oldest first.
///
/// The service returns calls newest first, so the input is walked in
/// reverse. Missing costs plot as zero.
pub fn derive_cost_series(calls: &[CallRecord], time_fmt: TimeFormatArg) -> Vec<CostPoint> {
    calls
        .iter()
        .rev()
        .map(|c| CostPoint {
            label: time_label(c.created_at(), time_fmt),
            cost: c.cost_usd().unwrap_or(0.0),
        })
        .collect()
}

/// Smallest and largest cost in the series, `None` when empty
pub fn cost_range(series: &[CostPoint]) -> Option<(f64, f64)> {
    series.iter().map(|p| p.cost).fold(None, |acc, c| match acc {
        None => Some((c, c)),
        Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(created_at: &str, cost: Option<f64>) -> CallRecord {
        serde_json::from_value(json!({
            "created_at": created_at,
            "model": "gpt-4o-mini",
            "cost_usd": cost,
            "latency_ms": 100,
        }))
        .unwrap()
    }

    #[test]
    fn series_is_reverse_of_input() {
        let calls = vec![
            call("T3", Some(0.001)),
            call("T2", Some(0.0008)),
            call("T1", Some(0.0003)),
        ];
        let series = derive_cost_series(&calls, TimeFormatArg::H24);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["T1", "T2", "T3"]);
        let costs: Vec<f64> = series.iter().map(|p| p.cost).collect();
        assert_eq!(costs, [0.0003, 0.0008, 0.001]);
    }

    #[test]
    fn missing_cost_plots_as_zero() {
        let calls = vec![call("T2", None), call("T1", Some(0.5))];
        let series = derive_cost_series(&calls, TimeFormatArg::H24);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cost, 0.5);
        assert_eq!(series[1].cost, 0.0);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(derive_cost_series(&[], TimeFormatArg::Auto).is_empty());
        assert_eq!(cost_range(&[]), None);
    }

    #[test]
    fn timestamps_become_time_labels() {
        let calls = vec![call("2025-03-01T10:15:30.5", Some(0.1))];
        let series = derive_cost_series(&calls, TimeFormatArg::H24);
        assert_ne!(series[0].label, "2025-03-01T10:15:30.5");
        assert!(series[0].label.ends_with(":30"), "{}", series[0].label);
    }

    #[test]
    fn cost_range_spans_series() {
        let calls = vec![call("c", Some(0.2)), call("b", Some(0.05)), call("a", Some(0.9))];
        let series = derive_cost_series(&calls, TimeFormatArg::H24);
        assert_eq!(cost_range(&series), Some((0.05, 0.9)));
    }
}
