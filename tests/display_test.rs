mod common;

use common::{ScriptedSource, scenario_calls, scenario_summary};
use tokescope_dashboard::cli::TimeFormatArg;
use tokescope_dashboard::dashboard::{Dashboard, perform_load};
use tokescope_dashboard::display::{
    DETAIL_PLACEHOLDER, RenderOptions, card_values, render_dashboard, render_json,
};
use tokescope_dashboard::metrics_api::RequestError;
use tokescope_dashboard::models::{CallRecord, Credential, ModelUsage, Summary};

fn opts() -> RenderOptions {
    RenderOptions {
        color: false,
        time_fmt: TimeFormatArg::H24,
        chart_height: 5,
        width: 80,
    }
}

fn loaded(source: &ScriptedSource) -> Dashboard {
    let mut view = Dashboard::new(Credential::new("test"));
    let ticket = view.begin_load();
    view.apply(perform_load(source, &ticket));
    view
}

#[test]
fn cards_show_scenario_values() {
    let source = ScriptedSource::new(scenario_summary(), scenario_calls());
    let view = loaded(&source);
    let values: Vec<String> = card_values(&view).into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, ["3", "$0.002100", "842 ms"]);
}

#[test]
fn cards_are_zeroed_before_first_load() {
    let view = Dashboard::new(Credential::new("test"));
    let values: Vec<String> = card_values(&view).into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, ["0", "$0.000000", "0 ms"]);
}

#[test]
fn dashboard_marks_selected_row_and_dumps_it() {
    let source = ScriptedSource::new(scenario_summary(), scenario_calls());
    let mut view = loaded(&source);
    view.select(1);
    let text = render_dashboard(&view, &opts());

    let selected: Vec<&str> = text.lines().filter(|l| l.contains('▶')).collect();
    assert_eq!(selected.len(), 1);
    assert!(selected[0].contains("T2"), "{}", selected[0]);
    assert!(selected[0].contains("$0.000800"));
    assert!(selected[0].contains("800 ms"));

    assert!(text.contains("\"created_at\": \"T2\""));
    assert!(text.contains("\"provider\": \"openai\""));
    assert!(!text.contains(DETAIL_PLACEHOLDER));
    assert!(text.contains("Workspace: test"));
}

#[test]
fn detail_panel_shows_record_as_received() {
    let record: CallRecord = serde_json::from_str(
        r#"{"provider":"openai","latency_ms":900,"cost_usd":0.001,"created_at":"2025-05-01T12:00:03"}"#,
    )
    .unwrap();
    let source = ScriptedSource::new(scenario_summary(), vec![record]);
    let text = render_dashboard(&loaded(&source), &opts());

    let detail: Vec<&str> = text
        .lines()
        .skip_while(|l| !l.contains("Selected Call"))
        .skip(1)
        .map(str::trim)
        .take(6)
        .collect();
    assert_eq!(
        detail,
        [
            "{",
            "\"provider\": \"openai\",",
            "\"latency_ms\": 900,",
            "\"cost_usd\": 0.001,",
            "\"created_at\": \"2025-05-01T12:00:03\"",
            "}"
        ]
    );
    assert!(!text.contains("\"model\""));
}

#[test]
fn empty_list_shows_placeholder() {
    let source = ScriptedSource::new(Summary::default(), Vec::new());
    let view = loaded(&source);
    let text = render_dashboard(&view, &opts());
    assert!(text.contains(DETAIL_PLACEHOLDER));
    assert!(text.contains("(no calls)"));
    assert!(text.contains("(no data)"));
    assert!(!text.contains('▶'));
}

#[test]
fn error_banner_only_when_failed() {
    let source = ScriptedSource::new(scenario_summary(), scenario_calls());
    let mut view = loaded(&source);
    assert!(!render_dashboard(&view, &opts()).contains('✖'));

    source.set_calls(Err(RequestError::Transport("connection refused".to_string())));
    let ticket = view.begin_load();
    view.apply(perform_load(&source, &ticket));
    let text = render_dashboard(&view, &opts());
    assert!(text.contains("✖ connection refused"));
    // previous data remains on screen
    assert!(text.contains("$0.002100"));
}

#[test]
fn by_model_breakdown_is_listed() {
    let mut summary = scenario_summary();
    summary.by_model = vec![ModelUsage {
        model: Some("gpt-4o".to_string()),
        calls: 3,
        cost_usd: 0.0021,
    }];
    let source = ScriptedSource::new(summary, scenario_calls());
    let text = render_dashboard(&loaded(&source), &opts());
    assert!(text.contains("By Model"));
    assert!(text.lines().any(|l| l.contains("gpt-4o") && l.contains("3 calls")));
}

#[test]
fn json_snapshot_has_series_in_chronological_order() {
    let source = ScriptedSource::new(scenario_summary(), scenario_calls());
    let view = loaded(&source);
    let json = render_json(&view, TimeFormatArg::H24);

    assert_eq!(json["phase"], "loaded");
    assert_eq!(json["workspace"], "test");
    assert_eq!(json["cards"]["total_cost"], "$0.002100");
    assert_eq!(json["selected_index"], 0);
    assert_eq!(json["selected"]["created_at"], "T3");
    let labels: Vec<&str> = json["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["T1", "T2", "T3"]);
    assert!(json["error"].is_null());
}
