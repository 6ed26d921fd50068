#![allow(dead_code)]

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use serde_json::json;
use tokescope_dashboard::metrics_api::{MetricsSource, RequestError};
use tokescope_dashboard::models::{CallRecord, Credential, Summary};

/// Which endpoint a fake request hit
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Summary(String),
    Calls(String, usize),
}

/// In-memory metrics source with replaceable responses
pub struct ScriptedSource {
    summary: Mutex<Result<Summary, RequestError>>,
    calls: Mutex<Result<Vec<CallRecord>, RequestError>>,
    summary_delay: Mutex<Duration>,
    calls_delay: Mutex<Duration>,
    hits: Mutex<Vec<Hit>>,
}

impl ScriptedSource {
    pub fn new(summary: Summary, calls: Vec<CallRecord>) -> Self {
        ScriptedSource {
            summary: Mutex::new(Ok(summary)),
            calls: Mutex::new(Ok(calls)),
            summary_delay: Mutex::new(Duration::ZERO),
            calls_delay: Mutex::new(Duration::ZERO),
            hits: Mutex::new(Vec::new()),
        }
    }

    pub fn set_summary(&self, r: Result<Summary, RequestError>) {
        *self.summary.lock().unwrap() = r;
    }

    pub fn set_calls(&self, r: Result<Vec<CallRecord>, RequestError>) {
        *self.calls.lock().unwrap() = r;
    }

    pub fn delay_summary(&self, d: Duration) {
        *self.summary_delay.lock().unwrap() = d;
    }

    pub fn delay_calls(&self, d: Duration) {
        *self.calls_delay.lock().unwrap() = d;
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn summary_credentials(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .filter_map(|h| match h {
                Hit::Summary(k) => Some(k),
                Hit::Calls(..) => None,
            })
            .collect()
    }
}

impl MetricsSource for ScriptedSource {
    fn fetch_summary(&self, credential: &Credential) -> Result<Summary, RequestError> {
        let delay = *self.summary_delay.lock().unwrap();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.hits
            .lock()
            .unwrap()
            .push(Hit::Summary(credential.as_str().to_string()));
        self.summary.lock().unwrap().clone()
    }

    fn fetch_recent_calls(
        &self,
        credential: &Credential,
        limit: usize,
    ) -> Result<Vec<CallRecord>, RequestError> {
        let delay = *self.calls_delay.lock().unwrap();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.hits
            .lock()
            .unwrap()
            .push(Hit::Calls(credential.as_str().to_string(), limit));
        self.calls.lock().unwrap().clone()
    }
}

pub fn call(created_at: &str, cost: f64, latency: f64) -> CallRecord {
    serde_json::from_value(json!({
        "model": "gpt-4o-mini",
        "provider": "openai",
        "prompt_tokens": 120,
        "latency_ms": latency,
        "cost_usd": cost,
        "created_at": created_at,
    }))
    .unwrap()
}

/// The three-call workspace used throughout the scenarios
pub fn scenario_summary() -> Summary {
    Summary {
        total_calls: 3,
        total_cost_usd: 0.0021,
        avg_latency_ms: 842.0,
        by_model: Vec::new(),
    }
}

pub fn scenario_calls() -> Vec<CallRecord> {
    vec![
        call("T3", 0.001, 900.0),
        call("T2", 0.0008, 800.0),
        call("T1", 0.0003, 826.0),
    ]
}
