use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::parse_timestamp;

/// One logged LLM invocation from `/metrics/calls`.
///
/// The wire object is kept as received, so the detail panel shows the
/// record exactly as the service sent it. The fields the dashboard reads
/// are looked up on demand, and a missing or mistyped one reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallRecord {
    raw: Map<String, Value>,
}

impl CallRecord {
    /// Raw `created_at` text, empty when the service sent none
    pub fn created_at(&self) -> &str {
        self.raw
            .get("created_at")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn model(&self) -> Option<&str> {
        self.raw.get("model").and_then(Value::as_str)
    }

    pub fn cost_usd(&self) -> Option<f64> {
        self.raw.get("cost_usd").and_then(Value::as_f64)
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.raw.get("latency_ms").and_then(Value::as_f64)
    }

    /// Any field of the record, interpreted or not
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at())
    }

    pub fn model_name(&self) -> &str {
        self.model().unwrap_or("-")
    }
}
