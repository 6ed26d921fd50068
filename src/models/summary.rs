use serde::{Deserialize, Serialize};

/// Aggregate metrics for one workspace as reported by `/metrics/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub total_calls: u64,
    pub total_cost_usd: f64,
    pub avg_latency_ms: f64,
    pub by_model: Vec<ModelUsage>,
}

/// Per-model slice of the summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelUsage {
    pub model: Option<String>,
    pub calls: u64,
    pub cost_usd: f64,
}
