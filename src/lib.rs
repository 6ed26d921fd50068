//! # TokeScope Dashboard
//!
//! A terminal dashboard for the TokeScope metrics service: it fetches the
//! workspace summary and the most recent LLM calls, and renders metric
//! cards, a cost chart, a recent-calls table and a detail panel.
//!
//! ## Features
//!
//! - `colors` (default): Enables terminal color output via owo-colors

/// Event loop and command parsing
pub mod app;

/// Command-line argument parsing and configuration
pub mod cli;

/// View state controller and the load protocol
pub mod dashboard;

/// Persisted workspace key (SQLite)
pub mod db;

/// Text and JSON rendering
pub mod display;

/// HTTP client for the metrics service
pub mod metrics_api;

/// Data models for summaries, call records and credentials
pub mod models;

/// Chart series derivation
pub mod series;

/// Formatting helpers for currency, durations and time
pub mod utils;
