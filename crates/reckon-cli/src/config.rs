//! Configuration resolution for the CLI.
//!
//! The evaluator configuration is assembled from two sources, in order:
//! 1. `--config <file>`: a JSON document with `group_view`, `metric`,
//!    `topk`, `workers`
//! 2. Command-line flags, which override individual keys from the file
//!
//! The result is still a raw configuration; validation happens in
//! `reckon_core` so file and flag errors are reported the same way.

use anyhow::{Context, Result};
use reckon_core::RawEvalConfig;
use serde_json::Value;
use std::path::Path;

/// Per-key overrides taken from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub metric: Option<Vec<String>>,
    pub topk: Option<Vec<u64>>,
    pub group_view: Option<Vec<u64>>,
    pub workers: Option<u64>,
}

/// Loads a raw configuration from a JSON file.
pub fn load_config_file(path: &Path) -> Result<RawEvalConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    RawEvalConfig::from_json_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Builds the raw configuration from an optional file plus flag overrides.
pub fn resolve(config_file: Option<&Path>, overrides: &Overrides) -> Result<RawEvalConfig> {
    let mut raw = match config_file {
        Some(path) => load_config_file(path)?,
        None => RawEvalConfig::default(),
    };

    if let Some(metric) = &overrides.metric {
        raw.metric = one_or_many(metric.iter().map(|m| Value::from(m.as_str())).collect());
    }
    // A single cutoff K means "every cutoff from 1 to K", as in the config file
    if let Some(topk) = &overrides.topk {
        raw.topk = one_or_many(topk.iter().copied().map(Value::from).collect());
    }
    if let Some(group_view) = &overrides.group_view {
        raw.group_view = Value::Array(group_view.iter().copied().map(Value::from).collect());
    }
    if let Some(workers) = overrides.workers {
        raw.workers = Value::from(workers);
    }

    Ok(raw)
}

fn one_or_many(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}
