//! Evaluator configuration: constants, raw input, and validation.
//!
//! Configuration arrives as a loosely typed mapping (a JSON document or CLI
//! flags) with four keys:
//!
//! | Key          | Accepted shapes                  | Normalized to                  |
//! |--------------|----------------------------------|--------------------------------|
//! | `group_view` | null, positive int, list of ints | `Option<GroupView>` (ascending) |
//! | `metric`     | string, list of strings          | `Vec<Metric>` (registry order as given) |
//! | `topk`       | positive int K, list of ints     | `Vec<usize>` ascending (K → 1..=K) |
//! | `workers`    | null, positive int               | `usize` (default 1)            |
//!
//! Validation happens once, in [`EvalConfig::from_raw`]. A misconfigured
//! evaluator is never constructed.
//!
//! # Usage
//!
//! ```
//! use reckon_core::config::{EvalConfig, RawEvalConfig};
//!
//! let raw = RawEvalConfig::from_json_str(r#"{"metric": ["Hit", "recall"], "topk": 5}"#).unwrap();
//! let config = EvalConfig::from_raw(raw).unwrap();
//! assert_eq!(config.topk(), &[1, 2, 3, 4, 5]);
//! ```

use crate::error::ConfigError;
use crate::group::GroupView;
use crate::metrics::Metric;
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// Constants
// =============================================================================

/// Rank reported for a true item that was never predicted for its user.
pub const NOT_RANKED: i64 = -1;

/// Number of scoring workers when `workers` is not configured.
pub const DEFAULT_WORKERS: usize = 1;

/// Largest accepted top-K cutoff. An integer `topk` expands to every cutoff
/// up to K, so this also bounds the number of cutoffs per report.
pub const MAX_TOPK: usize = 10_000;

/// Minimum width of the bucket label column in grouped reports.
pub const GROUP_LABEL_WIDTH: usize = 5;

// =============================================================================
// Raw configuration
// =============================================================================

/// Configuration as supplied by the caller, before validation.
///
/// Fields are kept as untyped JSON values so that a wrong shape surfaces as
/// [`ConfigError::Type`] naming the field, not as a serde error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEvalConfig {
    #[serde(default)]
    pub group_view: Value,
    #[serde(default)]
    pub metric: Value,
    #[serde(default)]
    pub topk: Value,
    #[serde(default)]
    pub workers: Value,
}

impl RawEvalConfig {
    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated, normalized evaluator configuration.
///
/// Immutable once built; every list is in its canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    group_view: Option<GroupView>,
    metrics: Vec<Metric>,
    topk: Vec<usize>,
    workers: usize,
}

impl EvalConfig {
    /// Builds a configuration from already-typed values.
    ///
    /// Applies the same normalization as [`EvalConfig::from_raw`]: cutoffs are
    /// sorted and deduplicated, metrics deduplicated in first-seen order.
    pub fn new(
        metrics: Vec<Metric>,
        topk: Vec<usize>,
        group_view: Option<GroupView>,
        workers: usize,
    ) -> Result<Self, ConfigError> {
        if metrics.is_empty() {
            return Err(ConfigError::value_error("metric", "at least one metric is required"));
        }
        if topk.is_empty() {
            return Err(ConfigError::value_error("topk", "at least one cutoff is required"));
        }
        if let Some(&bad) = topk.iter().find(|&&k| k == 0) {
            return Err(ConfigError::value_error(
                "topk",
                format!("{} is not a positive integer", bad),
            ));
        }
        if let Some(&bad) = topk.iter().find(|&&k| k > MAX_TOPK) {
            return Err(ConfigError::value_error(
                "topk",
                format!("{} exceeds the maximum cutoff of {}", bad, MAX_TOPK),
            ));
        }
        if workers == 0 {
            return Err(ConfigError::value_error("workers", "0 is not a positive integer"));
        }

        let mut unique_metrics = Vec::with_capacity(metrics.len());
        for metric in metrics {
            if !unique_metrics.contains(&metric) {
                unique_metrics.push(metric);
            }
        }

        let mut topk = topk;
        topk.sort_unstable();
        topk.dedup();

        Ok(Self {
            group_view,
            metrics: unique_metrics,
            topk,
            workers,
        })
    }

    /// Validates and normalizes a raw configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Type`] if a field has the wrong shape
    /// - [`ConfigError::Value`] for non-positive integers or empty lists
    /// - [`ConfigError::UnknownMetric`] for names missing from the registry
    pub fn from_raw(raw: RawEvalConfig) -> Result<Self, ConfigError> {
        let group_view = parse_group_view(&raw.group_view)?;
        let metrics = parse_metrics(&raw.metric)?;
        let topk = parse_topk(&raw.topk)?;
        let workers = match &raw.workers {
            Value::Null => DEFAULT_WORKERS,
            value => to_usize("workers", positive_int("workers", value)?)?,
        };
        Self::new(metrics, topk, group_view, workers)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_raw(RawEvalConfig::from_json_str(json)?)
    }

    pub fn group_view(&self) -> Option<&GroupView> {
        self.group_view.as_ref()
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn topk(&self) -> &[usize] {
        &self.topk
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_grouped(&self) -> bool {
        self.group_view.is_some()
    }
}

// =============================================================================
// Field parsers
// =============================================================================

fn parse_group_view(value: &Value) -> Result<Option<GroupView>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(_) => Ok(Some(GroupView::new(vec![positive_int("group_view", value)?])?)),
        Value::Array(values) => {
            let thresholds = values
                .iter()
                .map(|v| positive_int("group_view", v))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(GroupView::new(thresholds)?))
        }
        other => Err(ConfigError::type_error(
            "group_view",
            format!("expected null, an integer or a list of integers, got {}", other),
        )),
    }
}

fn parse_metrics(value: &Value) -> Result<Vec<Metric>, ConfigError> {
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(values) => values
            .iter()
            .map(|v| {
                v.as_str().ok_or_else(|| {
                    ConfigError::type_error("metric", format!("{} is not a string", v))
                })
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(ConfigError::type_error(
                "metric",
                format!("expected a string or a list of strings, got {}", other),
            ))
        }
    };
    names.into_iter().map(str::parse).collect()
}

fn parse_topk(value: &Value) -> Result<Vec<usize>, ConfigError> {
    match value {
        Value::Number(_) => {
            let k = cutoff(value)?;
            Ok((1..=k).collect())
        }
        Value::Array(values) => values.iter().map(cutoff).collect(),
        other => Err(ConfigError::type_error(
            "topk",
            format!("expected an integer or a list of integers, got {}", other),
        )),
    }
}

/// Reads a strictly positive integer. Non-integers are type errors, zero and
/// negatives are value errors.
fn positive_int(field: &'static str, value: &Value) -> Result<u64, ConfigError> {
    let Value::Number(number) = value else {
        return Err(ConfigError::type_error(
            field,
            format!("{} is not an integer", value),
        ));
    };
    if let Some(n) = number.as_u64() {
        if n == 0 {
            return Err(ConfigError::value_error(field, "0 is not a positive integer"));
        }
        return Ok(n);
    }
    if let Some(n) = number.as_i64() {
        return Err(ConfigError::value_error(
            field,
            format!("{} is not a positive integer", n),
        ));
    }
    Err(ConfigError::type_error(
        field,
        format!("{} is not an integer", number),
    ))
}

/// Reads one top-K cutoff, bounded by [`MAX_TOPK`] before anything is expanded.
fn cutoff(value: &Value) -> Result<usize, ConfigError> {
    let k = positive_int("topk", value)?;
    if k > MAX_TOPK as u64 {
        return Err(ConfigError::value_error(
            "topk",
            format!("{} exceeds the maximum cutoff of {}", k, MAX_TOPK),
        ));
    }
    to_usize("topk", k)
}

fn to_usize(field: &'static str, value: u64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .map_err(|_| ConfigError::value_error(field, format!("{} is too large", value)))
}
