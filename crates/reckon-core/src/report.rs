//! Evaluation reports.
//!
//! The text rendering matches what researchers paste into experiment logs:
//!
//! ```text
//! Hit@5 : 0.484848	Recall@5 : 0.162734
//! ```
//!
//! and, when grouped, one line per activity bucket:
//!
//! ```text
//! (0,10]	Hit@5 : 0.647059	Recall@5 : 0.201914
//! (10,-]	Hit@5 : 0.515152	Recall@5 : 0.160762
//! ```

use crate::config::GROUP_LABEL_WIDTH;
use crate::metrics::Metric;
use serde::Serialize;
use std::fmt;

/// One metric value at one cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricScore {
    pub metric: Metric,
    pub k: usize,
    pub score: f64,
}

impl fmt::Display for MetricScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} : {:.6}", self.metric.display_name(), self.k, self.score)
    }
}

/// Scores for one bucket of users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketReport {
    /// Interval label; absent for ungrouped evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Distinct users in the bucket
    pub num_users: usize,
    /// Ground-truth rows in the bucket
    pub num_rows: usize,
    /// Scores ordered by cutoff, then by configured metric order
    pub scores: Vec<MetricScore>,
}

impl fmt::Display for BucketReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = &self.group {
            write!(f, "{:<width$}\t", group, width = GROUP_LABEL_WIDTH)?;
        }
        for (idx, score) in self.scores.iter().enumerate() {
            if idx > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}", score)?;
        }
        Ok(())
    }
}

/// Result of one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub buckets: Vec<BucketReport>,
}

impl EvalReport {
    pub fn new(buckets: Vec<BucketReport>) -> Self {
        Self { buckets }
    }

    /// True if buckets carry activity-group labels.
    pub fn is_grouped(&self) -> bool {
        self.buckets.iter().any(|bucket| bucket.group.is_some())
    }

    /// Looks up one score. Use `group = None` for ungrouped reports.
    pub fn score(&self, group: Option<&str>, metric: Metric, k: usize) -> Option<f64> {
        self.buckets
            .iter()
            .find(|bucket| bucket.group.as_deref() == group)?
            .scores
            .iter()
            .find(|s| s.metric == metric && s.k == k)
            .map(|s| s.score)
    }

    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, bucket) in self.buckets.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", bucket)?;
        }
        Ok(())
    }
}
