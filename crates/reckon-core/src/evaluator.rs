//! Evaluator facade.
//!
//! Runs the full pipeline for one call:
//!
//! ```text
//! predictions ─► RankTable::build ─► merge(truth) ─► partition ─► score_buckets ─► EvalReport
//! ```
//!
//! The evaluator is configured once and reused; every `evaluate` call
//! recomputes its tables from scratch and shares nothing with other calls.

use crate::aggregate::score_buckets;
use crate::config::{EvalConfig, RawEvalConfig};
use crate::error::{ConfigError, EvalError};
use crate::group::{partition, Grouping, UserActivity};
use crate::join::merge;
use crate::report::EvalReport;
use crate::table::{GroundTruth, Predictions, RankTable};
use std::fmt;
use tracing::{debug, info, instrument, trace};

/// Evaluates ranked predictions against held-out interactions.
///
/// Grouped evaluation (a `group_view` in the config) needs per-user training
/// activity, attached with [`Evaluator::with_user_activity`].
///
/// # Example
///
/// ```
/// use reckon_core::{Evaluator, GroundTruth, Predictions};
///
/// let evaluator = Evaluator::from_json_str(r#"{"metric": "hit", "topk": [1]}"#).unwrap();
///
/// let predictions = Predictions::new(vec![1, 1, 2], vec![10, 11, 20], vec![0.9, 0.5, 0.3]).unwrap();
/// let truth = GroundTruth::new(vec![1, 2], vec![10, 20]).unwrap();
///
/// let report = evaluator.evaluate(&predictions, &truth).unwrap();
/// assert_eq!(report.to_string(), "Hit@1 : 1.000000");
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvalConfig,
    activity: Option<UserActivity>,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            activity: None,
        }
    }

    /// Validates a raw configuration and builds an evaluator from it.
    pub fn from_raw(raw: RawEvalConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(EvalConfig::from_raw(raw)?))
    }

    /// Parses, validates, and builds an evaluator from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(EvalConfig::from_json_str(json)?))
    }

    /// Attaches training-interaction counts used to assign activity groups.
    pub fn with_user_activity(mut self, activity: UserActivity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn is_grouped(&self) -> bool {
        self.config.is_grouped()
    }

    /// Scores `predictions` against `truth`.
    ///
    /// # Errors
    ///
    /// - [`EvalError::ShapeMismatch`] if input columns differ in length
    /// - [`EvalError::DuplicatePrediction`] if a (user, item) pair is predicted twice
    /// - [`EvalError::MissingUserActivity`] if grouped without activity counts
    #[instrument(skip_all, fields(predictions = predictions.len(), truth = truth.len()))]
    pub fn evaluate(
        &self,
        predictions: &Predictions,
        truth: &GroundTruth,
    ) -> Result<EvalReport, EvalError> {
        info!("Evaluate start: {}", self);

        let grouping = match (self.config.group_view(), &self.activity) {
            (None, _) => Grouping::All,
            (Some(view), Some(activity)) => Grouping::ByActivity { view, activity },
            (Some(_), None) => return Err(EvalError::MissingUserActivity),
        };

        let table = RankTable::from_predictions(predictions)?;
        debug!(rows = table.len(), "Ranked predictions");

        let merged = merge(&table, truth)?;
        let mut unranked = 0usize;
        for row in &merged {
            if row.rank.is_none() {
                unranked += 1;
            }
            trace!(
                user = row.user,
                item = row.item,
                rank = row.rank_or_sentinel(),
                "Merged row"
            );
        }
        debug!(rows = merged.len(), unranked, "Joined ground truth");

        let buckets = partition(merged, grouping);
        debug!(buckets = buckets.len(), "Partitioned users");

        let reports = score_buckets(
            &buckets,
            self.config.topk(),
            self.config.metrics(),
            self.config.workers(),
        )?;

        info!(buckets = reports.len(), "Evaluate done");
        Ok(EvalReport::new(reports))
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics: Vec<&str> = self.config.metrics().iter().map(|m| m.name()).collect();
        let topk: Vec<String> = self.config.topk().iter().map(|k| k.to_string()).collect();
        write!(
            f,
            "The evaluator will evaluate test_data on {} at {}",
            metrics.join(", "),
            topk.join(", ")
        )
    }
}
