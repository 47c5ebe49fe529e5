//! # Reckon Core
//!
//! Top-K ranking evaluation for recommender predictions.
//!
//! Given per-user scored predictions and held-out true interactions, this
//! crate ranks each user's candidates, joins the ranks onto the ground truth,
//! optionally splits users into activity groups, and scores Hit, Recall, and
//! MRR at every configured cutoff.
//!
//! ## Modules
//!
//! - [`table`] - Prediction/ground-truth columns and per-user ranking
//! - [`join`] - Left join of ground truth onto ranks
//! - [`group`] - User activity groups and bucket partitioning
//! - [`metrics`] - Metric registry and scorers
//! - [`aggregate`] - Scoring buckets across cutoffs and metrics
//! - [`report`] - Report types and text rendering
//! - [`evaluator`] - The evaluation facade
//! - [`config`] - Configuration constants and validation
//! - [`dataset`] - Loading tab-separated interaction files
//! - [`error`] - Error types

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod group;
pub mod join;
pub mod metrics;
pub mod report;
pub mod table;

pub use config::{EvalConfig, RawEvalConfig, NOT_RANKED};
pub use error::{ConfigError, DatasetError, EvalError};
pub use evaluator::Evaluator;
pub use group::{GroupView, UserActivity};
pub use join::MergedRow;
pub use metrics::Metric;
pub use report::{BucketReport, EvalReport, MetricScore};
pub use table::{GroundTruth, ItemId, Predictions, RankTable, UserId};
