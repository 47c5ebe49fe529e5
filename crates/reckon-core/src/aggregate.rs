//! Scoring of buckets across cutoffs and metrics.
//!
//! Each (bucket, k, metric) score is independent of the others. With more
//! than one worker, buckets are scored on a dedicated rayon pool; results are
//! collected in bucket order so the report does not depend on scheduling.

use crate::error::EvalError;
use crate::group::Bucket;
use crate::join::MergedRow;
use crate::metrics::Metric;
use crate::report::{BucketReport, MetricScore};
use rayon::prelude::*;
use tracing::debug;

/// Scores one set of rows at every cutoff, for every metric.
///
/// Output order is cutoffs ascending (as given), then metrics in the order
/// given.
pub fn score_rows(rows: &[MergedRow], topk: &[usize], metrics: &[Metric]) -> Vec<MetricScore> {
    topk.iter()
        .flat_map(|&k| {
            metrics.iter().map(move |&metric| MetricScore {
                metric,
                k,
                score: metric.score(rows, k),
            })
        })
        .collect()
}

/// Scores a single bucket into its report.
pub fn score_bucket(bucket: &Bucket, topk: &[usize], metrics: &[Metric]) -> BucketReport {
    BucketReport {
        group: bucket.name.clone(),
        num_users: bucket.num_users(),
        num_rows: bucket.rows.len(),
        scores: score_rows(&bucket.rows, topk, metrics),
    }
}

/// Scores every bucket, using up to `workers` threads.
///
/// # Errors
///
/// Returns [`EvalError::WorkerPool`] if a thread pool was needed and could
/// not be created.
pub fn score_buckets(
    buckets: &[Bucket],
    topk: &[usize],
    metrics: &[Metric],
    workers: usize,
) -> Result<Vec<BucketReport>, EvalError> {
    if workers <= 1 || buckets.len() <= 1 {
        return Ok(buckets
            .iter()
            .map(|bucket| score_bucket(bucket, topk, metrics))
            .collect());
    }

    let threads = workers.min(buckets.len());
    debug!(threads, buckets = buckets.len(), "Scoring buckets in parallel");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("reckon-score-{}", idx))
        .build()
        .map_err(|e| EvalError::WorkerPool(e.to_string()))?;

    Ok(pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| score_bucket(bucket, topk, metrics))
            .collect()
    }))
}
