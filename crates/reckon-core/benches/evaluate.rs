//! Evaluation throughput benchmarks.
//!
//! Run with: `cargo bench -p reckon-core --bench evaluate`
//!
//! Measures the full pipeline (rank, join, group, score) on synthetic
//! predictions, ungrouped and grouped, with one and several workers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reckon_core::{Evaluator, GroundTruth, Predictions, UserActivity};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Configuration
// =============================================================================

/// Number of users to evaluate.
const USER_COUNTS: &[u64] = &[1_000, 10_000];

/// Candidate items scored per user.
const CANDIDATES_PER_USER: u64 = 100;

/// True held-out items per user.
const TRUTH_PER_USER: u64 = 3;

// =============================================================================
// Data Generation
// =============================================================================

/// Deterministic pseudo-random value in [0, 1).
fn seeded_unit(a: u64, b: u64) -> f64 {
    let mut hasher = DefaultHasher::new();
    a.hash(&mut hasher);
    b.hash(&mut hasher);
    (hasher.finish() >> 11) as f64 / (1u64 << 53) as f64
}

fn generate(num_users: u64) -> (Predictions, GroundTruth, UserActivity) {
    let predictions: Predictions = (0..num_users)
        .flat_map(|user| {
            (0..CANDIDATES_PER_USER).map(move |item| (user, item, seeded_unit(user, item)))
        })
        .collect();

    // Some truth items fall outside the candidate list
    let truth: GroundTruth = (0..num_users)
        .flat_map(|user| {
            (0..TRUTH_PER_USER).map(move |n| {
                let item = (seeded_unit(user, 1_000 + n) * (CANDIDATES_PER_USER * 2) as f64) as u64;
                (user, item)
            })
        })
        .collect();

    let activity: UserActivity = (0..num_users)
        .map(|user| (user, (seeded_unit(user, 7) * 200.0) as u64))
        .collect();

    (predictions, truth, activity)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(20);

    for &num_users in USER_COUNTS {
        let (predictions, truth, activity) = generate(num_users);
        group.throughput(Throughput::Elements(predictions.len() as u64));

        let ungrouped = Evaluator::from_json_str(
            r#"{"metric": ["hit", "recall", "mrr"], "topk": [5, 10, 20]}"#,
        )
        .unwrap();
        group.bench_with_input(
            BenchmarkId::new("ungrouped", num_users),
            &num_users,
            |b, _| b.iter(|| ungrouped.evaluate(black_box(&predictions), black_box(&truth))),
        );

        for workers in [1, 4] {
            let grouped = Evaluator::from_json_str(&format!(
                r#"{{"group_view": [10, 30, 50, 100], "metric": ["hit", "recall", "mrr"], "topk": [5, 10, 20], "workers": {}}}"#,
                workers
            ))
            .unwrap()
            .with_user_activity(activity.clone());

            group.bench_with_input(
                BenchmarkId::new(format!("grouped_w{}", workers), num_users),
                &num_users,
                |b, _| b.iter(|| grouped.evaluate(black_box(&predictions), black_box(&truth))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
