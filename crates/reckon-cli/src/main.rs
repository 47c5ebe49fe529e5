//! Reckon CLI - top-K ranking evaluation for recommender predictions.
//!
//! # Usage
//!
//! ```bash
//! # Hit and Recall at cutoffs 1..=10
//! reckon --predictions scores.tsv --truth test.tsv -m hit,recall -k 10
//!
//! # Explicit cutoffs, grouped by training activity
//! reckon --predictions scores.tsv --truth test.tsv --train train.tsv \
//!     -m hit,mrr -k 5,10,20 -g 10,30,50,100
//!
//! # Configuration from a JSON file, JSON output
//! reckon --predictions scores.tsv --truth test.tsv --config eval.json --json
//! ```

mod config;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use reckon_core::dataset::{load_ground_truth, load_predictions, load_user_activity};
use reckon_core::Evaluator;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Evaluate ranked recommendations against held-out interactions.
///
/// Files are tab-separated: predictions are `user item score`, ground truth
/// and training interactions are `user item`.
#[derive(Parser)]
#[command(name = "reckon", version, about)]
struct Cli {
    /// Model predictions (user, item, score)
    #[arg(long)]
    predictions: PathBuf,

    /// Held-out ground truth (user, item)
    #[arg(long)]
    truth: PathBuf,

    /// Training interactions, used to count per-user activity for --group-view
    #[arg(long)]
    train: Option<PathBuf>,

    /// JSON configuration file (group_view, metric, topk, workers)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Metrics to compute (comma-separated: hit, recall, mrr)
    #[arg(short, long, value_delimiter = ',')]
    metric: Option<Vec<String>>,

    /// Cutoffs (comma-separated); a single value K means 1..=K
    #[arg(short = 'k', long, value_delimiter = ',')]
    topk: Option<Vec<u64>>,

    /// Activity thresholds for user groups (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    group_view: Option<Vec<u64>>,

    /// Worker threads for scoring groups
    #[arg(short, long)]
    workers: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = config::Overrides {
        metric: cli.metric.clone(),
        topk: cli.topk.clone(),
        group_view: cli.group_view.clone(),
        workers: cli.workers,
    };
    let raw = config::resolve(cli.config.as_deref(), &overrides)?;
    let mut evaluator = Evaluator::from_raw(raw).context("Invalid evaluation configuration")?;
    info!("{}", evaluator);

    if evaluator.is_grouped() {
        let train = cli
            .train
            .as_ref()
            .ok_or_else(|| anyhow!("Grouped evaluation (group_view) requires --train"))?;
        let activity = load_user_activity(train).with_context(|| {
            format!("Failed to load training interactions: {}", train.display())
        })?;
        evaluator = evaluator.with_user_activity(activity);
    }

    let predictions = load_predictions(&cli.predictions).with_context(|| {
        format!("Failed to load predictions: {}", cli.predictions.display())
    })?;
    let truth = load_ground_truth(&cli.truth)
        .with_context(|| format!("Failed to load ground truth: {}", cli.truth.display()))?;

    let report = evaluator
        .evaluate(&predictions, &truth)
        .context("Evaluation failed")?;

    let output = if cli.json {
        output::format_json(&evaluator, &report)
    } else {
        output::format_human(&report)
    };
    println!("{}", output);

    Ok(())
}
