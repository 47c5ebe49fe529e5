//! Metric registry and top-K scorers.
//!
//! Each registered metric maps a canonical lowercase name to a display name
//! and a scorer `fn(&[MergedRow], k) -> f64`. Scorers see only merged rows:
//! a row whose rank is at most `k` is a hit, an unranked row or one ranked
//! below `k` is a miss.
//!
//! | Name     | Display  | Per-user value                                |
//! |----------|----------|-----------------------------------------------|
//! | `hit`    | `Hit`    | 1 if any true item is in the top k, else 0    |
//! | `recall` | `Recall` | true items in the top k / true items          |
//! | `mrr`    | `MRR`    | 1 / rank of the best-ranked true item in top k |
//!
//! Every metric is the mean of the per-user value over the distinct users
//! present in the rows. An empty row set scores 0.0.

use crate::error::ConfigError;
use crate::join::MergedRow;
use crate::table::UserId;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Scorer signature shared by all registered metrics.
pub type Scorer = fn(&[MergedRow], usize) -> f64;

/// A registered ranking metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Hit,
    Recall,
    Mrr,
}

impl Metric {
    /// All registered metrics, in registry order.
    pub const ALL: [Metric; 3] = [Metric::Hit, Metric::Recall, Metric::Mrr];

    /// Canonical lowercase name used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Hit => "hit",
            Metric::Recall => "recall",
            Metric::Mrr => "mrr",
        }
    }

    /// Name used in reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Hit => "Hit",
            Metric::Recall => "Recall",
            Metric::Mrr => "MRR",
        }
    }

    pub fn scorer(self) -> Scorer {
        match self {
            Metric::Hit => hit,
            Metric::Recall => recall,
            Metric::Mrr => mrr,
        }
    }

    /// Looks up a metric by name, ignoring case.
    pub fn lookup(name: &str) -> Option<Metric> {
        let name = name.trim();
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(name))
    }

    /// Scores `rows` at cutoff `k`.
    pub fn score(self, rows: &[MergedRow], k: usize) -> f64 {
        (self.scorer())(rows, k)
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::lookup(s).ok_or_else(|| ConfigError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ============================================================================
// Per-user tallies
// ============================================================================

/// What one user's true items look like at a given cutoff.
#[derive(Debug, Clone, Copy, Default)]
struct UserTally {
    /// Number of true items for the user
    relevant: usize,
    /// Number of true items ranked within the cutoff
    hits: usize,
    /// Best rank among hits
    best_rank: Option<usize>,
}

/// Tallies hits per user. BTreeMap keeps the summation order fixed so repeated
/// runs produce bit-identical means.
fn tally(rows: &[MergedRow], k: usize) -> BTreeMap<UserId, UserTally> {
    let mut tallies: BTreeMap<UserId, UserTally> = BTreeMap::new();
    for row in rows {
        let entry = tallies.entry(row.user).or_default();
        entry.relevant += 1;
        if row.is_hit(k) {
            entry.hits += 1;
            entry.best_rank = match (entry.best_rank, row.rank) {
                (Some(best), Some(rank)) => Some(best.min(rank)),
                (None, rank) => rank,
                (best, None) => best,
            };
        }
    }
    tallies
}

fn mean_over_users(rows: &[MergedRow], k: usize, per_user: impl Fn(&UserTally) -> f64) -> f64 {
    let tallies = tally(rows, k);
    if tallies.is_empty() {
        return 0.0;
    }
    tallies.values().map(per_user).sum::<f64>() / tallies.len() as f64
}

// ============================================================================
// Scorers
// ============================================================================

/// Hit@k: fraction of users with at least one true item in their top k.
pub fn hit(rows: &[MergedRow], k: usize) -> f64 {
    mean_over_users(rows, k, |user| if user.hits > 0 { 1.0 } else { 0.0 })
}

/// Recall@k: mean over users of the fraction of their true items in the top k.
pub fn recall(rows: &[MergedRow], k: usize) -> f64 {
    mean_over_users(rows, k, |user| user.hits as f64 / user.relevant as f64)
}

/// MRR@k: mean over users of the reciprocal rank of their first hit.
pub fn mrr(rows: &[MergedRow], k: usize) -> f64 {
    mean_over_users(rows, k, |user| {
        user.best_rank.map_or(0.0, |rank| 1.0 / rank as f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: UserId, item: u64, rank: Option<usize>) -> MergedRow {
        MergedRow { user, item, rank }
    }

    fn fixture() -> Vec<MergedRow> {
        vec![
            // User 1: two true items, ranks 1 and 4
            row(1, 10, Some(1)),
            row(1, 11, Some(4)),
            // User 2: one true item at rank 3
            row(2, 20, Some(3)),
            // User 3: one true item never predicted
            row(3, 30, None),
        ]
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Metric::lookup("HIT"), Some(Metric::Hit));
        assert_eq!(Metric::lookup("Recall"), Some(Metric::Recall));
        assert_eq!(Metric::lookup("mRr"), Some(Metric::Mrr));
        assert_eq!(Metric::lookup("ndcg"), None);
    }

    #[test]
    fn test_from_str_unknown_metric() {
        let err = "bogus".parse::<Metric>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownMetric("bogus".to_string()));
    }

    #[test]
    fn test_display_names() {
        let names: Vec<_> = Metric::ALL.iter().map(|m| m.display_name()).collect();
        assert_eq!(names, vec!["Hit", "Recall", "MRR"]);
        assert_eq!(Metric::Mrr.to_string(), "MRR");
    }

    #[test]
    fn test_hit() {
        let rows = fixture();
        // k=1: only user 1 hits
        assert!((hit(&rows, 1) - 1.0 / 3.0).abs() < 1e-12);
        // k=3: users 1 and 2 hit
        assert!((hit(&rows, 3) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_recall() {
        let rows = fixture();
        // k=1: user 1 finds 1 of 2, others 0 -> (0.5 + 0 + 0) / 3
        assert!((recall(&rows, 1) - 0.5 / 3.0).abs() < 1e-12);
        // k=4: user 1 finds 2 of 2, user 2 finds 1 of 1 -> 2 / 3
        assert!((recall(&rows, 4) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mrr() {
        let rows = fixture();
        // k=3: user 1 -> 1/1, user 2 -> 1/3, user 3 -> 0
        let expected = (1.0 + 1.0 / 3.0) / 3.0;
        assert!((mrr(&rows, 3) - expected).abs() < 1e-12);
        // k=2: user 2's item at rank 3 no longer counts
        assert!((mrr(&rows, 2) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mrr_uses_best_rank_regardless_of_row_order() {
        let rows = vec![row(1, 11, Some(4)), row(1, 10, Some(2))];
        assert!((mrr(&rows, 5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rows_score_zero() {
        for metric in Metric::ALL {
            assert_eq!(metric.score(&[], 10), 0.0);
        }
    }

    #[test]
    fn test_serialize_as_canonical_name() {
        let json = serde_json::to_string(&Metric::Mrr).unwrap();
        assert_eq!(json, "\"mrr\"");
    }
}
