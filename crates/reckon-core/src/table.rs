//! Prediction and ground-truth tables, and per-user ranking.
//!
//! Inputs arrive as parallel columns (users, items, scores) the way a model's
//! scoring loop emits them. [`RankTable::build`] attaches a 1-based rank to
//! every prediction: the item's position within its user's predictions sorted
//! by score, highest first.
//!
//! # Ordering
//!
//! - Sorting is stable, so equal scores keep their input order (the first
//!   one seen gets the better rank).
//! - NaN scores sort after every real score, including `-inf`.
//! - `-0.0` and `0.0` compare equal.

use crate::error::EvalError;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// User identifier as emitted by the data pipeline.
pub type UserId = u64;

/// Item identifier as emitted by the data pipeline.
pub type ItemId = u64;

/// Model output: one scored candidate item per row.
///
/// The three columns always have equal length; [`Predictions::new`] rejects
/// anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    users: Vec<UserId>,
    items: Vec<ItemId>,
    scores: Vec<f64>,
}

impl Predictions {
    /// Creates a prediction table from parallel columns.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ShapeMismatch`] if the columns differ in length.
    pub fn new(
        users: Vec<UserId>,
        items: Vec<ItemId>,
        scores: Vec<f64>,
    ) -> Result<Self, EvalError> {
        check_columns("predictions", &[users.len(), items.len(), scores.len()])?;
        Ok(Self {
            users,
            items,
            scores,
        })
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<(UserId, ItemId, f64)> for Predictions {
    fn from_iter<I: IntoIterator<Item = (UserId, ItemId, f64)>>(iter: I) -> Self {
        let mut table = Predictions::default();
        for (user, item, score) in iter {
            table.users.push(user);
            table.items.push(item);
            table.scores.push(score);
        }
        table
    }
}

/// Held-out interactions: one true (user, item) pair per row.
///
/// A user may appear once (leave-one-out) or many times (fold-out).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth {
    users: Vec<UserId>,
    items: Vec<ItemId>,
}

impl GroundTruth {
    /// Creates a ground-truth table from parallel columns.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ShapeMismatch`] if the columns differ in length.
    pub fn new(users: Vec<UserId>, items: Vec<ItemId>) -> Result<Self, EvalError> {
        check_columns("ground truth", &[users.len(), items.len()])?;
        Ok(Self { users, items })
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over (user, item) pairs in input order.
    pub fn pairs(&self) -> impl Iterator<Item = (UserId, ItemId)> + '_ {
        self.users.iter().copied().zip(self.items.iter().copied())
    }
}

impl FromIterator<(UserId, ItemId)> for GroundTruth {
    fn from_iter<I: IntoIterator<Item = (UserId, ItemId)>>(iter: I) -> Self {
        let (users, items) = iter.into_iter().unzip();
        Self { users, items }
    }
}

/// A prediction with its position in the user's ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub user: UserId,
    pub item: ItemId,
    pub score: f64,
    /// 1-based position among the user's predictions, best first
    pub rank: usize,
}

/// Predictions augmented with a per-user rank column.
///
/// Rows stay in input order; only the `rank` column is derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    rows: Vec<RankedPrediction>,
}

impl RankTable {
    /// Ranks each user's predictions by descending score.
    ///
    /// # Algorithm
    ///
    /// 1. Collect row indices per user (indices stay ascending)
    /// 2. Stable-sort each user's indices with [`compare_scores_desc`]
    /// 3. Write position + 1 back as the row's rank
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ShapeMismatch`] if the columns differ in length.
    pub fn build(users: &[UserId], items: &[ItemId], scores: &[f64]) -> Result<Self, EvalError> {
        check_columns("predictions", &[users.len(), items.len(), scores.len()])?;

        let mut by_user: HashMap<UserId, Vec<usize>> = HashMap::new();
        for (idx, &user) in users.iter().enumerate() {
            by_user.entry(user).or_default().push(idx);
        }

        let mut ranks = vec![0usize; users.len()];
        for indices in by_user.values_mut() {
            // slice::sort_by is stable
            indices.sort_by(|&a, &b| compare_scores_desc(scores[a], scores[b]));
            for (position, &idx) in indices.iter().enumerate() {
                ranks[idx] = position + 1;
            }
        }

        let rows = users
            .iter()
            .zip(items)
            .zip(scores)
            .zip(ranks)
            .map(|(((&user, &item), &score), rank)| RankedPrediction {
                user,
                item,
                score,
                rank,
            })
            .collect();

        Ok(Self { rows })
    }

    /// Ranks a [`Predictions`] table.
    pub fn from_predictions(predictions: &Predictions) -> Result<Self, EvalError> {
        Self::build(predictions.users(), predictions.items(), predictions.scores())
    }

    pub fn rows(&self) -> &[RankedPrediction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Orders scores highest first, with NaN after every real value.
///
/// Two NaNs compare equal so a stable sort keeps their input order.
pub fn compare_scores_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn check_columns(what: &'static str, lengths: &[usize]) -> Result<(), EvalError> {
    let first = lengths.first().copied().unwrap_or(0);
    if lengths.iter().all(|&len| len == first) {
        Ok(())
    } else {
        Err(EvalError::ShapeMismatch {
            what,
            details: format!("column lengths {:?} differ", lengths),
        })
    }
}
