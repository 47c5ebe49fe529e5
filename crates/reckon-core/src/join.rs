//! Left join of ground truth against ranked predictions.
//!
//! Every true (user, item) pair produces exactly one [`MergedRow`]. When the
//! pair was never predicted, the row is unranked and counts as a miss at
//! every cutoff.

use crate::config::NOT_RANKED;
use crate::error::EvalError;
use crate::table::{GroundTruth, ItemId, RankTable, UserId};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One ground-truth interaction with the rank the model gave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MergedRow {
    pub user: UserId,
    pub item: ItemId,
    /// 1-based rank, or `None` if the item was never predicted for the user
    pub rank: Option<usize>,
}

impl MergedRow {
    /// Returns true if the item is ranked within the top `k`.
    #[inline]
    pub fn is_hit(&self, k: usize) -> bool {
        matches!(self.rank, Some(rank) if rank <= k)
    }

    /// Rank as a signed value with [`NOT_RANKED`] standing in for missing ranks.
    pub fn rank_or_sentinel(&self) -> i64 {
        self.rank
            .and_then(|rank| i64::try_from(rank).ok())
            .unwrap_or(NOT_RANKED)
    }
}

/// Joins ground truth against a rank table on (user, item).
///
/// The output has one row per ground-truth row, in ground-truth order.
/// Users that have no predictions at all simply get unranked rows.
///
/// # Errors
///
/// Returns [`EvalError::DuplicatePrediction`] if the rank table contains the
/// same (user, item) pair twice, since the join key would be ambiguous.
pub fn merge(table: &RankTable, truth: &GroundTruth) -> Result<Vec<MergedRow>, EvalError> {
    let mut lookup: HashMap<(UserId, ItemId), usize> = HashMap::with_capacity(table.len());
    for row in table.rows() {
        match lookup.entry((row.user, row.item)) {
            Entry::Occupied(_) => {
                return Err(EvalError::DuplicatePrediction {
                    user: row.user,
                    item: row.item,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(row.rank);
            }
        }
    }

    Ok(truth
        .pairs()
        .map(|(user, item)| MergedRow {
            user,
            item,
            rank: lookup.get(&(user, item)).copied(),
        })
        .collect())
}
