//! User grouping by training activity.
//!
//! A [`GroupView`] of ascending thresholds `[t1, t2, ..., tn]` splits users
//! into `n + 1` half-open intervals on their training-interaction count:
//!
//! ```text
//! (0,t1]  (t1,t2]  ...  (tn-1,tn]  (tn,-]
//! ```
//!
//! A user with count `c` belongs to the first interval with `c <= ti`, or to
//! the last one when `c > tn`. Users missing from [`UserActivity`] have a
//! count of zero and land in the first interval.
//!
//! Partitioning never drops or duplicates rows: every merged row ends up in
//! exactly one [`Bucket`].

use crate::error::ConfigError;
use crate::join::MergedRow;
use crate::table::UserId;
use std::collections::HashMap;

/// Training-interaction counts per user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserActivity {
    counts: HashMap<UserId, u64>,
}

impl UserActivity {
    /// Counts one interaction per occurrence of each user in `users`.
    ///
    /// `users` is the user column of the training interactions.
    pub fn from_interactions(users: &[UserId]) -> Self {
        let mut counts: HashMap<UserId, u64> = HashMap::new();
        for &user in users {
            *counts.entry(user).or_default() += 1;
        }
        Self { counts }
    }

    /// Training-interaction count for `user` (0 if unknown).
    pub fn count(&self, user: UserId) -> u64 {
        self.counts.get(&user).copied().unwrap_or(0)
    }

    /// Number of users with a recorded count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(UserId, u64)> for UserActivity {
    fn from_iter<I: IntoIterator<Item = (UserId, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Ascending activity thresholds that define the user groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    thresholds: Vec<u64>,
}

impl GroupView {
    /// Creates a group view, sorting and deduplicating the thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Value`] if the list is empty or contains zero.
    pub fn new(mut thresholds: Vec<u64>) -> Result<Self, ConfigError> {
        if thresholds.is_empty() {
            return Err(ConfigError::value_error(
                "group_view",
                "at least one threshold is required",
            ));
        }
        if thresholds.contains(&0) {
            return Err(ConfigError::value_error(
                "group_view",
                "0 is not a positive integer",
            ));
        }
        thresholds.sort_unstable();
        thresholds.dedup();
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Number of buckets (thresholds + 1).
    pub fn num_buckets(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Interval labels in ascending order, e.g. `["(0,10]", "(10,-]"]`.
    pub fn bucket_names(&self) -> Vec<String> {
        let lower = std::iter::once(0).chain(self.thresholds.iter().copied());
        let upper = self
            .thresholds
            .iter()
            .map(|t| t.to_string())
            .chain(std::iter::once("-".to_string()));
        lower
            .zip(upper)
            .map(|(begin, end)| format!("({},{}]", begin, end))
            .collect()
    }

    /// Index of the bucket an interaction count falls into.
    pub fn bucket_index(&self, count: u64) -> usize {
        self.thresholds.partition_point(|&t| t < count)
    }
}

/// How merged rows are split into buckets.
#[derive(Debug, Clone, Copy)]
pub enum Grouping<'a> {
    /// One unnamed bucket holding every row
    All,
    /// One bucket per activity interval
    ByActivity {
        view: &'a GroupView,
        activity: &'a UserActivity,
    },
}

/// A named slice of merged rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Interval label, `None` for the ungrouped bucket
    pub name: Option<String>,
    pub rows: Vec<MergedRow>,
}

impl Bucket {
    /// Number of distinct users in the bucket.
    pub fn num_users(&self) -> usize {
        let mut users: Vec<UserId> = self.rows.iter().map(|row| row.user).collect();
        users.sort_unstable();
        users.dedup();
        users.len()
    }
}

/// Splits merged rows into buckets.
///
/// Buckets come back in ascending interval order; rows keep their relative
/// order inside each bucket. Intervals that receive no rows are omitted.
/// [`Grouping::All`] always yields exactly one bucket, even for no rows.
pub fn partition(rows: Vec<MergedRow>, grouping: Grouping<'_>) -> Vec<Bucket> {
    match grouping {
        Grouping::All => vec![Bucket { name: None, rows }],
        Grouping::ByActivity { view, activity } => {
            let mut slots: Vec<Vec<MergedRow>> = vec![Vec::new(); view.num_buckets()];
            for row in rows {
                let idx = view.bucket_index(activity.count(row.user));
                slots[idx].push(row);
            }
            view.bucket_names()
                .into_iter()
                .zip(slots)
                .filter(|(_, rows)| !rows.is_empty())
                .map(|(name, rows)| Bucket {
                    name: Some(name),
                    rows,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: UserId, item: u64) -> MergedRow {
        MergedRow {
            user,
            item,
            rank: None,
        }
    }

    #[test]
    fn test_bucket_names() {
        let view = GroupView::new(vec![10, 30, 50, 100]).unwrap();
        assert_eq!(
            view.bucket_names(),
            vec!["(0,10]", "(10,30]", "(30,50]", "(50,100]", "(100,-]"]
        );
    }

    #[test]
    fn test_bucket_index_boundaries() {
        let view = GroupView::new(vec![1, 5]).unwrap();
        assert_eq!(view.bucket_index(0), 0);
        assert_eq!(view.bucket_index(1), 0);
        assert_eq!(view.bucket_index(2), 1);
        assert_eq!(view.bucket_index(5), 1);
        assert_eq!(view.bucket_index(6), 2);
        assert_eq!(view.bucket_index(u64::MAX), 2);
    }

    #[test]
    fn test_group_view_normalizes() {
        let view = GroupView::new(vec![30, 10, 30]).unwrap();
        assert_eq!(view.thresholds(), &[10, 30]);
        assert!(GroupView::new(vec![]).is_err());
        assert!(GroupView::new(vec![0, 3]).is_err());
    }

    #[test]
    fn test_user_activity_from_interactions() {
        let activity = UserActivity::from_interactions(&[1, 2, 1, 1, 3]);
        assert_eq!(activity.count(1), 3);
        assert_eq!(activity.count(2), 1);
        assert_eq!(activity.count(99), 0);
        assert_eq!(activity.len(), 3);
    }

    #[test]
    fn test_partition_all() {
        let rows = vec![row(1, 10), row(2, 20)];
        let buckets = partition(rows.clone(), Grouping::All);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, None);
        assert_eq!(buckets[0].rows, rows);
    }

    #[test]
    fn test_partition_by_activity() {
        let view = GroupView::new(vec![1, 5]).unwrap();
        let activity: UserActivity = vec![(1, 1), (2, 4), (3, 9)].into_iter().collect();
        let rows = vec![row(3, 30), row(1, 10), row(2, 20), row(1, 11), row(4, 40)];

        let buckets = partition(
            rows,
            Grouping::ByActivity {
                view: &view,
                activity: &activity,
            },
        );

        let names: Vec<_> = buckets.iter().map(|b| b.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["(0,1]", "(1,5]", "(5,-]"]);
        // User 4 is unknown -> count 0 -> first bucket, after user 1's rows
        assert_eq!(
            buckets[0].rows,
            vec![row(1, 10), row(1, 11), row(4, 40)]
        );
        assert_eq!(buckets[0].num_users(), 2);
        assert_eq!(buckets[1].rows, vec![row(2, 20)]);
        assert_eq!(buckets[2].rows, vec![row(3, 30)]);
    }

    #[test]
    fn test_empty_intervals_omitted() {
        let view = GroupView::new(vec![10, 20]).unwrap();
        let activity: UserActivity = vec![(1, 50)].into_iter().collect();

        let buckets = partition(
            vec![row(1, 10)],
            Grouping::ByActivity {
                view: &view,
                activity: &activity,
            },
        );

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name.as_deref(), Some("(20,-]"));
    }
}
