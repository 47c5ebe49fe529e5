//! Loading interaction files.
//!
//! All files are tab-separated, one row per line. Blank lines and lines
//! starting with `#` are skipped.
//!
//! | File            | Columns                          |
//! |-----------------|----------------------------------|
//! | predictions     | `user \t item \t score`          |
//! | ground truth    | `user \t item`                   |
//! | training        | `user \t item [\t ...]`          |
//!
//! Extra trailing columns are ignored, so rating or timestamp columns in a
//! training file do no harm.

use crate::error::DatasetError;
use crate::group::UserActivity;
use crate::table::{GroundTruth, ItemId, Predictions, UserId};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Loads model predictions (`user \t item \t score`).
pub fn load_predictions(path: &Path) -> Result<Predictions, DatasetError> {
    let mut users = Vec::new();
    let mut items = Vec::new();
    let mut scores = Vec::new();

    for_each_row(path, 3, |line_num, fields| {
        users.push(parse_field::<UserId>(line_num, "user", fields[0])?);
        items.push(parse_field::<ItemId>(line_num, "item", fields[1])?);
        scores.push(parse_field::<f64>(line_num, "score", fields[2])?);
        Ok(())
    })?;

    debug!(rows = users.len(), path = %path.display(), "Loaded predictions");
    Ok(Predictions::new(users, items, scores)?)
}

/// Loads held-out interactions (`user \t item`).
pub fn load_ground_truth(path: &Path) -> Result<GroundTruth, DatasetError> {
    let (users, items) = load_pairs(path)?;
    debug!(rows = users.len(), path = %path.display(), "Loaded ground truth");
    Ok(GroundTruth::new(users, items)?)
}

/// Counts training interactions per user from a `user \t item` file.
pub fn load_user_activity(path: &Path) -> Result<UserActivity, DatasetError> {
    let (users, _) = load_pairs(path)?;
    let activity = UserActivity::from_interactions(&users);
    debug!(
        interactions = users.len(),
        users = activity.len(),
        path = %path.display(),
        "Loaded training activity"
    );
    Ok(activity)
}

fn load_pairs(path: &Path) -> Result<(Vec<UserId>, Vec<ItemId>), DatasetError> {
    let mut users = Vec::new();
    let mut items = Vec::new();

    for_each_row(path, 2, |line_num, fields| {
        users.push(parse_field::<UserId>(line_num, "user", fields[0])?);
        items.push(parse_field::<ItemId>(line_num, "item", fields[1])?);
        Ok(())
    })?;

    Ok((users, items))
}

/// Calls `row` with the 1-based line number and fields of every data line.
fn for_each_row<F>(path: &Path, min_fields: usize, mut row: F) -> Result<(), DatasetError>
where
    F: FnMut(usize, &[&str]) -> Result<(), DatasetError>,
{
    if !path.exists() {
        return Err(DatasetError::MissingFile(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if fields.len() < min_fields {
            return Err(DatasetError::InvalidFormat(format!(
                "Line {}: expected {} tab-separated fields, got {}",
                idx + 1,
                min_fields,
                fields.len()
            )));
        }
        row(idx + 1, &fields)?;
    }

    Ok(())
}

fn parse_field<T: FromStr>(line_num: usize, name: &str, raw: &str) -> Result<T, DatasetError> {
    raw.parse().map_err(|_| {
        DatasetError::InvalidFormat(format!("Line {}: invalid {} value '{}'", line_num, name, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_load_predictions() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "predictions.tsv",
            &["# user\titem\tscore", "1\t10\t0.9", "", "1\t11\t0.5", "2\t20\tNaN"],
        );

        let predictions = load_predictions(&path).unwrap();
        assert_eq!(predictions.users(), &[1, 1, 2]);
        assert_eq!(predictions.items(), &[10, 11, 20]);
        assert_eq!(predictions.scores()[0], 0.9);
        assert!(predictions.scores()[2].is_nan());
    }

    #[test]
    fn test_load_ground_truth() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "test.tsv", &["1\t10", "2\t20"]);

        let truth = load_ground_truth(&path).unwrap();
        assert_eq!(truth.pairs().collect::<Vec<_>>(), vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn test_load_user_activity_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "train.tsv",
            &["1\t10\t5\t1592000000", "1\t11\t3\t1592000001", "2\t10\t4\t1592000002"],
        );

        let activity = load_user_activity(&path).unwrap();
        assert_eq!(activity.count(1), 2);
        assert_eq!(activity.count(2), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_ground_truth(&dir.path().join("absent.tsv"));
        assert!(matches!(result, Err(DatasetError::MissingFile(_))));
    }

    #[test]
    fn test_too_few_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "predictions.tsv", &["1\t10\t0.9", "2\t20"]);

        let err = load_predictions(&path).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFormat(ref msg) if msg.starts_with("Line 2:")));
    }

    #[test]
    fn test_invalid_id() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "test.tsv", &["u1\t10"]);

        let err = load_ground_truth(&path).unwrap_err();
        assert_eq!(err.to_string(), "Invalid format: Line 1: invalid user value 'u1'");
    }
}
