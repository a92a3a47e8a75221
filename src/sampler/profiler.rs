//! Dataset profiling: per-column statistics computed over the full dataset.
//!
//! The profiler makes a single pass over all rows and, for each column,
//! collects the distinct stringified values, the mean character length of
//! non-empty cells, the null/empty count, and the set of runtime value kinds
//! observed. It also derives an overall diversity estimate for the dataset:
//! the mean, across columns, of each column's uniqueness ratio.
//!
//! Profiles are ephemeral: they are computed once per sampling call from the
//! *full* dataset (not the sample) and discarded after selection.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{cell_text, Row, ValueKind};

/// Statistics for a single column, computed over every row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column_name: String,
    /// Distinct stringified non-empty values.
    pub unique_values: HashSet<String>,
    /// Mean character length of non-empty values (0.0 for empty columns).
    pub average_length: f64,
    /// Count of rows where the cell is absent, null, or blank.
    pub null_count: usize,
    /// Count of rows with a usable value.
    pub non_null_count: usize,
    /// Runtime kinds observed among present values.
    pub value_kinds: BTreeSet<ValueKind>,
}

impl ColumnStatistics {
    /// Uniqueness ratio in [0, 1]: distinct values over non-empty cells.
    pub fn uniqueness(&self) -> f64 {
        let ratio = self.unique_values.len() as f64 / self.non_null_count.max(1) as f64;
        ratio.min(1.0)
    }
}

/// Complete statistical profile of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    /// Per-column statistics, keyed by column name.
    pub columns: HashMap<String, ColumnStatistics>,
    /// Mean column uniqueness across the dataset, in [0, 1].
    pub diversity_estimate: f64,
}

impl DatasetProfile {
    /// Statistics for the given column, if it was profiled.
    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.get(name)
    }
}

/// Computes a [`DatasetProfile`] from rows and a column list.
///
/// Profiling has no failure modes: empty datasets and empty columns yield
/// zero-valued statistics.
#[derive(Debug, Default)]
pub struct DatasetProfiler;

impl DatasetProfiler {
    /// Create a profiler with default behavior.
    pub fn new() -> Self {
        Self
    }

    /// Profile the full dataset.
    pub fn profile(&self, rows: &[Row], columns: &[String]) -> DatasetProfile {
        let mut stats: HashMap<String, ColumnStatistics> = HashMap::with_capacity(columns.len());

        for column in columns {
            let mut unique_values = HashSet::new();
            let mut value_kinds = BTreeSet::new();
            let mut total_length = 0usize;
            let mut non_null_count = 0usize;
            let mut null_count = 0usize;

            for row in rows {
                if let Some(value) = row.get(column.as_str()) {
                    value_kinds.insert(ValueKind::of(value));
                }
                match cell_text(row, column) {
                    Some(text) => {
                        total_length += text.chars().count();
                        non_null_count += 1;
                        unique_values.insert(text);
                    }
                    None => null_count += 1,
                }
            }

            let average_length = if non_null_count > 0 {
                total_length as f64 / non_null_count as f64
            } else {
                0.0
            };

            stats.insert(
                column.clone(),
                ColumnStatistics {
                    column_name: column.clone(),
                    unique_values,
                    average_length,
                    null_count,
                    non_null_count,
                    value_kinds,
                },
            );
        }

        let diversity_estimate = if stats.is_empty() {
            0.0
        } else {
            stats.values().map(ColumnStatistics::uniqueness).sum::<f64>() / stats.len() as f64
        };

        debug!(
            rows = rows.len(),
            columns = columns.len(),
            diversity_estimate,
            "Profiled dataset"
        );

        DatasetProfile {
            row_count: rows.len(),
            columns: stats,
            diversity_estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_from(values: Vec<serde_json::Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("col".to_string(), v);
                row
            })
            .collect()
    }

    #[test]
    fn test_profile_basic_statistics() {
        let rows = rows_from(vec![json!("aa"), json!("bb"), json!("aa"), json!(null)]);
        let columns = vec!["col".to_string()];

        let profile = DatasetProfiler::new().profile(&rows, &columns);
        let stats = profile.column("col").unwrap();

        assert_eq!(stats.unique_values.len(), 2);
        assert_eq!(stats.non_null_count, 3);
        assert_eq!(stats.null_count, 1);
        assert!((stats.average_length - 2.0).abs() < f64::EPSILON);
        assert!(stats.value_kinds.contains(&ValueKind::String));
        assert!(stats.value_kinds.contains(&ValueKind::Null));
    }

    #[test]
    fn test_uniqueness_ratio() {
        let rows = rows_from(vec![json!("a"), json!("b"), json!("c"), json!("a")]);
        let profile = DatasetProfiler::new().profile(&rows, &["col".to_string()]);

        let stats = profile.column("col").unwrap();
        assert!((stats.uniqueness() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_empty_column_yields_zero_statistics() {
        let rows = rows_from(vec![json!(null), json!("")]);
        let profile = DatasetProfiler::new().profile(&rows, &["col".to_string()]);

        let stats = profile.column("col").unwrap();
        assert!(stats.unique_values.is_empty());
        assert_eq!(stats.average_length, 0.0);
        assert_eq!(stats.null_count, 2);
        assert_eq!(stats.uniqueness(), 0.0);
    }

    #[test]
    fn test_empty_dataset_diversity_is_zero() {
        let profile = DatasetProfiler::new().profile(&[], &[]);
        assert_eq!(profile.diversity_estimate, 0.0);
        assert_eq!(profile.row_count, 0);
    }

    #[test]
    fn test_diversity_estimate_is_mean_of_uniqueness() {
        let mut rows = Vec::new();
        for i in 0..4 {
            let mut row = Row::new();
            row.insert("unique".to_string(), json!(format!("v{i}")));
            row.insert("constant".to_string(), json!("same"));
            rows.push(row);
        }
        let columns = vec!["unique".to_string(), "constant".to_string()];
        let profile = DatasetProfiler::new().profile(&rows, &columns);

        // unique column: 1.0, constant column: 0.25 -> mean 0.625
        assert!((profile.diversity_estimate - 0.625).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_value_kinds_recorded() {
        let rows = rows_from(vec![json!(1), json!("x"), json!(true)]);
        let profile = DatasetProfiler::new().profile(&rows, &["col".to_string()]);

        let kinds = &profile.column("col").unwrap().value_kinds;
        assert!(kinds.contains(&ValueKind::Number));
        assert!(kinds.contains(&ValueKind::String));
        assert!(kinds.contains(&ValueKind::Boolean));
    }
}
