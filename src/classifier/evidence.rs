//! Per-column evidence extraction for role classification.
//!
//! Evidence is computed once per column from the sampled rows: the usable
//! stringified values, shape ratios (question marks, short text), and the
//! identifier/categorical/numeric judgements the cascade and the fallback
//! guarantees both rely on.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{cell_text, parses_as_number, Row};

/// Number of leading rows inspected for the "no usable values" check.
pub const HEAD_SAMPLE_ROWS: usize = 5;

/// Column name looks like an identifier: equals or ends with an ID-like
/// token, optionally preceded by a separator.
static ID_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^(id|uuid|guid|ref|key|index)$|([_\-.]|uu)id$|[_\-.](uuid|guid|ref|key|index)$)")
        .unwrap()
});

/// Characters allowed in identifier-shaped values besides alphanumerics.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Everything the role cascade needs to know about one column.
#[derive(Debug, Clone)]
pub struct ColumnEvidence {
    pub name: String,
    /// Usable stringified values across the sampled rows, in row order.
    pub values: Vec<String>,
    /// Whether the leading rows held no usable value.
    pub head_empty: bool,
    pub unique_count: usize,
    pub mean_length: f64,
    /// Fraction of values ending with a question mark.
    pub question_ratio: f64,
    /// Fraction of values under 80 characters.
    pub short_ratio: f64,
    /// Every value parses as a number (false for empty columns).
    pub numeric: bool,
    /// 2–10 distinct short values.
    pub categorical: bool,
    /// Name or value shape marks this column as an identifier.
    pub identifier: bool,
}

impl ColumnEvidence {
    /// Collect evidence for one column over the sampled rows.
    pub fn collect(name: &str, rows: &[Row]) -> Self {
        let values: Vec<String> = rows.iter().filter_map(|row| cell_text(row, name)).collect();

        let head_empty = rows
            .iter()
            .take(HEAD_SAMPLE_ROWS)
            .all(|row| cell_text(row, name).is_none());

        let unique: HashSet<&str> = values.iter().map(String::as_str).collect();
        let unique_count = unique.len();

        let count = values.len();
        let mean_length = if count > 0 {
            values.iter().map(|v| v.chars().count()).sum::<usize>() as f64 / count as f64
        } else {
            0.0
        };
        let question_ratio = ratio(&values, |v| v.trim_end().ends_with('?'));
        let short_ratio = ratio(&values, |v| v.chars().count() < 80);

        let numeric = count > 0 && values.iter().all(|v| parses_as_number(v));
        let categorical = (2..=10).contains(&unique_count)
            && values.iter().all(|v| v.chars().count() < 32);

        let id_name = ID_NAME.is_match(name);
        // Plain words pass the charset test; a digit in every value and at
        // least two samples separate real keys from short free text.
        let id_shape = count >= 2
            && unique_count == count
            && values.iter().all(|v| {
                v.chars().count() < 36
                    && v.chars().all(is_identifier_char)
                    && v.chars().any(|c| c.is_ascii_digit())
            });
        let identifier = id_name || id_shape;

        Self {
            name: name.to_string(),
            values,
            head_empty,
            unique_count,
            mean_length,
            question_ratio,
            short_ratio,
            numeric,
            categorical,
            identifier,
        }
    }

    /// Whether the column is a candidate for the input/output guarantees:
    /// non-empty and neither identifier, categorical, nor purely numeric.
    pub fn eligible_for_fallback(&self) -> bool {
        !self.values.is_empty() && !self.identifier && !self.categorical && !self.numeric
    }

    /// Score used to pick the best input candidate during the guarantees.
    pub fn input_affinity(&self) -> f64 {
        2.0 * self.question_ratio + self.short_ratio
    }

    /// All values are short and the column has at most 10 distinct values.
    pub fn low_cardinality_short(&self) -> bool {
        !self.values.is_empty()
            && self.unique_count <= 10
            && self.values.iter().all(|v| v.chars().count() < 32)
    }
}

fn ratio(values: &[String], predicate: impl Fn(&str) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| predicate(v)).count() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(column: &str, values: Vec<serde_json::Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert(column.to_string(), v);
                row
            })
            .collect()
    }

    #[test]
    fn test_identifier_by_name() {
        let data = rows("user_id", vec![json!("abc"), json!("abc")]);
        let evidence = ColumnEvidence::collect("user_id", &data);
        assert!(evidence.identifier);

        let evidence = ColumnEvidence::collect("uuid", &rows("uuid", vec![json!("x")]));
        assert!(evidence.identifier);

        let evidence = ColumnEvidence::collect("valid", &rows("valid", vec![json!("maybe so")]));
        assert!(!evidence.identifier);
    }

    #[test]
    fn test_identifier_by_shape() {
        let data = rows(
            "code",
            vec![json!("a-1"), json!("b-2"), json!("c-3"), json!("d-4")],
        );
        let evidence = ColumnEvidence::collect("code", &data);
        assert!(evidence.identifier);

        // Repeated values break the all-unique requirement.
        let data = rows("code", vec![json!("a-1"), json!("a-1"), json!("b-2")]);
        let evidence = ColumnEvidence::collect("code", &data);
        assert!(!evidence.identifier);
    }

    #[test]
    fn test_short_words_are_not_identifier_shaped() {
        // A single one-word answer must stay eligible for the role
        // guarantees.
        let data = rows("a", vec![json!("Paris")]);
        let evidence = ColumnEvidence::collect("a", &data);
        assert!(!evidence.identifier);
        assert!(evidence.eligible_for_fallback());

        let data = rows("word", vec![json!("apple"), json!("pear"), json!("plum")]);
        assert!(!ColumnEvidence::collect("word", &data).identifier);
    }

    #[test]
    fn test_question_and_short_ratios() {
        let data = rows(
            "q",
            vec![json!("What is this?"), json!("And that?"), json!("A statement.")],
        );
        let evidence = ColumnEvidence::collect("q", &data);
        assert!((evidence.question_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert!((evidence.short_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_detection() {
        let data = rows("n", vec![json!(1), json!("2.5"), json!("-3")]);
        assert!(ColumnEvidence::collect("n", &data).numeric);

        let data = rows("n", vec![json!(1), json!("two")]);
        assert!(!ColumnEvidence::collect("n", &data).numeric);

        let data = rows("n", vec![json!(null)]);
        assert!(!ColumnEvidence::collect("n", &data).numeric);
    }

    #[test]
    fn test_categorical_detection() {
        let data = rows(
            "status",
            vec![json!("open"), json!("closed"), json!("open"), json!("open")],
        );
        assert!(ColumnEvidence::collect("status", &data).categorical);

        // A single distinct value is constant, not categorical.
        let data = rows("status", vec![json!("open"), json!("open")]);
        assert!(!ColumnEvidence::collect("status", &data).categorical);
    }

    #[test]
    fn test_head_empty() {
        let mut data = rows("a", vec![json!(null); 5]);
        data.extend(rows("a", vec![json!("late value")]));
        let evidence = ColumnEvidence::collect("a", &data);
        assert!(evidence.head_empty);
        assert_eq!(evidence.values.len(), 1);

        let data = rows("a", vec![json!("x")]);
        assert!(!ColumnEvidence::collect("a", &data).head_empty);
    }

    #[test]
    fn test_fallback_eligibility() {
        let data = rows("essay", vec![json!("A long piece of writing about a topic.")]);
        assert!(ColumnEvidence::collect("essay", &data).eligible_for_fallback());

        let data = rows("n", vec![json!(1), json!(2)]);
        assert!(!ColumnEvidence::collect("n", &data).eligible_for_fallback());
    }

    #[test]
    fn test_input_affinity() {
        let data = rows("q", vec![json!("Why?"), json!("How?")]);
        let evidence = ColumnEvidence::collect("q", &data);
        assert!((evidence.input_affinity() - 3.0).abs() < 1e-9);
    }
}
