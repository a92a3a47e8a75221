//! Row representation and cell-level helpers shared by the sampler and
//! classifier.
//!
//! Rows are JSON objects: a mapping from column name to an arbitrary scalar
//! (or nested) value. The crate never mutates rows; every derived statistic
//! works on a stringified view of the cells. A cell is considered *present*
//! when the key exists, the value is not JSON null, and its stringified form
//! is not blank after trimming.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single dataset record: column name to value.
pub type Row = serde_json::Map<String, Value>;

/// Runtime kind of a cell value, as observed in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value by its runtime kind.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

/// Stringify a value for length and uniqueness heuristics.
///
/// Strings pass through without quoting; everything else uses its JSON
/// rendering, so nested arrays/objects still contribute a usable text form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The stringified form of a cell, or `None` when the cell is absent, null,
/// or blank after trimming.
pub fn cell_text(row: &Row, column: &str) -> Option<String> {
    let value = row.get(column)?;
    if value.is_null() {
        return None;
    }
    let text = render_value(value);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Whether the cell holds a usable value.
pub fn cell_present(row: &Row, column: &str) -> bool {
    cell_text(row, column).is_some()
}

/// Whether a stringified cell parses as a number.
pub fn parses_as_number(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok()
}
