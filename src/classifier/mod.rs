//! Column role classification and evaluation-metadata synthesis.
//!
//! The classifier inspects the sampled rows and assigns every column a
//! semantic role with a confidence score and human-readable reasoning. An
//! ordered rule cascade produces tentative roles from per-column evidence; a
//! post-pass then guarantees at least one input and one model-output column
//! whenever an eligible column exists. From the role assignment, the
//! [`criteria`] and [`naming`] modules derive three evaluation criteria, an
//! evaluation name, and rater instructions.
//!
//! # Example
//!
//! ```rust
//! use evalscout::classifier::{ColumnRole, ColumnRoleClassifier};
//! use evalscout::sampler::{RowSampler, SamplingOptions};
//! use serde_json::json;
//!
//! let mut row = evalscout::Row::new();
//! row.insert("question".to_string(), json!("What color is the sky?"));
//! row.insert("answer".to_string(), json!("Blue, on a clear day."));
//! let rows = vec![row];
//! let columns = vec!["question".to_string(), "answer".to_string()];
//!
//! let (sample, metadata) = RowSampler::new(SamplingOptions::default()).sample(&rows, &columns);
//! let analyses = ColumnRoleClassifier::new().classify(&sample, &columns, &metadata);
//!
//! assert_eq!(analyses[0].role, ColumnRole::Input);
//! ```

pub mod criteria;
pub mod evidence;
pub mod naming;
pub mod roles;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use criteria::{CriteriaGenerator, Criterion, CriterionSpec, CriterionType, ScaleLabels};
pub use evidence::ColumnEvidence;
pub use naming::NameGenerator;
pub use roles::{ColumnRoleClassifier, RoleMatch, RoleRule, RuleContext};

/// Semantic role assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Content fed to the model under evaluation.
    #[serde(rename = "Input Data")]
    Input,
    /// Content produced by the model, the thing being judged.
    #[serde(rename = "Model Output")]
    Output,
    /// Columns raters should not see.
    #[serde(rename = "Excluded Data")]
    Excluded,
    /// Bookkeeping columns: identifiers, scores, provenance.
    #[serde(rename = "Metadata")]
    Metadata,
    /// Low-cardinality columns usable to slice results.
    #[serde(rename = "Segment")]
    Segment,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnRole::Input => "Input Data",
            ColumnRole::Output => "Model Output",
            ColumnRole::Excluded => "Excluded Data",
            ColumnRole::Metadata => "Metadata",
            ColumnRole::Segment => "Segment",
        };
        f.write_str(label)
    }
}

/// Role assignment for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAnalysis {
    pub column_name: String,
    /// Suggested semantic role.
    #[serde(rename = "suggestedRole")]
    pub role: ColumnRole,
    /// Confidence in the suggestion, 25–95.
    pub confidence: u8,
    /// Human-readable explanation of why the role was chosen.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&ColumnRole::Input).unwrap(),
            "\"Input Data\""
        );
        assert_eq!(
            serde_json::to_string(&ColumnRole::Output).unwrap(),
            "\"Model Output\""
        );
        assert_eq!(
            serde_json::to_string(&ColumnRole::Excluded).unwrap(),
            "\"Excluded Data\""
        );
    }

    #[test]
    fn test_role_display_matches_serde() {
        for role in [
            ColumnRole::Input,
            ColumnRole::Output,
            ColumnRole::Excluded,
            ColumnRole::Metadata,
            ColumnRole::Segment,
        ] {
            let serialized = serde_json::to_string(&role).unwrap();
            assert_eq!(serialized, format!("\"{role}\""));
        }
    }
}
