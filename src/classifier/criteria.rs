//! Evaluation criteria synthesis.
//!
//! Every analysis emits exactly three criteria in a fixed order: a required
//! 1–5 Likert scale, a required yes/no question, and an optional free-text
//! comment field. The wording of the first two adapts to the detected content
//! patterns and media hints. Criteria are also duplicated into a
//! [`CriterionSpec`] form carrying a `description` field equal to the
//! reasoning, for callers that consume that older shape.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sampler::patterns::{ContentPattern, MediaHints};

/// The kind of response a criterion collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionType {
    LikertScale,
    YesNo,
    CustomList,
    TextInput,
}

/// Labels for the ends of a Likert scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLabels {
    pub low: String,
    pub high: String,
}

/// One evaluation question presented to raters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub name: String,
    #[serde(rename = "type")]
    pub criterion_type: CriterionType,
    pub options: Vec<String>,
    /// Why this criterion was chosen.
    pub reasoning: String,
    /// Confidence in the suggestion, 25–95.
    pub confidence: u8,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_labels: Option<ScaleLabels>,
}

/// Duplicate criterion shape with a `description` field instead of
/// `reasoning`, kept for backward-compatible consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub criterion_type: CriterionType,
    pub options: Vec<String>,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_labels: Option<ScaleLabels>,
}

impl From<&Criterion> for CriterionSpec {
    fn from(criterion: &Criterion) -> Self {
        Self {
            name: criterion.name.clone(),
            criterion_type: criterion.criterion_type,
            options: criterion.options.clone(),
            description: criterion.reasoning.clone(),
            required: criterion.required,
            scale_labels: criterion.scale_labels.clone(),
        }
    }
}

/// Builds the fixed three-criterion set, worded for the detected content.
#[derive(Debug, Default)]
pub struct CriteriaGenerator;

impl CriteriaGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Always returns exactly three criteria: Likert, yes/no, free text.
    pub fn generate(
        &self,
        patterns: &BTreeSet<ContentPattern>,
        media: MediaHints,
    ) -> Vec<Criterion> {
        vec![
            self.likert_criterion(patterns, media),
            self.yes_no_criterion(patterns, media),
            self.comment_criterion(),
        ]
    }

    fn likert_criterion(&self, patterns: &BTreeSet<ContentPattern>, media: MediaHints) -> Criterion {
        let reasoning = if media.video {
            "Rates overall video quality on a five-point scale".to_string()
        } else if media.image {
            "Rates overall image quality on a five-point scale".to_string()
        } else if patterns.contains(&ContentPattern::LongText) {
            "Rates the overall quality of the written content on a five-point scale".to_string()
        } else if patterns.contains(&ContentPattern::Urls) {
            "Rates the overall quality of the linked content on a five-point scale".to_string()
        } else {
            "Rates overall content quality on a five-point scale".to_string()
        };

        Criterion {
            name: "Overall Quality".to_string(),
            criterion_type: CriterionType::LikertScale,
            options: (1..=5).map(|n| n.to_string()).collect(),
            reasoning,
            confidence: 85,
            required: true,
            scale_labels: Some(ScaleLabels {
                low: "Poor".to_string(),
                high: "Excellent".to_string(),
            }),
        }
    }

    fn yes_no_criterion(&self, patterns: &BTreeSet<ContentPattern>, media: MediaHints) -> Criterion {
        let (name, question) = yes_no_wording(patterns, media);

        Criterion {
            name: name.to_string(),
            criterion_type: CriterionType::YesNo,
            options: vec!["Yes".to_string(), "No".to_string()],
            reasoning: question.to_string(),
            confidence: 80,
            required: true,
            scale_labels: None,
        }
    }

    fn comment_criterion(&self) -> Criterion {
        Criterion {
            name: "Additional Comments".to_string(),
            criterion_type: CriterionType::TextInput,
            options: Vec::new(),
            reasoning: "Free-form space for observations the structured criteria miss".to_string(),
            confidence: 70,
            required: false,
            scale_labels: None,
        }
    }
}

/// Shared pattern-priority wording used by the yes/no criterion and the
/// instruction synthesis.
pub(crate) fn yes_no_wording(
    patterns: &BTreeSet<ContentPattern>,
    media: MediaHints,
) -> (&'static str, &'static str) {
    if media.video {
        ("Visual Appeal", "Is the video visually appealing?")
    } else if media.image {
        ("Image Clarity", "Is the image clear and appealing?")
    } else if patterns.contains(&ContentPattern::Urls) {
        ("Link Relevance", "Does the link work and point to relevant content?")
    } else if patterns.contains(&ContentPattern::Structured) {
        ("Formatting", "Is the content properly formatted?")
    } else if patterns.contains(&ContentPattern::Numerical) {
        ("Value Plausibility", "Are the numeric values reasonable?")
    } else if patterns.contains(&ContentPattern::Categorical) {
        ("Category Fit", "Is the assigned category appropriate?")
    } else {
        ("Accuracy", "Is the content accurate and appropriate?")
    }
}
