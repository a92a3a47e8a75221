//! Ordered role-rule cascade and the input/output guarantees.
//!
//! Classification is two passes. The first pass evaluates an explicit,
//! ordered list of rules per column — first match wins — producing a
//! tentative role from that column's evidence alone. The second pass inspects
//! the aggregate role assignment and applies the fallback guarantees: when no
//! column was classified as model output (or input), the best remaining
//! candidate is reclassified so downstream consumers always have both roles
//! to work with whenever a non-trivial column exists.
//!
//! Rule order is the precedence contract: identifier and provenance checks
//! run before keyword checks, so a short low-cardinality `model` column stays
//! metadata even though its name could read as an output keyword.

use std::collections::BTreeSet;

use tracing::debug;

use crate::classifier::evidence::ColumnEvidence;
use crate::classifier::{ColumnAnalysis, ColumnRole};
use crate::sampler::patterns::ContentPattern;
use crate::sampler::{SampleMetadata, SamplingStrategy};

/// Column-name keywords that indicate input data.
const INPUT_KEYWORDS: &[&str] = &[
    "input",
    "question",
    "prompt",
    "context",
    "instruction",
    "query",
    "scenario",
    "task",
    "source",
    "premise",
    "hypothesis",
    "background",
];

/// Column-name prefixes that indicate input data.
const INPUT_PREFIXES: &[&str] = &["user_", "pre_"];

/// Column-name keywords that indicate model output.
const OUTPUT_KEYWORDS: &[&str] = &[
    "output",
    "response",
    "answer",
    "text",
    "content",
    "review",
    "completion",
    "summary",
    "explanation",
    "generated",
    "prediction",
    "result",
    "comment",
    "essay",
    "transcript",
    "caption",
    "title",
    "headline",
    "narrative",
];

/// Column-name keywords that indicate provenance metadata.
const PROVENANCE_KEYWORDS: &[&str] = &["model", "source", "provider", "author", "system", "engine"];

/// Shared context available to every rule evaluation.
pub struct RuleContext<'a> {
    /// Content patterns detected on the sampled rows.
    pub patterns: &'a BTreeSet<ContentPattern>,
}

/// A successful rule match: the role to assign, a confidence bonus, and the
/// human-readable reasoning.
#[derive(Debug, Clone)]
pub struct RoleMatch {
    pub role: ColumnRole,
    pub bonus: u8,
    pub reasoning: String,
}

/// One step of the classification cascade.
pub trait RoleRule: Send + Sync {
    /// Evaluate this rule against a column's evidence; `Some` wins the
    /// cascade for that column.
    fn evaluate(&self, evidence: &ColumnEvidence, ctx: &RuleContext<'_>) -> Option<RoleMatch>;

    /// Human-readable name for this rule.
    fn name(&self) -> &str;
}

/// Rule 1: columns with no usable values in the leading rows are excluded.
pub struct EmptyColumnRule;

impl RoleRule for EmptyColumnRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !evidence.head_empty {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Excluded,
            bonus: 15,
            reasoning: "No usable values found in the leading sample rows".to_string(),
        })
    }

    fn name(&self) -> &str {
        "EmptyColumnRule"
    }
}

/// Rule 2: identifier columns by name or value shape are metadata.
pub struct IdentifierRule;

impl RoleRule for IdentifierRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !evidence.identifier {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Metadata,
            bonus: 25,
            reasoning: "Identifier-like column: ID-style name or unique short alphanumeric values"
                .to_string(),
        })
    }

    fn name(&self) -> &str {
        "IdentifierRule"
    }
}

/// Rule 3: model/source/provider columns with few short values are metadata.
pub struct ProvenanceRule;

impl RoleRule for ProvenanceRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        let name = evidence.name.to_lowercase();
        let named = PROVENANCE_KEYWORDS.iter().any(|kw| name.contains(kw));
        if !named || !evidence.low_cardinality_short() {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Metadata,
            bonus: 20,
            reasoning: format!(
                "Provenance-style name with only {} short distinct values",
                evidence.unique_count
            ),
        })
    }

    fn name(&self) -> &str {
        "ProvenanceRule"
    }
}

/// Rule 4: input-keyword column names are input data.
pub struct InputKeywordRule;

impl RoleRule for InputKeywordRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        let name = evidence.name.to_lowercase();
        let keyword = INPUT_KEYWORDS
            .iter()
            .find(|kw| name.contains(*kw))
            .copied()
            .or_else(|| {
                INPUT_PREFIXES
                    .iter()
                    .find(|prefix| name.starts_with(*prefix))
                    .copied()
            })?;
        Some(RoleMatch {
            role: ColumnRole::Input,
            bonus: 20,
            reasoning: format!("Column name matches input keyword '{keyword}'"),
        })
    }

    fn name(&self) -> &str {
        "InputKeywordRule"
    }
}

/// Rule 5: question-shaped or consistently short free-text columns are
/// input data.
pub struct InputShapeRule;

impl RoleRule for InputShapeRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if evidence.identifier || evidence.categorical || evidence.numeric {
            return None;
        }
        // Output-named columns belong to the keyword rule even when their
        // values are short.
        let name = evidence.name.to_lowercase();
        if OUTPUT_KEYWORDS.iter().any(|kw| name.contains(kw)) {
            return None;
        }
        if evidence.question_ratio > 0.5 {
            return Some(RoleMatch {
                role: ColumnRole::Input,
                bonus: 15,
                reasoning: format!(
                    "{:.0}% of sampled values are phrased as questions",
                    evidence.question_ratio * 100.0
                ),
            });
        }
        if evidence.short_ratio > 0.7 && !evidence.values.is_empty() {
            return Some(RoleMatch {
                role: ColumnRole::Input,
                bonus: 15,
                reasoning: "Sampled values are predominantly short free text".to_string(),
            });
        }
        None
    }

    fn name(&self) -> &str {
        "InputShapeRule"
    }
}

/// Rule 6: output-keyword column names are model output.
pub struct OutputKeywordRule;

impl RoleRule for OutputKeywordRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        let name = evidence.name.to_lowercase();
        let keyword = OUTPUT_KEYWORDS.iter().find(|kw| name.contains(*kw))?;
        Some(RoleMatch {
            role: ColumnRole::Output,
            bonus: 20,
            reasoning: format!("Column name matches output keyword '{keyword}'"),
        })
    }

    fn name(&self) -> &str {
        "OutputKeywordRule"
    }
}

/// Rule 7: URL-bearing columns named like links are input data.
pub struct UrlColumnRule;

impl RoleRule for UrlColumnRule {
    fn evaluate(&self, evidence: &ColumnEvidence, ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !ctx.patterns.contains(&ContentPattern::Urls)
            || !evidence.name.to_lowercase().contains("url")
        {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Input,
            bonus: 15,
            reasoning: "URL column feeding content under evaluation".to_string(),
        })
    }

    fn name(&self) -> &str {
        "UrlColumnRule"
    }
}

/// Rule 8: long free text is model output.
pub struct LongTextRule;

impl RoleRule for LongTextRule {
    fn evaluate(&self, evidence: &ColumnEvidence, ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !ctx.patterns.contains(&ContentPattern::LongText) || evidence.mean_length <= 100.0 {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Output,
            bonus: 20,
            reasoning: format!(
                "Long free text (mean {:.0} characters) reads as generated output",
                evidence.mean_length
            ),
        })
    }

    fn name(&self) -> &str {
        "LongTextRule"
    }
}

/// Rule 9: low-cardinality short values segment the dataset.
pub struct CategoricalRule;

impl RoleRule for CategoricalRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !evidence.categorical {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Segment,
            bonus: 15,
            reasoning: format!(
                "Categorical column with {} distinct values, usable for segmentation",
                evidence.unique_count
            ),
        })
    }

    fn name(&self) -> &str {
        "CategoricalRule"
    }
}

/// Rule 10: purely numeric columns are metadata.
pub struct NumericRule;

impl RoleRule for NumericRule {
    fn evaluate(&self, evidence: &ColumnEvidence, _ctx: &RuleContext<'_>) -> Option<RoleMatch> {
        if !evidence.numeric {
            return None;
        }
        Some(RoleMatch {
            role: ColumnRole::Metadata,
            bonus: 15,
            reasoning: "Every sampled value parses as a number".to_string(),
        })
    }

    fn name(&self) -> &str {
        "NumericRule"
    }
}

/// The default set of rules, in cascade order.
pub fn standard_rules() -> Vec<Box<dyn RoleRule>> {
    vec![
        Box::new(EmptyColumnRule),
        Box::new(IdentifierRule),
        Box::new(ProvenanceRule),
        Box::new(InputKeywordRule),
        Box::new(InputShapeRule),
        Box::new(OutputKeywordRule),
        Box::new(UrlColumnRule),
        Box::new(LongTextRule),
        Box::new(CategoricalRule),
        Box::new(NumericRule),
    ]
}

/// Runs the cascade and the role guarantees over all columns.
pub struct ColumnRoleClassifier {
    rules: Vec<Box<dyn RoleRule>>,
}

impl Default for ColumnRoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnRoleClassifier {
    /// Classifier with the standard cascade.
    pub fn new() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Classifier with a custom rule cascade, evaluated in order.
    pub fn with_rules(rules: Vec<Box<dyn RoleRule>>) -> Self {
        Self { rules }
    }

    /// Classify every column of the sample.
    ///
    /// The output covers the input column set exactly: one analysis per
    /// column, in input order.
    pub fn classify(
        &self,
        rows: &[crate::record::Row],
        columns: &[String],
        metadata: &SampleMetadata,
    ) -> Vec<ColumnAnalysis> {
        let evidence: Vec<ColumnEvidence> = columns
            .iter()
            .map(|column| ColumnEvidence::collect(column, rows))
            .collect();
        let ctx = RuleContext {
            patterns: &metadata.content_patterns,
        };

        let mut analyses: Vec<ColumnAnalysis> = evidence
            .iter()
            .map(|column| {
                let matched = self
                    .rules
                    .iter()
                    .find_map(|rule| {
                        rule.evaluate(column, &ctx).map(|m| {
                            debug!(column = %column.name, rule = rule.name(), role = %m.role, "Rule matched");
                            m
                        })
                    })
                    .unwrap_or_else(|| RoleMatch {
                        role: ColumnRole::Metadata,
                        bonus: 0,
                        reasoning: "No specific signal detected; treated as metadata".to_string(),
                    });
                ColumnAnalysis {
                    column_name: column.name.clone(),
                    role: matched.role,
                    confidence: blend_confidence(matched.bonus, metadata),
                    reasoning: matched.reasoning,
                }
            })
            .collect();

        apply_role_guarantees(&mut analyses, &evidence);
        analyses
    }
}

/// Blend the rule bonus with the sampling quality signal.
///
/// Confidence starts at 60, gains 10 when the sample came from intelligent
/// selection over a diverse dataset, adds the rule bonus, and clamps to
/// [25, 95].
fn blend_confidence(bonus: u8, metadata: &SampleMetadata) -> u8 {
    let mut confidence = 60i32 + i32::from(bonus);
    if metadata.strategy == SamplingStrategy::Intelligent && metadata.diversity_score > 0.6 {
        confidence += 10;
    }
    confidence.clamp(25, 95) as u8
}

/// Post-pass over the aggregate role assignment.
///
/// Ensures at least one model-output and one input column whenever an
/// eligible (non-identifier, non-categorical, non-numeric) column exists.
/// The two reassignments never target the same column.
fn apply_role_guarantees(analyses: &mut [ColumnAnalysis], evidence: &[ColumnEvidence]) {
    let mut output_index = analyses
        .iter()
        .position(|a| a.role == ColumnRole::Output);

    if output_index.is_none() {
        let eligible: Vec<usize> = (0..evidence.len())
            .filter(|&i| evidence[i].eligible_for_fallback())
            .collect();
        // Reassigning the only input column would trade one guarantee for
        // the other: prefer non-input candidates, and touch input columns
        // only while a second one remains.
        let input_count = analyses
            .iter()
            .filter(|a| a.role == ColumnRole::Input)
            .count();
        let non_input: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&i| analyses[i].role != ColumnRole::Input)
            .collect();
        let pool = if !non_input.is_empty() {
            non_input
        } else if input_count >= 2 {
            eligible
        } else {
            Vec::new()
        };
        // Question-shaped columns are prompts, not outputs; defer them while
        // any alternative exists.
        let answers: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| evidence[i].question_ratio <= 0.5)
            .collect();
        let candidates = if answers.is_empty() { pool } else { answers };

        if let Some(&best) = candidates.iter().max_by(|&&a, &&b| {
            evidence[a]
                .mean_length
                .partial_cmp(&evidence[b].mean_length)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.cmp(&a))
        }) {
            let analysis = &mut analyses[best];
            analysis.role = ColumnRole::Output;
            analysis.confidence = 80;
            analysis.reasoning = format!(
                "{}; reassigned as model output (longest remaining free-text column)",
                analysis.reasoning
            );
            output_index = Some(best);
        }
    }

    let has_input = analyses.iter().any(|a| a.role == ColumnRole::Input);
    if !has_input {
        let candidates: Vec<usize> = (0..evidence.len())
            .filter(|&i| evidence[i].eligible_for_fallback() && Some(i) != output_index)
            .filter(|&i| analyses[i].role != ColumnRole::Output)
            .collect();

        if let Some(&best) = candidates.iter().max_by(|&&a, &&b| {
            evidence[a]
                .input_affinity()
                .partial_cmp(&evidence[b].input_affinity())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.cmp(&a))
        }) {
            let analysis = &mut analyses[best];
            analysis.role = ColumnRole::Input;
            analysis.confidence = 75;
            analysis.reasoning = format!(
                "{}; reassigned as input data (best question/short-text candidate)",
                analysis.reasoning
            );
        }
    }
}
