//! Evaluation name and instruction synthesis.
//!
//! The name derives from the detected model-output column (or the input
//! column when no output exists), mapped through a keyword table, with
//! media-type prefixing. Instructions are a fixed preamble plus one
//! pattern-specific sentence, with a trailing note for highly diverse
//! samples.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::{ColumnAnalysis, ColumnRole};
use crate::sampler::patterns::{ContentPattern, MediaHints};

/// Keyword-to-label table for naming from a column name. Checked in order;
/// first containment match wins.
const NAME_LABELS: &[(&str, &str)] = &[
    ("summary", "Summary Quality"),
    ("explanation", "Explanation Quality"),
    ("review", "Review Quality"),
    ("feedback", "Feedback Quality"),
    ("comment", "Comment Quality"),
    ("description", "Description Quality"),
    ("answer", "Answer Quality"),
    ("title", "Title Quality"),
    ("headline", "Headline Quality"),
    ("caption", "Caption Quality"),
    ("transcript", "Transcript Quality"),
    ("story", "Story Quality"),
    ("article", "Article Quality"),
    ("completion", "Completion Quality"),
    ("response", "Response Quality"),
    ("output", "Response Quality"),
    ("generated", "Response Quality"),
    ("prediction", "Response Quality"),
    ("result", "Response Quality"),
];

/// Short lowercase technical prefix, e.g. `df.` or `raw.`.
static TECHNICAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{1,4}\.").unwrap());

/// Derives the evaluation title and rater instructions.
#[derive(Debug, Default)]
pub struct NameGenerator;

impl NameGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Derive a short evaluation title from the role assignment.
    pub fn evaluation_name(
        &self,
        analyses: &[ColumnAnalysis],
        patterns: &BTreeSet<ContentPattern>,
        media: MediaHints,
    ) -> String {
        let outputs: Vec<&ColumnAnalysis> = analyses
            .iter()
            .filter(|a| a.role == ColumnRole::Output)
            .collect();

        let base = if outputs.len() >= 2 {
            "Model Output Comparison".to_string()
        } else if let Some(output) = outputs.first() {
            name_from_column(&output.column_name)
        } else if let Some(input) = analyses.iter().find(|a| a.role == ColumnRole::Input) {
            name_from_column(&input.column_name)
        } else if media.video && media.image {
            "Media Content Quality".to_string()
        } else if media.image {
            "Image Content Quality".to_string()
        } else if media.video {
            "Video Content Quality".to_string()
        } else if patterns.contains(&ContentPattern::Numerical) {
            "Numeric Accuracy".to_string()
        } else {
            "Content Quality".to_string()
        };

        apply_media_prefix(base, media)
    }

    /// Synthesize rater instructions from the detected content.
    pub fn instructions(
        &self,
        patterns: &BTreeSet<ContentPattern>,
        media: MediaHints,
        diversity_score: f64,
    ) -> String {
        let mut instructions = String::from("Please evaluate each item carefully.");
        instructions.push(' ');
        instructions.push_str(focus_sentence(patterns, media));
        if diversity_score > 0.7 {
            instructions.push_str(
                " The sample covers a wide range of content; judge each item on its own merits.",
            );
        }
        instructions
    }
}

/// Map a column name through the keyword table, else title-case it with a
/// " Quality" suffix.
fn name_from_column(column_name: &str) -> String {
    let lowered = column_name.to_lowercase();
    for (keyword, label) in NAME_LABELS {
        if lowered.contains(keyword) {
            return (*label).to_string();
        }
    }
    format!("{} Quality", clean_column_name(column_name))
}

/// Strip a short technical prefix, replace separators with spaces, collapse
/// whitespace, and title-case each word.
pub fn clean_column_name(name: &str) -> String {
    let stripped = TECHNICAL_PREFIX.replace(name, "");
    let spaced = stripped.replace(['.', '_'], " ");
    spaced
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<String>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Prefix "Video " or "Media " for media content, unless already present.
fn apply_media_prefix(name: String, media: MediaHints) -> String {
    let already_prefixed = name.starts_with("Video") || name.starts_with("Media");
    if media.video && !already_prefixed {
        format!("Video {name}")
    } else if media.image && !already_prefixed {
        format!("Media {name}")
    } else {
        name
    }
}

/// One pattern-specific instruction sentence, same priority order as the
/// yes/no criterion wording.
fn focus_sentence(patterns: &BTreeSet<ContentPattern>, media: MediaHints) -> &'static str {
    if media.video {
        "Pay attention to visual quality, pacing, and clarity."
    } else if media.image {
        "Assess clarity, composition, and relevance."
    } else if patterns.contains(&ContentPattern::Urls) {
        "Open each link and judge whether the content is functional and relevant."
    } else if patterns.contains(&ContentPattern::Structured) {
        "Check that the structure and formatting are correct."
    } else if patterns.contains(&ContentPattern::Numerical) {
        "Judge whether the values are plausible and consistent."
    } else if patterns.contains(&ContentPattern::Categorical) {
        "Judge whether each assigned category fits the content."
    } else {
        "Judge accuracy, clarity, and appropriateness."
    }
}
