//! Coarse content-pattern detection over sampled rows.
//!
//! After selection, the sampler tags the chosen rows with content patterns
//! (`urls`, `long-text`, `structured`, `numerical`, `categorical`) describing
//! the dominant value shapes. The classifier and the criteria/name generators
//! consume these tags; media hints (video/image) additionally steer criterion
//! wording and name prefixes.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::{cell_text, parses_as_number, Row};

/// A coarse tag describing the dominant shape of sampled values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContentPattern {
    Urls,
    LongText,
    Structured,
    Numerical,
    Categorical,
}

impl fmt::Display for ContentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ContentPattern::Urls => "urls",
            ContentPattern::LongText => "long-text",
            ContentPattern::Structured => "structured",
            ContentPattern::Numerical => "numerical",
            ContentPattern::Categorical => "categorical",
        };
        f.write_str(tag)
    }
}

/// Media-type hints detected from column names and sampled values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHints {
    pub video: bool,
    pub image: bool,
}

static VIDEO_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(youtube\.com|youtu\.be|vimeo\.com|\.mp4\b|\.mov\b|\.webm\b)").unwrap()
});
static IMAGE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\.jpe?g\b|\.png\b|\.gif\b|\.webp\b|\.svg\b)").unwrap());
static VIDEO_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|[_\-.])video").unwrap());
static IMAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|[_\-.])(image|img|photo|thumbnail)").unwrap());

/// Detects content patterns and media hints on a sampled subset of rows.
#[derive(Debug, Default)]
pub struct PatternDetector;

impl PatternDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect pattern tags across all columns of the sampled rows.
    ///
    /// Absence of data yields an empty set, never an error.
    pub fn detect(&self, rows: &[Row], columns: &[String]) -> BTreeSet<ContentPattern> {
        let mut patterns = BTreeSet::new();

        for column in columns {
            let texts: Vec<String> = rows
                .iter()
                .filter_map(|row| cell_text(row, column))
                .collect();
            if texts.is_empty() {
                continue;
            }

            if texts
                .iter()
                .any(|t| t.contains("http") || t.contains(".com"))
            {
                patterns.insert(ContentPattern::Urls);
            }
            if texts.iter().any(|t| t.chars().count() > 100) {
                patterns.insert(ContentPattern::LongText);
            }
            if texts.iter().any(|t| t.contains('{') || t.contains('<')) {
                patterns.insert(ContentPattern::Structured);
            }
            if texts.iter().any(|t| parses_as_number(t)) {
                patterns.insert(ContentPattern::Numerical);
            }

            let unique: HashSet<&str> = texts.iter().map(String::as_str).collect();
            if unique.len() > 1 && (unique.len() as f64) < 0.5 * texts.len() as f64 {
                patterns.insert(ContentPattern::Categorical);
            }
        }

        patterns
    }

    /// Detect video/image hints from column names and sampled values.
    pub fn media_hints(&self, rows: &[Row], columns: &[String]) -> MediaHints {
        let mut hints = MediaHints::default();

        for column in columns {
            if VIDEO_NAME.is_match(column) {
                hints.video = true;
            }
            if IMAGE_NAME.is_match(column) {
                hints.image = true;
            }
            for row in rows {
                if let Some(text) = cell_text(row, column) {
                    if VIDEO_VALUE.is_match(&text) {
                        hints.video = true;
                    }
                    if IMAGE_VALUE.is_match(&text) {
                        hints.image = true;
                    }
                }
            }
        }

        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_from(column: &str, values: Vec<serde_json::Value>) -> Vec<Row> {
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
    fn test_url_pattern() {
        let rows = rows_from("link", vec![json!("https://example.com/a"), json!("plain")]);
        let patterns = PatternDetector::new().detect(&rows, &["link".to_string()]);
        assert!(patterns.contains(&ContentPattern::Urls));
    }

    #[test]
    fn test_long_text_pattern() {
        let long = "x".repeat(120);
        let rows = rows_from("body", vec![json!(long)]);
        let patterns = PatternDetector::new().detect(&rows, &["body".to_string()]);
        assert!(patterns.contains(&ContentPattern::LongText));
    }

    #[test]
    fn test_structured_pattern() {
        let rows = rows_from("payload", vec![json!("<div>hello</div>")]);
        let patterns = PatternDetector::new().detect(&rows, &["payload".to_string()]);
        assert!(patterns.contains(&ContentPattern::Structured));

        let rows = rows_from("payload", vec![json!({"k": "v"})]);
        let patterns = PatternDetector::new().detect(&rows, &["payload".to_string()]);
        assert!(patterns.contains(&ContentPattern::Structured));
    }

    #[test]
    fn test_numerical_pattern() {
        let rows = rows_from("score", vec![json!("3.5"), json!(42)]);
        let patterns = PatternDetector::new().detect(&rows, &["score".to_string()]);
        assert!(patterns.contains(&ContentPattern::Numerical));
    }

    #[test]
    fn test_categorical_pattern() {
        let rows = rows_from(
            "label",
            vec![json!("a"), json!("a"), json!("b"), json!("a"), json!("b"), json!("a")],
        );
        let patterns = PatternDetector::new().detect(&rows, &["label".to_string()]);
        assert!(patterns.contains(&ContentPattern::Categorical));
    }

    #[test]
    fn test_single_value_not_categorical() {
        let rows = rows_from("label", vec![json!("a"), json!("a"), json!("a")]);
        let patterns = PatternDetector::new().detect(&rows, &["label".to_string()]);
        assert!(!patterns.contains(&ContentPattern::Categorical));
    }

    #[test]
    fn test_empty_rows_yield_empty_set() {
        let patterns = PatternDetector::new().detect(&[], &["x".to_string()]);
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_pattern_serde_spelling() {
        let json = serde_json::to_string(&ContentPattern::LongText).unwrap();
        assert_eq!(json, "\"long-text\"");
        assert_eq!(ContentPattern::LongText.to_string(), "long-text");
    }

    #[test]
    fn test_media_hints_from_values_and_names() {
        let rows = rows_from(
            "video_url",
            vec![json!("https://youtube.com/watch?v=abc123")],
        );
        let hints = PatternDetector::new().media_hints(&rows, &["video_url".to_string()]);
        assert!(hints.video);
        assert!(!hints.image);

        let rows = rows_from("img", vec![json!("https://cdn.example.com/pic.png")]);
        let hints = PatternDetector::new().media_hints(&rows, &["img".to_string()]);
        assert!(hints.image);
    }
}
