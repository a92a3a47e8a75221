//! Per-row scoring against dataset-wide statistics.
//!
//! Each row gets three scores in [0, 1]:
//!
//! - **completeness** — fraction of columns with a usable value,
//! - **diversity** — how unusual the row's values are relative to the
//!   profiled column statistics (rarity blended with a length ratio),
//! - **content richness** — a text-shape heuristic rewarding long values,
//!   links, sentence punctuation, and real word counts.
//!
//! The combined score is a weighted sum; the weights follow the sampling
//! options. Scores drive the greedy selection order only and are discarded
//! afterwards.

use crate::error::{SamplerError, SamplerResult};
use crate::record::{cell_text, Row};
use crate::sampler::profiler::DatasetProfile;
use crate::sampler::SamplingOptions;

/// Weights applied when combining the three per-row scores.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub completeness: f64,
    pub diversity: f64,
    pub content: f64,
    /// Whether content richness is computed or folded into a flat baseline.
    pub score_content: bool,
}

impl ScoreWeights {
    /// Derive weights from sampling options.
    ///
    /// Completeness weighs 0.4 when prioritized, 0.2 otherwise; diversity is
    /// fixed at 0.4; content weighs 0.2 when pattern analysis is enabled and
    /// otherwise contributes a flat 0.2 baseline so rankings stay comparable.
    pub fn from_options(options: &SamplingOptions) -> Self {
        Self {
            completeness: if options.prioritize_completeness { 0.4 } else { 0.2 },
            diversity: 0.4,
            content: 0.2,
            score_content: options.enable_pattern_analysis,
        }
    }
}

/// Ephemeral score for one row.
#[derive(Debug, Clone, Copy)]
pub struct RowScore {
    pub index: usize,
    pub completeness: f64,
    pub diversity: f64,
    pub content: f64,
    pub combined: f64,
}

/// Scores rows against a [`DatasetProfile`].
pub struct RowScorer<'a> {
    profile: &'a DatasetProfile,
    columns: &'a [String],
    weights: ScoreWeights,
}

impl<'a> RowScorer<'a> {
    pub fn new(profile: &'a DatasetProfile, columns: &'a [String], weights: ScoreWeights) -> Self {
        Self {
            profile,
            columns,
            weights,
        }
    }

    /// Score every row, preserving input order.
    pub fn score_all(&self, rows: &[Row]) -> SamplerResult<Vec<RowScore>> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.score_row(index, row))
            .collect()
    }

    /// Score a single row.
    pub fn score_row(&self, index: usize, row: &Row) -> SamplerResult<RowScore> {
        let completeness = self.completeness(row);
        let diversity = self.diversity(row)?;
        let content = if self.weights.score_content {
            self.content_richness(row)
        } else {
            0.0
        };

        let content_term = if self.weights.score_content {
            self.weights.content * content
        } else {
            // Flat baseline keeps the combined scale stable when pattern
            // analysis is disabled.
            self.weights.content
        };

        let combined = self.weights.completeness * completeness
            + self.weights.diversity * diversity
            + content_term;

        Ok(RowScore {
            index,
            completeness,
            diversity,
            content,
            combined,
        })
    }

    /// Fraction of columns with a usable value.
    pub fn completeness(&self, row: &Row) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        let present = self
            .columns
            .iter()
            .filter(|column| cell_text(row, column).is_some())
            .count();
        present as f64 / self.columns.len() as f64
    }

    /// Mean per-column rarity/length score; empty cells contribute 0.
    fn diversity(&self, row: &Row) -> SamplerResult<f64> {
        if self.columns.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for column in self.columns {
            let stats = self
                .profile
                .column(column)
                .ok_or_else(|| SamplerError::missing_statistics(column.clone()))?;
            if let Some(text) = cell_text(row, column) {
                let rarity = stats.uniqueness();
                let length_ratio = if stats.average_length > 0.0 {
                    (text.chars().count() as f64 / stats.average_length).min(1.0)
                } else {
                    0.0
                };
                total += 0.5 * rarity + 0.5 * length_ratio;
            }
        }
        Ok(total / self.columns.len() as f64)
    }

    /// Mean per-column content heuristic; empty cells contribute 0.
    fn content_richness(&self, row: &Row) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .columns
            .iter()
            .filter_map(|column| cell_text(row, column))
            .map(|text| value_richness(&text))
            .sum();
        total / self.columns.len() as f64
    }
}

/// Content-richness heuristic for one value, in [0, 1].
///
/// Starts at 0.5 and is boosted for length over 50 characters, link content,
/// sentence-ending punctuation, and word counts over 10.
fn value_richness(text: &str) -> f64 {
    let mut score: f64 = 0.5;
    if text.chars().count() > 50 {
        score += 0.15;
    }
    if text.contains("http") {
        score += 0.15;
    }
    if text.contains('.') || text.contains('!') || text.contains('?') {
        score += 0.1;
    }
    if text.split_whitespace().count() > 10 {
        score += 0.1;
    }
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::profiler::DatasetProfiler;
    use serde_json::json;

    fn make_rows() -> (Vec<Row>, Vec<String>) {
        let specs = vec![
            vec![("q", json!("What is the capital of France?")), ("a", json!("Paris"))],
            vec![("q", json!("Name a primary color.")), ("a", json!(null))],
            vec![
                ("q", json!("Describe the water cycle in detail.")),
                (
                    "a",
                    json!("Water evaporates from oceans, condenses into clouds, and returns as precipitation. The cycle then repeats endlessly across the planet."),
                ),
            ],
        ];
        let rows: Vec<Row> = specs
            .into_iter()
            .map(|cells| {
                let mut row = Row::new();
                for (k, v) in cells {
                    row.insert(k.to_string(), v);
                }
                row
            })
            .collect();
        (rows, vec!["q".to_string(), "a".to_string()])
    }

    fn scorer_fixture(
        rows: &[Row],
        columns: &[String],
        options: &SamplingOptions,
    ) -> DatasetProfile {
        let _ = options;
        DatasetProfiler::new().profile(rows, columns)
    }

    #[test]
    fn test_completeness_fraction() {
        let (rows, columns) = make_rows();
        let options = SamplingOptions::default();
        let profile = scorer_fixture(&rows, &columns, &options);
        let scorer = RowScorer::new(&profile, &columns, ScoreWeights::from_options(&options));

        assert!((scorer.completeness(&rows[0]) - 1.0).abs() < 1e-9);
        assert!((scorer.completeness(&rows[1]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_complete_rich_rows_rank_higher() {
        let (rows, columns) = make_rows();
        let options = SamplingOptions::default();
        let profile = scorer_fixture(&rows, &columns, &options);
        let scorer = RowScorer::new(&profile, &columns, ScoreWeights::from_options(&options));

        let scores = scorer.score_all(&rows).unwrap();
        // Row 2 is complete, long, and sentence-shaped; row 1 has a null cell.
        assert!(scores[2].combined > scores[1].combined);
        assert!(scores[0].combined > scores[1].combined);
    }

    #[test]
    fn test_scores_bounded() {
        let (rows, columns) = make_rows();
        let options = SamplingOptions::default();
        let profile = scorer_fixture(&rows, &columns, &options);
        let scorer = RowScorer::new(&profile, &columns, ScoreWeights::from_options(&options));

        for score in scorer.score_all(&rows).unwrap() {
            assert!((0.0..=1.0).contains(&score.completeness));
            assert!((0.0..=1.0).contains(&score.diversity));
            assert!((0.0..=1.0).contains(&score.content));
            assert!((0.0..=1.0).contains(&score.combined));
        }
    }

    #[test]
    fn test_missing_statistics_error() {
        let (rows, columns) = make_rows();
        let options = SamplingOptions::default();
        let profile = scorer_fixture(&rows, &columns, &options);

        let bad_columns = vec!["q".to_string(), "missing".to_string()];
        let scorer = RowScorer::new(&profile, &bad_columns, ScoreWeights::from_options(&options));
        assert!(scorer.score_all(&rows).is_err());
    }

    #[test]
    fn test_content_weight_folds_when_patterns_disabled() {
        let (rows, columns) = make_rows();
        let options = SamplingOptions::default().with_pattern_analysis(false);
        let profile = scorer_fixture(&rows, &columns, &options);
        let scorer = RowScorer::new(&profile, &columns, ScoreWeights::from_options(&options));

        let scores = scorer.score_all(&rows).unwrap();
        for score in &scores {
            assert_eq!(score.content, 0.0);
        }
        // Ranking is still driven by completeness and diversity.
        assert!(scores[2].combined > scores[1].combined);
    }

    #[test]
    fn test_value_richness_boosts() {
        assert!((value_richness("short") - 0.5).abs() < 1e-9);
        assert!(value_richness("https://example.com/page") > 0.5);
        let essay = "This sentence has more than ten words in it, which is quite a lot of words.";
        assert!(value_richness(essay) > 0.8);
        assert!(value_richness(essay) <= 1.0);
    }
}
