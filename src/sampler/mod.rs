//! Row sampling: representative, diverse, complete subsets of a dataset.
//!
//! The sampler runs four stages in sequence:
//!
//! 1. [`DatasetProfiler`](profiler::DatasetProfiler) computes per-column
//!    statistics over the full dataset,
//! 2. [`RowScorer`](scorer::RowScorer) scores every row on completeness,
//!    diversity, and content richness,
//! 3. [`DiverseSelector`](selector::DiverseSelector) greedily picks rows
//!    under a minimum pairwise-diversity threshold and backfills to the
//!    target count,
//! 4. [`PatternDetector`](patterns::PatternDetector) tags the chosen sample
//!    with coarse content patterns.
//!
//! Sampling never fails: small datasets and the `force_sequential` escape
//! hatch take the head of the dataset verbatim, and any internal error
//! degrades to the same sequential construction tagged as `fallback`.
//!
//! # Example
//!
//! ```rust
//! use evalscout::sampler::{RowSampler, SamplingOptions};
//! use serde_json::json;
//!
//! let rows: Vec<evalscout::Row> = (0..100)
//!     .map(|i| {
//!         let mut row = evalscout::Row::new();
//!         row.insert("question".to_string(), json!(format!("Question {i}?")));
//!         row.insert("answer".to_string(), json!(format!("Answer text {i}")));
//!         row
//!     })
//!     .collect();
//! let columns = vec!["question".to_string(), "answer".to_string()];
//!
//! let sampler = RowSampler::new(SamplingOptions::default().with_max_samples(10));
//! let (sample, metadata) = sampler.sample(&rows, &columns);
//!
//! assert_eq!(sample.len(), 10);
//! println!("strategy: {}, diversity: {:.2}", metadata.strategy, metadata.diversity_score);
//! ```

pub mod patterns;
pub mod profiler;
pub mod scorer;
pub mod selector;

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::record::Row;
use patterns::{ContentPattern, MediaHints, PatternDetector};
use profiler::DatasetProfiler;
use scorer::{RowScorer, ScoreWeights};
use selector::{
    sample_completeness, sample_diversity, sequential_indices, DiverseSelector, SelectionOutcome,
};

/// Options controlling row sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Maximum number of rows to select.
    pub max_samples: usize,
    /// Minimum mean pairwise diversity a candidate must keep against the
    /// already-selected rows.
    pub diversity_threshold: f64,
    /// Weigh completeness at 0.4 instead of 0.2 when combining row scores.
    pub prioritize_completeness: bool,
    /// Compute content-richness scores and pattern tags.
    pub enable_pattern_analysis: bool,
    /// Skip scoring entirely and take the head of the dataset.
    pub force_sequential: bool,
    /// Cap on the greedy candidate pool; the O(n²) diversity comparison
    /// never runs over more candidates than this.
    pub candidate_pool_limit: usize,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            max_samples: 10,
            diversity_threshold: 0.3,
            prioritize_completeness: true,
            enable_pattern_analysis: true,
            force_sequential: false,
            candidate_pool_limit: 200,
        }
    }
}

impl SamplingOptions {
    /// Sets the maximum number of rows to select.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Sets the pairwise diversity threshold, clamped to [0, 1].
    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Sets whether completeness is weighted more heavily than the baseline.
    pub fn with_prioritize_completeness(mut self, enabled: bool) -> Self {
        self.prioritize_completeness = enabled;
        self
    }

    /// Enables or disables pattern analysis and content scoring.
    pub fn with_pattern_analysis(mut self, enabled: bool) -> Self {
        self.enable_pattern_analysis = enabled;
        self
    }

    /// Forces sequential head sampling, skipping scoring entirely.
    pub fn with_force_sequential(mut self, enabled: bool) -> Self {
        self.force_sequential = enabled;
        self
    }

    /// Sets the greedy candidate pool cap.
    pub fn with_candidate_pool_limit(mut self, limit: usize) -> Self {
        self.candidate_pool_limit = limit.max(1);
        self
    }
}

/// How the sample was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// Scored greedy selection with diversity enforcement.
    Intelligent,
    /// Head of the dataset, taken verbatim.
    Sequential,
    /// Sequential construction used because scoring failed or input was
    /// degenerate.
    Fallback,
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SamplingStrategy::Intelligent => "intelligent",
            SamplingStrategy::Sequential => "sequential",
            SamplingStrategy::Fallback => "fallback",
        };
        f.write_str(tag)
    }
}

/// Metadata describing the final sample, recomputed on the chosen rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    /// Original indices of the selected rows.
    pub selected_indices: Vec<usize>,
    /// Mean pairwise diversity across the final sample.
    pub diversity_score: f64,
    /// Mean row completeness across the final sample.
    pub completeness_score: f64,
    /// Content-pattern tags detected on the sample.
    pub content_patterns: BTreeSet<ContentPattern>,
    /// Video/image hints detected on the sample.
    pub media_hints: MediaHints,
    /// How the sample was produced.
    pub strategy: SamplingStrategy,
    /// Wall-clock time spent sampling.
    pub elapsed_ms: u64,
}

/// Entry point for row sampling.
#[derive(Debug, Clone, Default)]
pub struct RowSampler {
    options: SamplingOptions,
}

impl RowSampler {
    pub fn new(options: SamplingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    /// Select `min(max_samples, rows.len())` rows and describe the sample.
    ///
    /// This never fails and never panics on degenerate input; see the module
    /// docs for the fallback behavior.
    #[instrument(skip(self, rows, columns), fields(rows = rows.len(), columns = columns.len()))]
    pub fn sample(&self, rows: &[Row], columns: &[String]) -> (Vec<Row>, SampleMetadata) {
        let start = Instant::now();
        let outcome = self.select_indices(rows, columns);
        let (strategy, indices) = match outcome {
            SelectionOutcome::Scored(indices) => (SamplingStrategy::Intelligent, indices),
            SelectionOutcome::Sequential(indices) => (SamplingStrategy::Sequential, indices),
            SelectionOutcome::Fallback(indices) => (SamplingStrategy::Fallback, indices),
        };

        let sample: Vec<Row> = indices.iter().map(|&index| rows[index].clone()).collect();
        let sample_refs: Vec<&Row> = sample.iter().collect();

        let detector = PatternDetector::new();
        let (content_patterns, media_hints) = if self.options.enable_pattern_analysis {
            (
                detector.detect(&sample, columns),
                detector.media_hints(&sample, columns),
            )
        } else {
            (BTreeSet::new(), MediaHints::default())
        };

        let metadata = SampleMetadata {
            diversity_score: sample_diversity(&sample_refs, columns),
            completeness_score: sample_completeness(&sample_refs, columns),
            selected_indices: indices,
            content_patterns,
            media_hints,
            strategy,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        (sample, metadata)
    }

    fn select_indices(&self, rows: &[Row], columns: &[String]) -> SelectionOutcome {
        if rows.is_empty() {
            return SelectionOutcome::Fallback(Vec::new());
        }

        let target = self.options.max_samples.min(rows.len());

        if self.options.force_sequential || rows.len() <= self.options.max_samples {
            return SelectionOutcome::Sequential(sequential_indices(target));
        }

        let profile = DatasetProfiler::new().profile(rows, columns);
        let weights = ScoreWeights::from_options(&self.options);
        let scored = RowScorer::new(&profile, columns, weights)
            .score_all(rows)
            .and_then(|scores| {
                DiverseSelector::new(&self.options).select(rows, columns, &scores, target)
            });

        match scored {
            Ok(indices) => SelectionOutcome::Scored(indices),
            Err(error) => {
                warn!(%error, "Scored selection failed; degrading to sequential fallback");
                SelectionOutcome::Fallback(sequential_indices(target))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(count: usize) -> (Vec<Row>, Vec<String>) {
        let rows = (0..count)
            .map(|i| {
                let mut row = Row::new();
                row.insert("prompt".to_string(), json!(format!("Prompt number {i}?")));
                row.insert(
                    "reply".to_string(),
                    json!(format!(
                        "A considered reply to prompt {i} with unique phrasing {i}, expanded \
                         with enough supporting detail to pass the hundred character mark."
                    )),
                );
                row
            })
            .collect();
        (rows, vec!["prompt".to_string(), "reply".to_string()])
    }

    #[test]
    fn test_sample_size_invariant() {
        let (rows, columns) = dataset(50);
        let sampler = RowSampler::new(SamplingOptions::default().with_max_samples(8));
        let (sample, metadata) = sampler.sample(&rows, &columns);

        assert_eq!(sample.len(), 8);
        assert_eq!(metadata.selected_indices.len(), 8);
        assert_eq!(metadata.strategy, SamplingStrategy::Intelligent);
    }

    #[test]
    fn test_small_dataset_is_sequential() {
        let (rows, columns) = dataset(3);
        let sampler = RowSampler::new(SamplingOptions::default().with_max_samples(10));
        let (sample, metadata) = sampler.sample(&rows, &columns);

        assert_eq!(sample.len(), 3);
        assert_eq!(metadata.strategy, SamplingStrategy::Sequential);
        assert_eq!(metadata.selected_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_force_sequential() {
        let (rows, columns) = dataset(50);
        let sampler = RowSampler::new(
            SamplingOptions::default()
                .with_max_samples(5)
                .with_force_sequential(true),
        );
        let (sample, metadata) = sampler.sample(&rows, &columns);

        assert_eq!(sample.len(), 5);
        assert_eq!(metadata.strategy, SamplingStrategy::Sequential);
        assert_eq!(metadata.selected_indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_dataset_is_fallback() {
        let sampler = RowSampler::default();
        let (sample, metadata) = sampler.sample(&[], &["a".to_string()]);

        assert!(sample.is_empty());
        assert_eq!(metadata.strategy, SamplingStrategy::Fallback);
        assert_eq!(metadata.diversity_score, 0.0);
        assert_eq!(metadata.completeness_score, 0.0);
    }

    #[test]
    fn test_metadata_recomputed_on_final_sample() {
        let (rows, columns) = dataset(40);
        let sampler = RowSampler::new(SamplingOptions::default().with_max_samples(6));
        let (_, metadata) = sampler.sample(&rows, &columns);

        assert!(metadata.diversity_score > 0.0);
        assert!(metadata.completeness_score > 0.99);
        assert!(metadata.content_patterns.contains(&ContentPattern::LongText));
    }

    #[test]
    fn test_pattern_analysis_disabled_yields_no_tags() {
        let (rows, columns) = dataset(40);
        let sampler =
            RowSampler::new(SamplingOptions::default().with_pattern_analysis(false));
        let (_, metadata) = sampler.sample(&rows, &columns);

        assert!(metadata.content_patterns.is_empty());
        assert_eq!(metadata.media_hints, MediaHints::default());
    }

    #[test]
    fn test_determinism() {
        let (rows, columns) = dataset(60);
        let sampler = RowSampler::new(SamplingOptions::default().with_max_samples(7));
        let (first, first_meta) = sampler.sample(&rows, &columns);
        let (second, second_meta) = sampler.sample(&rows, &columns);

        assert_eq!(first, second);
        assert_eq!(first_meta.selected_indices, second_meta.selected_indices);
        assert_eq!(first_meta.strategy, second_meta.strategy);
    }

    #[test]
    fn test_strategy_serde_spelling() {
        let json = serde_json::to_string(&SamplingStrategy::Intelligent).unwrap();
        assert_eq!(json, "\"intelligent\"");
    }
}
