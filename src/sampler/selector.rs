//! Greedy diversity-constrained row selection with guaranteed backfill.
//!
//! Candidates are visited in combined-score order (descending, ties broken by
//! original index ascending). A candidate is accepted when the selection is
//! empty or its mean pairwise diversity against every already-selected row
//! meets the configured threshold. If the greedy pass under-selects, the
//! selector backfills by striding across the dataset and then sequentially,
//! so the output always reaches `min(max_samples, dataset_size)` distinct
//! indices.
//!
//! The greedy comparison is O(n²) in the candidate count, so the candidate
//! pool is capped; rows beyond the cap remain reachable through backfill.

use std::collections::HashSet;

use tracing::debug;

use crate::error::SamplerResult;
use crate::record::{cell_text, Row};
use crate::sampler::scorer::RowScore;
use crate::sampler::SamplingOptions;

/// How the final sample was produced.
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// Greedy score-and-diversity selection ran to completion.
    Scored(Vec<usize>),
    /// Sequential head sample, taken verbatim (small dataset or forced).
    Sequential(Vec<usize>),
    /// Internal failure degraded to the sequential construction.
    Fallback(Vec<usize>),
}

impl SelectionOutcome {
    /// The selected row indices, regardless of how they were produced.
    pub fn indices(&self) -> &[usize] {
        match self {
            SelectionOutcome::Scored(indices)
            | SelectionOutcome::Sequential(indices)
            | SelectionOutcome::Fallback(indices) => indices,
        }
    }
}

/// The first `count` row indices. Shared by the sequential and fallback
/// paths so there is exactly one fallback construction.
pub fn sequential_indices(count: usize) -> Vec<usize> {
    (0..count).collect()
}

/// Greedy selector enforcing a minimum pairwise diversity threshold.
pub struct DiverseSelector<'a> {
    options: &'a SamplingOptions,
}

impl<'a> DiverseSelector<'a> {
    pub fn new(options: &'a SamplingOptions) -> Self {
        Self { options }
    }

    /// Run the greedy pass over scored candidates, then backfill to the
    /// target count.
    ///
    /// `scores` must cover every row; `target` must not exceed the dataset
    /// size.
    pub fn select(
        &self,
        rows: &[Row],
        columns: &[String],
        scores: &[RowScore],
        target: usize,
    ) -> SamplerResult<Vec<usize>> {
        let mut candidates: Vec<&RowScore> = scores.iter().collect();
        candidates.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        let pool = self.options.candidate_pool_limit.max(target);
        candidates.truncate(pool);

        let mut selected: Vec<usize> = Vec::with_capacity(target);
        for candidate in candidates {
            if selected.len() >= target {
                break;
            }
            if selected.is_empty()
                || self.mean_diversity_against(&rows[candidate.index], &selected, rows, columns)
                    >= self.options.diversity_threshold
            {
                selected.push(candidate.index);
            }
        }

        let greedy_count = selected.len();
        if greedy_count < target {
            backfill(&mut selected, rows.len(), target);
            debug!(
                greedy = greedy_count,
                backfilled = target - greedy_count,
                "Greedy pass under-selected; backfilled to target"
            );
        }

        Ok(selected)
    }

    fn mean_diversity_against(
        &self,
        candidate: &Row,
        selected: &[usize],
        rows: &[Row],
        columns: &[String],
    ) -> f64 {
        let total: f64 = selected
            .iter()
            .map(|&index| row_diversity(candidate, &rows[index], columns))
            .sum();
        total / selected.len() as f64
    }
}

/// Fill `selected` up to `target` distinct indices: first by striding across
/// the dataset, then sequentially over whatever remains.
fn backfill(selected: &mut Vec<usize>, dataset_size: usize, target: usize) {
    let chosen: HashSet<usize> = selected.iter().copied().collect();
    let mut chosen = chosen;

    let needed = target.saturating_sub(selected.len());
    if needed > 0 {
        let step = (dataset_size / needed).max(1);
        let mut index = 0;
        while index < dataset_size && selected.len() < target {
            if chosen.insert(index) {
                selected.push(index);
            }
            index += step;
        }
    }

    let mut index = 0;
    while selected.len() < target && index < dataset_size {
        if chosen.insert(index) {
            selected.push(index);
        }
        index += 1;
    }
}

/// Pairwise diversity between two rows, normalized to [0, 1].
///
/// Per column: identical values score 0, one-sided substring containment
/// scores 0.5 (partially similar), disjoint values score 1. A cell present on
/// one side only scores 1; both absent scores 0.
pub fn row_diversity(a: &Row, b: &Row, columns: &[String]) -> f64 {
    if columns.is_empty() {
        return 0.0;
    }
    let total: f64 = columns
        .iter()
        .map(|column| {
            let left = cell_text(a, column);
            let right = cell_text(b, column);
            match (left, right) {
                (None, None) => 0.0,
                (Some(_), None) | (None, Some(_)) => 1.0,
                (Some(left), Some(right)) => value_difference(&left, &right),
            }
        })
        .sum();
    total / columns.len() as f64
}

/// Difference between two present values.
fn value_difference(left: &str, right: &str) -> f64 {
    if left == right {
        0.0
    } else if left.contains(right) || right.contains(left) {
        // Containment counts as half-similar, not identical, not disjoint.
        0.5
    } else {
        1.0
    }
}

/// Mean pairwise diversity across a final sample; 0 for fewer than two rows.
pub fn sample_diversity(sample: &[&Row], columns: &[String]) -> f64 {
    if sample.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..sample.len() {
        for j in (i + 1)..sample.len() {
            total += row_diversity(sample[i], sample[j], columns);
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// Mean row completeness across a final sample.
pub fn sample_completeness(sample: &[&Row], columns: &[String]) -> f64 {
    if sample.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let total: f64 = sample
        .iter()
        .map(|row| {
            let present = columns
                .iter()
                .filter(|column| cell_text(row, column).is_some())
                .count();
            present as f64 / columns.len() as f64
        })
        .sum();
    total / sample.len() as f64
}
