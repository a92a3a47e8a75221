//! The analysis facade: sample, classify, and the combined `analyze` call.
//!
//! [`DatasetAnalyzer`] composes the sampler and classifier into the single
//! entry point callers use when standing in for a remote analyzer: it always
//! returns a fully-populated [`AnalysisResult`], even for empty input, and
//! never returns an error.
//!
//! # Example
//!
//! ```rust
//! use evalscout::{analyze, SamplingOptions};
//! use serde_json::json;
//!
//! let mut row = evalscout::Row::new();
//! row.insert("question".to_string(), json!("What is the boiling point of water?"));
//! row.insert("answer".to_string(), json!("100 degrees Celsius at sea level."));
//!
//! let result = analyze(
//!     &[row],
//!     &["question".to_string(), "answer".to_string()],
//!     SamplingOptions::default(),
//! );
//!
//! assert_eq!(result.column_analysis.len(), 2);
//! assert_eq!(result.suggested_metrics.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::classifier::{
    ColumnAnalysis, ColumnRoleClassifier, CriteriaGenerator, Criterion, CriterionSpec,
    NameGenerator,
};
use crate::record::Row;
use crate::sampler::{RowSampler, SampleMetadata, SamplingOptions};

/// The complete, externally visible analysis output.
///
/// Always fully populated: degenerate input still yields the three default
/// criteria, the default evaluation name, and generic instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// One analysis per input column, in input order.
    pub column_analysis: Vec<ColumnAnalysis>,
    /// Exactly three criteria: Likert, yes/no, free text.
    pub suggested_metrics: Vec<Criterion>,
    /// The same criteria in the older `description`-carrying shape.
    pub criteria: Vec<CriterionSpec>,
    /// Short evaluation title.
    pub evaluation_name: String,
    /// Rater instructions.
    pub instructions: String,
    /// How the sample behind this analysis was produced.
    pub sampling: SampleMetadata,
}

/// Composes sampling and classification behind one synchronous call.
#[derive(Default)]
pub struct DatasetAnalyzer {
    sampler: RowSampler,
    classifier: ColumnRoleClassifier,
    criteria: CriteriaGenerator,
    naming: NameGenerator,
}

impl DatasetAnalyzer {
    /// Analyzer with the given sampling options and the standard rule
    /// cascade.
    pub fn new(options: SamplingOptions) -> Self {
        Self {
            sampler: RowSampler::new(options),
            classifier: ColumnRoleClassifier::new(),
            criteria: CriteriaGenerator::new(),
            naming: NameGenerator::new(),
        }
    }

    /// Replaces the classifier, keeping the sampling options.
    pub fn with_classifier(mut self, classifier: ColumnRoleClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Select a representative subset of rows. Never fails.
    pub fn sample(&self, rows: &[Row], columns: &[String]) -> (Vec<Row>, SampleMetadata) {
        self.sampler.sample(rows, columns)
    }

    /// Classify the sampled rows and derive evaluation metadata.
    ///
    /// `metadata` is the sampler's description of the sample; its patterns,
    /// diversity score, and strategy all feed the classification.
    #[instrument(skip(self, rows, columns, metadata), fields(columns = columns.len()))]
    pub fn classify(
        &self,
        rows: &[Row],
        columns: &[String],
        metadata: &SampleMetadata,
    ) -> AnalysisResult {
        let column_analysis = self.classifier.classify(rows, columns, metadata);

        let suggested_metrics = self
            .criteria
            .generate(&metadata.content_patterns, metadata.media_hints);
        let criteria = suggested_metrics.iter().map(CriterionSpec::from).collect();

        let evaluation_name = self.naming.evaluation_name(
            &column_analysis,
            &metadata.content_patterns,
            metadata.media_hints,
        );
        let instructions = self.naming.instructions(
            &metadata.content_patterns,
            metadata.media_hints,
            metadata.diversity_score,
        );

        info!(
            columns = column_analysis.len(),
            evaluation_name = %evaluation_name,
            "Classified dataset columns"
        );

        AnalysisResult {
            column_analysis,
            suggested_metrics,
            criteria,
            evaluation_name,
            instructions,
            sampling: metadata.clone(),
        }
    }

    /// Sample, then classify: the one-call form.
    #[instrument(skip(self, rows, columns), fields(rows = rows.len(), columns = columns.len()))]
    pub fn analyze(&self, rows: &[Row], columns: &[String]) -> AnalysisResult {
        let (sample, metadata) = self.sample(rows, columns);
        self.classify(&sample, columns, &metadata)
    }
}

/// Sample with the given options. Convenience over [`DatasetAnalyzer`].
pub fn sample(
    rows: &[Row],
    columns: &[String],
    options: SamplingOptions,
) -> (Vec<Row>, SampleMetadata) {
    DatasetAnalyzer::new(options).sample(rows, columns)
}

/// Analyze with the given options. Convenience over [`DatasetAnalyzer`].
pub fn analyze(rows: &[Row], columns: &[String], options: SamplingOptions) -> AnalysisResult {
    DatasetAnalyzer::new(options).analyze(rows, columns)
}
