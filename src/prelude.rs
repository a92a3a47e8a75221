//! Convenience re-exports for the common entry points.
//!
//! ```rust
//! use evalscout::prelude::*;
//! ```

pub use crate::analysis::{analyze, sample, AnalysisResult, DatasetAnalyzer};
pub use crate::classifier::{
    ColumnAnalysis, ColumnRole, ColumnRoleClassifier, CriteriaGenerator, Criterion, CriterionSpec,
    CriterionType, NameGenerator,
};
pub use crate::error::{SamplerError, SamplerResult};
pub use crate::record::Row;
pub use crate::sampler::patterns::{ContentPattern, MediaHints};
pub use crate::sampler::{RowSampler, SampleMetadata, SamplingOptions, SamplingStrategy};
