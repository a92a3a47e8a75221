//! # evalscout
//!
//! Offline dataset sampling and column-role classification for evaluation
//! bootstrapping.
//!
//! Given a dataset as rows of JSON objects, `evalscout` selects a small,
//! diverse, representative sample and classifies each column into a semantic
//! role (input, model output, metadata, segment, excluded). From the
//! classification it derives a ready-to-edit evaluation scaffold: three
//! criteria, an evaluation name, and rater instructions. Everything runs
//! locally and deterministically; no network, no randomness.
//!
//! ## Quick start
//!
//! ```rust
//! use evalscout::{analyze, Row, SamplingOptions};
//! use serde_json::json;
//!
//! let rows: Vec<Row> = (0..50)
//!     .map(|i| {
//!         let mut row = Row::new();
//!         row.insert("question".to_string(), json!(format!("Question {i}?")));
//!         row.insert("answer".to_string(), json!(format!("A detailed answer to question {i}.")));
//!         row
//!     })
//!     .collect();
//! let columns = vec!["question".to_string(), "answer".to_string()];
//!
//! let result = analyze(&rows, &columns, SamplingOptions::default());
//!
//! assert_eq!(result.column_analysis.len(), 2);
//! assert_eq!(result.suggested_metrics.len(), 3);
//! assert!(result.sampling.selected_indices.len() <= 10);
//! ```
//!
//! ## Modules
//!
//! - [`sampler`]: profiling, row scoring, greedy diverse selection, and
//!   content pattern detection.
//! - [`classifier`]: the role rule cascade, role guarantees, criteria
//!   generation, and name synthesis.
//! - [`analysis`]: the [`DatasetAnalyzer`] facade tying both together.

pub mod analysis;
pub mod classifier;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod record;
pub mod sampler;

pub use analysis::{analyze, sample, AnalysisResult, DatasetAnalyzer};
pub use error::{SamplerError, SamplerResult};
pub use record::Row;
pub use sampler::{SampleMetadata, SamplingOptions, SamplingStrategy};
