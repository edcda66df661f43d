//! # evalkit
//!
//! Evaluate arbitrary prediction pipelines against labelled datasets.
//!
//! A pipeline, whatever framework it runs on, is wrapped in an [`traits::Adapter`] that declares
//! the task it performs and returns one record with a `label` per input. An evaluator checks the
//! adapter against its task, invokes it once over the dataset, validates what comes back and
//! feeds the labels to a metric.
//!
//! ## Features
//!
//! - Text and image classification evaluators, with `sentiment-analysis` as an alias
//! - Accuracy, precision, recall and f1 with binary, micro, macro and weighted averaging
//! - Bring your own metrics by implementing [`traits::Metric`]
//! - Bootstrapped confidence intervals with a reproducible seed
//! - Datasets in memory or loaded by name from json files
//! - `tracing` spans and events for every evaluation
//!
//! ## Example
//!
//! ```no_run
//! # use anyhow::Result;
//! # use evalkit::{Dataset, PredictionRecord, traits::FnAdapter};
//! # use evalkit::evaluator::{ComputeConfig, Evaluator as _, evaluator};
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let pipeline = FnAdapter::new("sentiment-analysis", |inputs, _options| {
//!     Ok(inputs
//!         .iter()
//!         .map(|_| PredictionRecord::from_label("POSITIVE"))
//!         .collect())
//! });
//!
//! let result = evaluator("text-classification")?
//!     .compute(
//!         &pipeline,
//!         Dataset::from_path("imdb.jsonl")?.into(),
//!         &ComputeConfig::builder()
//!             .metric("f1")
//!             .label_mapping([("NEGATIVE", 0), ("POSITIVE", 1)])
//!             .build()?,
//!     )
//!     .await?;
//!
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
#![doc = document_features::document_features!()]

#[doc(inline)]
pub use evalkit_core::{
    DataSource, Dataset, EvaluationResult, Input, Label, MetricResult, PredictionOptions,
    PredictionRecord,
};

/// Errors raised while evaluating
pub mod errors {
    #[doc(inline)]
    pub use evalkit_core::errors::*;
}

/// Traits to implement for your own pipelines, metrics and dataset sources
pub mod traits {
    #[doc(inline)]
    pub use evalkit_core::{Adapter, DatasetLoader, FnAdapter, JsonDatasetLoader, Metric};
}

/// Built-in metrics and the registry to look them up by name
pub mod metrics {
    #[doc(inline)]
    pub use evalkit_metrics::*;
}

/// Evaluators, their configuration and the task registry
pub mod evaluator {
    #[doc(inline)]
    pub use evalkit_evaluator::*;
}

pub mod prelude {
    pub use evalkit_core::prelude::*;
}
