#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Evaluates prediction pipelines against labelled datasets.
//!
//! Get an evaluator for a task with [`evaluator`], wrap the pipeline in an
//! [`evalkit_core::Adapter`] and call [`Evaluator::compute`]:
//!
//! ```no_run
//! # use evalkit_core::{Dataset, FnAdapter, PredictionRecord};
//! # use evalkit_evaluator::{ComputeConfig, Evaluator as _, evaluator};
//! # async fn run() -> anyhow::Result<()> {
//! let adapter = FnAdapter::new("text-classification", |inputs, _options| {
//!     Ok(inputs.iter().map(|_| PredictionRecord::from_label(1)).collect())
//! });
//! let dataset = Dataset::from_json_str(r#"{"text": ["great movie"], "label": [1]}"#)?;
//!
//! let result = evaluator("text-classification")?
//!     .compute(&adapter, dataset.into(), &ComputeConfig::default())
//!     .await?;
//! assert_eq!(result.score("accuracy"), Some(1.0));
//! # Ok(())
//! # }
//! ```
mod bootstrap;
mod config;
pub mod contract;
mod evaluator;
mod image_classification;
mod task;
mod text_classification;

use evalkit_core::EvaluationError;

pub use bootstrap::Bootstrap;
pub use config::{
    ComputeConfig, ComputeConfigBuilder, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_N_RESAMPLES,
    IntervalMethod, MAX_N_RESAMPLES, Strategy,
};
pub use evaluator::{Evaluator, EvaluatorSettings, EvaluatorSettingsBuilder};
pub use image_classification::ImageClassificationEvaluator;
pub use task::{Task, TaskDefaults, check_task, supported_tasks};
pub use text_classification::TextClassificationEvaluator;

/// Builds the evaluator for a task, configured with the task's default metric
///
/// # Errors
///
/// Errors with [`EvaluationError::UnknownTask`] if the task is not supported
pub fn evaluator(task: &str) -> Result<Box<dyn Evaluator>, EvaluationError> {
    let defaults = check_task(task)?;
    tracing::debug!(
        task = %defaults.task,
        metric = defaults.default_metric_name,
        "building evaluator"
    );

    Ok(match defaults.task {
        Task::TextClassification => Box::new(TextClassificationEvaluator::with_default_metric()),
        Task::ImageClassification => Box::new(ImageClassificationEvaluator::with_default_metric()),
    })
}
