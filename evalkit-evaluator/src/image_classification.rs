use crate::{
    evaluator::{Evaluator, EvaluatorSettings},
    task::Task,
};

/// Evaluates image classification adapters.
///
/// Reads the `image` column as input and the `labels` column as references by default. Image
/// pipelines commonly rank several candidates per image; the adapter is expected to reduce them
/// to one record per image, for instance with [`evalkit_core::PredictionRecord::top_scoring`].
#[derive(Debug, Clone, Default)]
pub struct ImageClassificationEvaluator {
    settings: EvaluatorSettings,
}

impl ImageClassificationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: EvaluatorSettings) -> Self {
        Self { settings }
    }

    /// An evaluator that falls back to `accuracy`
    pub fn with_default_metric() -> Self {
        Self::from_settings(EvaluatorSettings {
            default_metric_name: Some(Task::ImageClassification.default_metric_name().to_string()),
            ..EvaluatorSettings::default()
        })
    }
}

impl Evaluator for ImageClassificationEvaluator {
    fn task(&self) -> Task {
        Task::ImageClassification
    }

    fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }
}
