use crate::{
    evaluator::{Evaluator, EvaluatorSettings},
    task::Task,
};

/// Evaluates text classification adapters.
///
/// Reads the `text` column as input and the `label` column as references unless the compute
/// config names other columns. Built with `default()` there is no default metric; use
/// [`TextClassificationEvaluator::with_default_metric`] or [`crate::evaluator`] to get one.
#[derive(Debug, Clone, Default)]
pub struct TextClassificationEvaluator {
    settings: EvaluatorSettings,
}

impl TextClassificationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: EvaluatorSettings) -> Self {
        Self { settings }
    }

    /// An evaluator that falls back to `accuracy`
    pub fn with_default_metric() -> Self {
        Self::from_settings(EvaluatorSettings {
            default_metric_name: Some(Task::TextClassification.default_metric_name().to_string()),
            ..EvaluatorSettings::default()
        })
    }
}

impl Evaluator for TextClassificationEvaluator {
    fn task(&self) -> Task {
        Task::TextClassification
    }

    fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }
}
