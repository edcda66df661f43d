//! Tasks the evaluator understands and their defaults.
use std::str::FromStr as _;

use evalkit_core::EvaluationError;
use strum::IntoEnumIterator as _;

/// A prediction task.
///
/// Parsing accepts the canonical kebab-case names and the `sentiment-analysis` alias for text
/// classification, case insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Task {
    #[strum(to_string = "text-classification", serialize = "sentiment-analysis")]
    TextClassification,
    ImageClassification,
}

impl Task {
    /// Resolves a task name or alias
    pub fn resolve(name: &str) -> Option<Task> {
        Task::from_str(name.trim()).ok()
    }

    pub fn default_metric_name(self) -> &'static str {
        match self {
            Task::TextClassification | Task::ImageClassification => "accuracy",
        }
    }

    pub fn default_input_column(self) -> &'static str {
        match self {
            Task::TextClassification => "text",
            Task::ImageClassification => "image",
        }
    }

    pub fn default_label_column(self) -> &'static str {
        match self {
            Task::TextClassification => "label",
            Task::ImageClassification => "labels",
        }
    }
}

/// What a task resolves to when building an evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDefaults {
    pub task: Task,
    pub default_metric_name: &'static str,
}

/// Canonical names of every supported task
pub fn supported_tasks() -> Vec<String> {
    Task::iter().map(|task| task.to_string()).collect()
}

/// Validates a task name, resolving aliases, and returns its defaults
///
/// # Errors
///
/// Errors with [`EvaluationError::UnknownTask`] if the task is not supported
pub fn check_task(name: &str) -> Result<TaskDefaults, EvaluationError> {
    let task = Task::resolve(name).ok_or_else(|| EvaluationError::UnknownTask {
        task: name.to_string(),
        available: supported_tasks(),
    })?;

    Ok(TaskDefaults {
        task,
        default_metric_name: task.default_metric_name(),
    })
}
