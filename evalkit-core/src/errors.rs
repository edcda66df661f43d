use serde_json::Value;
use thiserror::Error;

/// The adapter does not satisfy the contract required to be evaluated.
///
/// Raised before the adapter is invoked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("adapter does not declare a task")]
    MissingTask,

    #[error("adapter task `{actual}` is not compatible with the `{expected}` task")]
    IncompatibleTask { expected: String, actual: String },
}

/// The adapter returned records that cannot be paired with the references.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultShapeError {
    #[error("adapter returned {actual} predictions for {expected} inputs")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("prediction at index {index} has no `label` key")]
    MissingLabel { index: usize },

    #[error("prediction at index {index} has an invalid label: {value}")]
    InvalidLabel { index: usize, value: Value },
}

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    ResultShape(#[from] ResultShapeError),

    #[error("unknown task `{task}`, available tasks are: {}", .available.join(", "))]
    UnknownTask {
        task: String,
        available: Vec<String>,
    },

    #[error("unknown metric `{name}`, available metrics are: {}", .available.join(", "))]
    UnknownMetric {
        name: String,
        available: Vec<String>,
    },

    #[error("evaluator does not specify a default metric, please provide one")]
    MissingDefaultMetric,

    #[error("invalid {kind} column `{column}`, the dataset contains: {}", .available.join(", "))]
    InvalidColumn {
        kind: &'static str,
        column: String,
        available: Vec<String>,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("predicted label `{label}` at index {index} is missing from the label mapping")]
    UnmappedLabel { index: usize, label: String },

    #[error("reference at index {index} is not a valid label: {value}")]
    InvalidReference { index: usize, value: Value },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load dataset: {0:#}")]
    DatasetFailed(anyhow::Error),

    #[error("adapter failed to predict: {0:#}")]
    AdapterFailed(anyhow::Error),

    #[error("metric failed to compute: {0:#}")]
    MetricFailed(anyhow::Error),
}

impl EvaluationError {
    pub fn is_contract_error(&self) -> bool {
        matches!(self, EvaluationError::Contract(_))
    }

    pub fn is_result_shape_error(&self) -> bool {
        matches!(self, EvaluationError::ResultShape(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages() {
        insta::assert_snapshot!(
            EvaluationError::from(ResultShapeError::LengthMismatch { expected: 2, actual: 1 }).to_string(),
            @"adapter returned 1 predictions for 2 inputs"
        );
        insta::assert_snapshot!(
            EvaluationError::from(ResultShapeError::InvalidLabel { index: 3, value: json!([1]) }).to_string(),
            @"prediction at index 3 has an invalid label: [1]"
        );
        insta::assert_snapshot!(
            EvaluationError::UnknownTask {
                task: "bad_task".into(),
                available: vec!["text-classification".into(), "image-classification".into()],
            }
            .to_string(),
            @"unknown task `bad_task`, available tasks are: text-classification, image-classification"
        );
        insta::assert_snapshot!(
            EvaluationError::AdapterFailed(anyhow::anyhow!("model offline").context("inference"))
                .to_string(),
            @"adapter failed to predict: inference: model offline"
        );
    }

    #[test]
    fn test_classification() {
        assert!(EvaluationError::from(ContractError::MissingTask).is_contract_error());
        assert!(
            EvaluationError::from(ResultShapeError::MissingLabel { index: 0 })
                .is_result_shape_error()
        );
        assert!(!EvaluationError::EmptyDataset.is_contract_error());
    }
}
