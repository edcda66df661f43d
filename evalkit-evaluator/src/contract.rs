//! Checks around the adapter invocation.
//!
//! The adapter is checked before it is invoked, its records right after. Nothing reaches a
//! metric unless every record carries a valid label and there is exactly one record per input.
use std::collections::BTreeMap;

use evalkit_core::{
    Adapter, ContractError, EvaluationError, Label, PredictionRecord, ResultShapeError,
};
use serde_json::Value;

use crate::task::Task;

/// Checks the task an adapter declares against the task being evaluated
///
/// # Errors
///
/// Errors with [`ContractError::MissingTask`] if the adapter declares no task and with
/// [`ContractError::IncompatibleTask`] if it resolves to a different task
pub fn validate_adapter(adapter: &dyn Adapter, expected: Task) -> Result<(), ContractError> {
    let declared = adapter.task().trim();
    if declared.is_empty() {
        return Err(ContractError::MissingTask);
    }

    match Task::resolve(declared) {
        Some(task) if task == expected => Ok(()),
        _ => Err(ContractError::IncompatibleTask {
            expected: expected.to_string(),
            actual: declared.to_string(),
        }),
    }
}

/// Extracts one label per input from the records the adapter returned
///
/// # Errors
///
/// Errors if the number of records differs from `expected`, or a record has a missing or invalid
/// label
pub fn extract_labels(
    records: &[PredictionRecord],
    expected: usize,
) -> Result<Vec<Label>, ResultShapeError> {
    if records.len() != expected {
        return Err(ResultShapeError::LengthMismatch {
            expected,
            actual: records.len(),
        });
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let value = record
                .label()
                .ok_or(ResultShapeError::MissingLabel { index })?;

            Label::from_value(value).ok_or_else(|| ResultShapeError::InvalidLabel {
                index,
                value: value.clone(),
            })
        })
        .collect()
}

/// Maps predicted labels onto dataset labels
///
/// Labels are looked up by their display form, so `1` and `"1"` share a mapping entry.
///
/// # Errors
///
/// Errors with [`EvaluationError::UnmappedLabel`] on the first label without a mapping
pub fn apply_label_mapping(
    labels: Vec<Label>,
    mapping: &BTreeMap<String, Label>,
) -> Result<Vec<Label>, EvaluationError> {
    labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            let key = label.to_string();
            mapping
                .get(&key)
                .cloned()
                .ok_or(EvaluationError::UnmappedLabel { index, label: key })
        })
        .collect()
}

/// Parses the reference column into labels
///
/// # Errors
///
/// Errors with [`EvaluationError::InvalidReference`] on the first value that is not a label
pub fn parse_references(values: &[Value]) -> Result<Vec<Label>, EvaluationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Label::from_value(value).ok_or_else(|| EvaluationError::InvalidReference {
                index,
                value: value.clone(),
            })
        })
        .collect()
}
