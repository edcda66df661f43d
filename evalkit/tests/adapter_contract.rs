//! Adapters are checked before they are invoked and their output before it is scored
use std::sync::Arc;

use evalkit::{
    Dataset, Label, MetricResult, PredictionRecord,
    errors::{ContractError, EvaluationError, ResultShapeError},
    evaluator::{ComputeConfig, Evaluator as _, TextClassificationEvaluator, evaluator},
    traits::FnAdapter,
};
use evalkit_test_utils::{MockAdapter, RecordingMetric};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn reviews(labels: &[i64]) -> Dataset {
    let texts = (0..labels.len())
        .map(|i| json!(format!("review {i}")))
        .collect::<Vec<_>>();
    let labels = labels.iter().map(|label| json!(label)).collect::<Vec<_>>();

    Dataset::from_columns([("text", texts), ("label", labels)]).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_single_prediction_scores_accuracy() {
    let adapter = MockAdapter::new("text-classification")
        .returning(vec![PredictionRecord::from_label(1)]);
    let dataset = Dataset::from_columns([
        ("text", vec![json!("This movie is awesome")]),
        ("label", vec![json!(1)]),
    ])
    .unwrap();

    let result = evaluator("text-classification")
        .unwrap()
        .compute(&adapter, dataset.into(), &ComputeConfig::default())
        .await
        .unwrap();

    assert_eq!(result, MetricResult::from([("accuracy", 1.0)]));
    assert_eq!(adapter.calls(), 1);
}

#[test_log::test(tokio::test)]
async fn test_half_correct_predictions() {
    let adapter = MockAdapter::new("text-classification").returning(vec![
        PredictionRecord::from_label(1),
        PredictionRecord::from_label(0),
    ]);

    let result = evaluator("text-classification")
        .unwrap()
        .compute(&adapter, reviews(&[1, 1]).into(), &ComputeConfig::default())
        .await
        .unwrap();

    assert_eq!(result, MetricResult::from([("accuracy", 0.5)]));
}

#[test_log::test(tokio::test)]
async fn test_predictions_keep_input_order() {
    let adapter = FnAdapter::new("text-classification", |inputs, _options| {
        Ok(inputs
            .iter()
            .map(|input| {
                let text = input.as_str().unwrap_or_default();
                PredictionRecord::from_label(i64::from(text.ends_with('0')))
            })
            .collect())
    });
    let metric = Arc::new(RecordingMetric::accuracy());

    evaluator("text-classification")
        .unwrap()
        .compute_with_metric(
            &adapter,
            reviews(&[1, 0, 0]).into(),
            metric.clone(),
            &ComputeConfig::default(),
        )
        .await
        .unwrap();

    let (predictions, references) = metric.last_call().unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(
        predictions,
        vec![Label::from(1), Label::from(0), Label::from(0)],
        "prediction i pairs with input i"
    );
    assert_eq!(references, predictions);
}

#[test_case(vec![]; "no records")]
#[test_case(vec![PredictionRecord::from_label(1)]; "too few records")]
#[test_case(vec![PredictionRecord::from_label(1); 3]; "too many records")]
#[tokio::test]
async fn test_wrong_length_never_reaches_metric(records: Vec<PredictionRecord>) {
    let actual = records.len();
    let adapter = MockAdapter::new("text-classification").returning(records);
    let metric = Arc::new(RecordingMetric::accuracy());

    let err = TextClassificationEvaluator::new()
        .compute_with_metric(
            &adapter,
            reviews(&[1, 1]).into(),
            metric.clone(),
            &ComputeConfig::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_result_shape_error());
    assert!(matches!(
        err,
        EvaluationError::ResultShape(ResultShapeError::LengthMismatch { expected: 2, actual: a }) if a == actual
    ));
    assert_eq!(adapter.calls(), 1);
    assert_eq!(metric.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn test_short_output_message() {
    let adapter = MockAdapter::new("text-classification")
        .returning(vec![PredictionRecord::from_label(1)]);

    let err = evaluator("text-classification")
        .unwrap()
        .compute(&adapter, reviews(&[1, 1]).into(), &ComputeConfig::default())
        .await
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"adapter returned 1 predictions for 2 inputs");
}

#[test_log::test(tokio::test)]
async fn test_record_without_label() {
    let adapter = MockAdapter::new("text-classification").returning(vec![
        PredictionRecord::from_label(1),
        PredictionRecord::from([("score", json!(0.3))]),
    ]);
    let metric = Arc::new(RecordingMetric::accuracy());

    let err = TextClassificationEvaluator::new()
        .compute_with_metric(
            &adapter,
            reviews(&[1, 0]).into(),
            metric.clone(),
            &ComputeConfig::default(),
        )
        .await
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"prediction at index 1 has no `label` key");
    assert_eq!(metric.calls(), 0);
}

#[test_case(""; "empty task")]
#[test_case("  "; "blank task")]
#[tokio::test]
async fn test_missing_task_is_never_invoked(task: &str) {
    let adapter = MockAdapter::new(task).returning(vec![PredictionRecord::from_label(1)]);

    let err = evaluator("text-classification")
        .unwrap()
        .compute(&adapter, reviews(&[1]).into(), &ComputeConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EvaluationError::Contract(ContractError::MissingTask)
    ));
    assert_eq!(adapter.calls(), 0);
}

#[test_log::test(tokio::test)]
async fn test_options_reach_the_adapter() {
    let adapter = MockAdapter::new("text-classification")
        .returning(vec![PredictionRecord::from_label(1)]);
    let options = evalkit::PredictionOptions::builder()
        .truncation(false)
        .top_k(1_usize)
        .extra("padding", "max_length")
        .build()
        .unwrap();

    evaluator("text-classification")
        .unwrap()
        .compute(
            &adapter,
            reviews(&[1]).into(),
            &ComputeConfig::builder().options(options.clone()).build().unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(adapter.last_options(), Some(options));
}
