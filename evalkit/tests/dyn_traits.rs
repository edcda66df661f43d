//! Tests for dyn trait objects
use std::sync::Arc;

use evalkit::{
    evaluator::{Evaluator, Task, TextClassificationEvaluator, evaluator},
    metrics::{Accuracy, F1},
    traits::{Adapter, FnAdapter, Metric},
};
use evalkit_test_utils::{DummyImageClassificationPipeline, DummyTextClassificationPipeline};
use pretty_assertions::assert_eq;

#[test]
fn test_name_on_dyn() {
    let text: Box<dyn Adapter> = Box::new(DummyTextClassificationPipeline::default());
    assert_eq!(text.name(), "DummyTextClassificationPipeline");
    assert_eq!(text.task(), "text-classification");

    let image: Arc<dyn Adapter> = Arc::new(DummyImageClassificationPipeline::default());
    assert_eq!(image.name(), "DummyImageClassificationPipeline");

    let closure: Box<dyn Adapter> = Box::new(FnAdapter::new("sentiment-analysis", |_, _| {
        Ok(Vec::new())
    }));
    assert_eq!(closure.name(), "FnAdapter");

    let metrics: Vec<Box<dyn Metric>> = vec![Box::new(Accuracy::default()), Box::new(F1::new())];
    assert_eq!(
        metrics.iter().map(|metric| metric.name()).collect::<Vec<_>>(),
        vec!["accuracy", "f1"]
    );

    let evaluators: Vec<Box<dyn Evaluator>> = vec![
        evaluator("image-classification").unwrap(),
        Box::new(TextClassificationEvaluator::new()),
    ];
    assert_eq!(
        evaluators.iter().map(|e| e.task()).collect::<Vec<_>>(),
        vec![Task::ImageClassification, Task::TextClassification]
    );
}
