use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::Result;
use async_trait::async_trait;
use evalkit_core::{Adapter, Input, PredictionOptions, PredictionRecord};

/// Labels the first input `POSITIVE`, the second `NEGATIVE`, and so on
#[derive(Debug, Default)]
pub struct DummyTextClassificationPipeline {
    calls: AtomicUsize,
}

impl DummyTextClassificationPipeline {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Adapter for DummyTextClassificationPipeline {
    fn task(&self) -> &str {
        "text-classification"
    }

    async fn predict(
        &self,
        inputs: &[Input],
        _options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok((0..inputs.len())
            .map(|i| {
                let label = if i % 2 == 0 { "POSITIVE" } else { "NEGATIVE" };
                PredictionRecord::from_label(label).with_score(1.0)
            })
            .collect())
    }
}

/// Ranks `yurt` above `umbrella` for every image and keeps the top candidate
#[derive(Debug, Default)]
pub struct DummyImageClassificationPipeline {
    calls: AtomicUsize,
}

impl DummyImageClassificationPipeline {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The ranked candidates for a single image
    pub fn candidates() -> Vec<PredictionRecord> {
        vec![
            PredictionRecord::from_label("umbrella").with_score(0.1),
            PredictionRecord::from_label("yurt").with_score(0.9),
        ]
    }
}

#[async_trait]
impl Adapter for DummyImageClassificationPipeline {
    fn task(&self) -> &str {
        "image-classification"
    }

    async fn predict(
        &self,
        inputs: &[Input],
        _options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        inputs
            .iter()
            .map(|_| {
                PredictionRecord::top_scoring(Self::candidates())
                    .ok_or_else(|| anyhow::anyhow!("no candidates"))
            })
            .collect()
    }
}

/// An adapter with a configurable task that returns fixed records and records how it was called
#[derive(Debug, Default)]
pub struct MockAdapter {
    task: String,
    records: Vec<PredictionRecord>,
    calls: AtomicUsize,
    received: Mutex<Option<(Vec<Input>, PredictionOptions)>>,
}

impl MockAdapter {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Self::default()
        }
    }

    /// Records returned from every call, regardless of the inputs
    #[must_use]
    pub fn returning(mut self, records: Vec<PredictionRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_inputs(&self) -> Option<Vec<Input>> {
        self.received
            .lock()
            .unwrap()
            .as_ref()
            .map(|(inputs, _)| inputs.clone())
    }

    pub fn last_options(&self) -> Option<PredictionOptions> {
        self.received
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, options)| options.clone())
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    fn task(&self) -> &str {
        &self.task
    }

    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.received.lock().unwrap() = Some((inputs.to_vec(), options.clone()));

        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_dummy_text_pipeline_alternates() {
        let pipeline = DummyTextClassificationPipeline::default();
        let records = pipeline
            .predict(&[json!("a"), json!("b"), json!("c")], &PredictionOptions::default())
            .await
            .unwrap();

        let labels = records
            .iter()
            .map(|record| record.label().cloned().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec![json!("POSITIVE"), json!("NEGATIVE"), json!("POSITIVE")]);
        assert_eq!(pipeline.calls(), 1);
    }

    #[tokio::test]
    async fn test_dummy_image_pipeline_keeps_top_candidate() {
        let records = DummyImageClassificationPipeline::default()
            .predict(&[json!("yurt.png")], &PredictionOptions::default())
            .await
            .unwrap();

        assert_eq!(records[0].label(), Some(&json!("yurt")));
        assert_eq!(records[0].score(), Some(0.9));
    }

    #[tokio::test]
    async fn test_mock_adapter_records_call() {
        let adapter = MockAdapter::new("text-classification")
            .returning(vec![PredictionRecord::from_label(1)]);
        assert_eq!(adapter.last_inputs(), None);

        let records = adapter
            .predict(&[json!("x")], &PredictionOptions::default())
            .await
            .unwrap();

        assert_eq!(records, vec![PredictionRecord::from_label(1)]);
        assert_eq!(adapter.calls(), 1);
        assert_eq!(adapter.last_inputs(), Some(vec![json!("x")]));
        assert_eq!(adapter.last_options(), Some(PredictionOptions::default()));
    }
}
