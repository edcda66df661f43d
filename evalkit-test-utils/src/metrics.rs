use std::sync::{Arc, Mutex};

use anyhow::Result;
use evalkit_core::{Label, Metric, MetricResult};
use evalkit_metrics::Accuracy;

/// Wraps a metric and records every call made to it
pub struct RecordingMetric {
    inner: Arc<dyn Metric>,
    received: Mutex<Vec<(Vec<Label>, Vec<Label>)>>,
}

impl RecordingMetric {
    pub fn new(inner: impl Metric + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn accuracy() -> Self {
        Self::new(Accuracy::default())
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Predictions and references of the most recent call
    pub fn last_call(&self) -> Option<(Vec<Label>, Vec<Label>)> {
        self.received.lock().unwrap().last().cloned()
    }
}

impl std::fmt::Debug for RecordingMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingMetric")
            .field("inner", &self.inner.name())
            .field("calls", &self.calls())
            .finish()
    }
}

impl Metric for RecordingMetric {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult> {
        self.received
            .lock()
            .unwrap()
            .push((predictions.to_vec(), references.to_vec()));
        self.inner.compute(predictions, references)
    }
}
