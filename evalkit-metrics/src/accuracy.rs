use anyhow::Result;
use evalkit_core::{Label, Metric, MetricResult};

/// Fraction of predictions equal to their reference.
///
/// With `normalize` disabled the number of correct predictions is reported instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accuracy {
    normalize: bool,
}

impl Default for Accuracy {
    fn default() -> Self {
        Self { normalize: true }
    }
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the count of correct predictions rather than the fraction
    pub fn counting() -> Self {
        Self { normalize: false }
    }
}

impl Metric for Accuracy {
    fn name(&self) -> &str {
        "accuracy"
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult> {
        crate::check_inputs(predictions, references)?;

        let correct = predictions
            .iter()
            .zip(references)
            .filter(|(prediction, reference)| prediction == reference)
            .count();

        let score = if self.normalize {
            correct as f64 / predictions.len() as f64
        } else {
            correct as f64
        };

        Ok(MetricResult::from([("accuracy", score)]))
    }
}
