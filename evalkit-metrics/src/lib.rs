//! Built-in metrics and the registry used to look metrics up by name.
//!
//! All metrics follow the conventions of scikit-learn: ratios with a zero denominator score
//! `0.0`, and averaged metrics consider every class seen in either the predictions or the
//! references.
mod accuracy;
mod average;
mod classification;
mod registry;

pub use accuracy::Accuracy;
pub use average::Average;
pub use classification::{F1, F1Builder, Precision, PrecisionBuilder, Recall, RecallBuilder};
pub use registry::{BuiltinMetric, MetricRegistry};

use anyhow::Result;
use evalkit_core::Label;

/// Checks predictions and references can be paired
fn check_inputs(predictions: &[Label], references: &[Label]) -> Result<()> {
    if predictions.len() != references.len() {
        anyhow::bail!(
            "predictions and references differ in length ({} vs {})",
            predictions.len(),
            references.len()
        );
    }

    if predictions.is_empty() {
        anyhow::bail!("cannot compute a metric without predictions");
    }

    Ok(())
}
