//! Configuration of a single evaluation run.
use std::{collections::BTreeMap, path::Path};

use anyhow::{Context as _, Result};
use derive_builder::Builder;
use evalkit_core::{EvaluationError, Label, PredictionOptions};
use serde::{Deserialize, Serialize};

use crate::bootstrap::Bootstrap;

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
pub const DEFAULT_N_RESAMPLES: usize = 9999;
/// Upper bound on `n_resamples`
pub const MAX_N_RESAMPLES: usize = 1_000_000;

/// How scores are reported
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Strategy {
    /// Report the metric scores
    #[default]
    Simple,
    /// Report the scores with a bootstrapped confidence interval and standard error
    Bootstrap,
}

/// How bootstrap confidence intervals are derived from the resampled scores
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IntervalMethod {
    /// Bias corrected and accelerated percentiles
    #[default]
    Bca,
    /// Plain percentiles of the resampled scores
    Percentile,
}

/// Everything that can be tuned for an evaluation.
///
/// Columns left unset fall back to the defaults of the evaluator's task. Bootstrap settings
/// only apply to [`Strategy::Bootstrap`].
///
/// # Example
///
/// ```
/// # use evalkit_evaluator::{ComputeConfig, Strategy};
/// let config = ComputeConfig::builder()
///     .metric("f1")
///     .strategy(Strategy::Bootstrap)
///     .n_resamples(100_usize)
///     .random_state(0_u64)
///     .label_mapping([("NEGATIVE", 0), ("POSITIVE", 1)])
///     .build()
///     .unwrap();
/// assert_eq!(config.metric.as_deref(), Some("f1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "anyhow::Error"))]
#[serde(default)]
pub struct ComputeConfig {
    /// Metric to compute, by name. Defaults to the evaluator's default metric.
    #[builder(default)]
    pub metric: Option<String>,
    #[builder(default)]
    pub strategy: Strategy,
    #[builder(default = "DEFAULT_CONFIDENCE_LEVEL")]
    pub confidence_level: f64,
    #[builder(default = "DEFAULT_N_RESAMPLES")]
    pub n_resamples: usize,
    #[builder(default)]
    pub method: IntervalMethod,
    /// Seed for the bootstrap resampling
    #[builder(default)]
    pub random_state: Option<u64>,
    #[builder(default)]
    pub input_column: Option<String>,
    #[builder(default)]
    pub label_column: Option<String>,
    /// Maps labels emitted by the pipeline onto the labels used by the dataset.
    ///
    /// Predicted labels are looked up by their display form, so the integer label `1` and the
    /// text label `"1"` share the key `"1"` and map to the same dataset label.
    #[builder(default, setter(custom))]
    pub label_mapping: Option<BTreeMap<String, Label>>,
    /// Forwarded to the adapter as-is
    #[builder(default)]
    pub options: PredictionOptions,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            metric: None,
            strategy: Strategy::default(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            n_resamples: DEFAULT_N_RESAMPLES,
            method: IntervalMethod::default(),
            random_state: None,
            input_column: None,
            label_column: None,
            label_mapping: None,
            options: PredictionOptions::default(),
        }
    }
}

impl ComputeConfigBuilder {
    pub fn label_mapping<I, K, V>(&mut self, mapping: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Label>,
    {
        self.label_mapping = Some(Some(
            mapping
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }
}

impl ComputeConfig {
    pub fn builder() -> ComputeConfigBuilder {
        ComputeConfigBuilder::default()
    }

    /// Reads a configuration from a json file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Errors if the file cannot be read or is not a valid configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs_err::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid compute config in {}", path.display()))
    }

    /// Checks the settings relevant to the chosen strategy
    ///
    /// # Errors
    ///
    /// Errors with [`EvaluationError::InvalidConfig`] on out of range bootstrap settings
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.strategy != Strategy::Bootstrap {
            return Ok(());
        }

        Bootstrap::from_config(self).check()
    }

    /// Bootstrap settings that were changed while the strategy ignores them
    #[allow(clippy::float_cmp)]
    pub(crate) fn ignored_settings(&self) -> Vec<&'static str> {
        if self.strategy == Strategy::Bootstrap {
            return Vec::new();
        }

        let mut ignored = Vec::new();
        if self.confidence_level != DEFAULT_CONFIDENCE_LEVEL {
            ignored.push("confidence_level");
        }
        if self.n_resamples != DEFAULT_N_RESAMPLES {
            ignored.push("n_resamples");
        }
        if self.method != IntervalMethod::default() {
            ignored.push("method");
        }
        if self.random_state.is_some() {
            ignored.push("random_state");
        }
        ignored
    }
}
