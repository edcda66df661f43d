//! Metrics score predictions against references.
use std::{
    collections::{BTreeMap, btree_map::Iter},
    sync::Arc,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Computes one or more scores from paired predictions and references.
///
/// Prediction `i` always pairs with reference `i`.
pub trait Metric: Send + Sync {
    /// Name used to look the metric up and to key its scores
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Metrics fail on empty or unpaired input, or when the labels do not fit the metric
    fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult>;
}

impl<T: Metric + ?Sized> Metric for Box<T> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult> {
        self.as_ref().compute(predictions, references)
    }
}

impl<T: Metric + ?Sized> Metric for Arc<T> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult> {
        self.as_ref().compute(predictions, references)
    }
}

/// Scores keyed by name, i.e. `{"accuracy": 0.5}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricResult(BTreeMap<String, f64>);

impl MetricResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, score: f64) {
        self.0.insert(key.into(), score);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<f64> {
        self.0.get(key.as_ref()).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, f64> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for MetricResult {
    fn from(items: [(K, f64); N]) -> Self {
        items.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MetricResult {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        MetricResult(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'a> IntoIterator for &'a MetricResult {
    type Item = (&'a String, &'a f64);
    type IntoIter = Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A score with its bootstrapped confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapScore {
    pub score: f64,
    pub confidence_interval: (f64, f64),
    pub standard_error: f64,
}

/// What an evaluation returns, depending on the strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum_macros::EnumIs)]
#[serde(untagged)]
pub enum EvaluationResult {
    Simple(MetricResult),
    Bootstrap(BTreeMap<String, BootstrapScore>),
}

impl EvaluationResult {
    /// The point estimate for a key, regardless of strategy
    pub fn score(&self, key: impl AsRef<str>) -> Option<f64> {
        match self {
            EvaluationResult::Simple(result) => result.get(key),
            EvaluationResult::Bootstrap(scores) => scores.get(key.as_ref()).map(|s| s.score),
        }
    }

    pub fn as_simple(&self) -> Option<&MetricResult> {
        match self {
            EvaluationResult::Simple(result) => Some(result),
            EvaluationResult::Bootstrap(_) => None,
        }
    }

    pub fn as_bootstrap(&self) -> Option<&BTreeMap<String, BootstrapScore>> {
        match self {
            EvaluationResult::Bootstrap(scores) => Some(scores),
            EvaluationResult::Simple(_) => None,
        }
    }
}

impl From<MetricResult> for EvaluationResult {
    fn from(result: MetricResult) -> Self {
        EvaluationResult::Simple(result)
    }
}

impl PartialEq<MetricResult> for EvaluationResult {
    fn eq(&self, other: &MetricResult) -> bool {
        self.as_simple() == Some(other)
    }
}
