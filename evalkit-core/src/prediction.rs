//! Records produced by an [`crate::Adapter`], one per input.
//!
//! A record is a string keyed map of JSON values. The only key the evaluator relies on is
//! `label`; anything else (scores, raw logits, debug output) is carried along untouched.
use std::collections::{BTreeMap, btree_map::Iter};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key holding the predicted class.
pub const LABEL_KEY: &str = "label";
/// Key holding the confidence of the prediction, if the pipeline reports one.
pub const SCORE_KEY: &str = "score";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRecord {
    inner: BTreeMap<String, Value>,
}

impl PredictionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record that only carries a label
    pub fn from_label(label: impl Into<Value>) -> Self {
        let mut record = Self::new();
        record.insert(LABEL_KEY, label);
        record
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.insert(SCORE_KEY, score);
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.inner.get(key.as_ref())
    }

    /// The raw `label` value, if present
    pub fn label(&self) -> Option<&Value> {
        self.get(LABEL_KEY)
    }

    pub fn score(&self) -> Option<f64> {
        self.get(SCORE_KEY).and_then(Value::as_f64)
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Picks the candidate with the highest `score`.
    ///
    /// Classification pipelines that return ranked candidates per input can use this to reduce
    /// them to a single record. Candidates without a score rank last; on ties the earliest
    /// candidate wins.
    pub fn top_scoring(candidates: impl IntoIterator<Item = PredictionRecord>) -> Option<Self> {
        candidates.into_iter().fold(None, |best, candidate| match best {
            Some(best)
                if best.score().unwrap_or(f64::NEG_INFINITY)
                    >= candidate.score().unwrap_or(f64::NEG_INFINITY) =>
            {
                Some(best)
            }
            _ => Some(candidate),
        })
    }
}

impl<'a> IntoIterator for &'a PredictionRecord {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for PredictionRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        PredictionRecord {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for PredictionRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(items: [(K, V); N]) -> Self {
        items.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for PredictionRecord
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(items: Vec<(K, V)>) -> Self {
        items.into_iter().collect()
    }
}

impl TryFrom<Value> for PredictionRecord {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => anyhow::bail!("expected a prediction object, got {other}"),
        }
    }
}
