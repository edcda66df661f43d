//! Options passed verbatim to an [`crate::Adapter`] on invocation.
use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration handed to the adapter with every invocation.
///
/// The evaluator never interprets these fields; they are forwarded as-is. Common knobs have
/// named fields, anything pipeline specific goes into `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "anyhow::Error"))]
#[serde(default)]
pub struct PredictionOptions {
    /// Truncate inputs that exceed the pipeline's maximum length
    #[builder(default = "true")]
    pub truncation: bool,
    /// Preferred batch size for pipelines that batch internally
    #[builder(default)]
    pub batch_size: Option<usize>,
    /// Number of ranked candidates a pipeline should return per input
    #[builder(default)]
    pub top_k: Option<usize>,
    /// Adapter specific options
    #[builder(default, setter(custom))]
    pub extra: BTreeMap<String, Value>,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            truncation: true,
            batch_size: None,
            top_k: None,
            extra: BTreeMap::new(),
        }
    }
}

impl PredictionOptions {
    pub fn builder() -> PredictionOptionsBuilder {
        PredictionOptionsBuilder::default()
    }

    pub fn get_extra(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.extra.get(key.as_ref())
    }
}

impl PredictionOptionsBuilder {
    /// Adds an adapter specific option
    pub fn extra(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.extra
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults_truncate() {
        let built = PredictionOptions::builder().build().unwrap();

        assert_eq!(built, PredictionOptions::default());
        assert!(built.truncation);
    }

    #[test]
    fn test_builder_extra() {
        let options = PredictionOptions::builder()
            .batch_size(8_usize)
            .extra("device", "cpu")
            .extra("temperature", 0.5)
            .build()
            .unwrap();

        assert_eq!(options.batch_size, Some(8));
        assert_eq!(options.get_extra("device"), Some(&json!("cpu")));
        assert_eq!(options.get_extra("temperature"), Some(&json!(0.5)));
        assert_eq!(options.get_extra("missing"), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: PredictionOptions =
            serde_json::from_value(json!({"top_k": 3, "extra": {"device": "cuda"}})).unwrap();

        assert!(options.truncation);
        assert_eq!(options.top_k, Some(3));
        assert_eq!(options.get_extra("device"), Some(&json!("cuda")));
    }
}
