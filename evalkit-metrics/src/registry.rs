use std::{collections::BTreeMap, fmt, str::FromStr as _, sync::Arc};

use evalkit_core::{EvaluationError, Metric};
use strum::IntoEnumIterator as _;

use crate::{Accuracy, F1, Precision, Recall};

/// Metrics that ship with evalkit, loadable by name
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuiltinMetric {
    Accuracy,
    Precision,
    Recall,
    F1,
}

impl BuiltinMetric {
    /// A fresh instance with default settings
    pub fn instance(self) -> Arc<dyn Metric> {
        match self {
            BuiltinMetric::Accuracy => Arc::new(Accuracy::default()),
            BuiltinMetric::Precision => Arc::new(Precision::default()),
            BuiltinMetric::Recall => Arc::new(Recall::default()),
            BuiltinMetric::F1 => Arc::new(F1::default()),
        }
    }
}

/// Looks metrics up by name.
///
/// The default registry holds every [`BuiltinMetric`]. Registering a metric under an existing
/// name replaces it.
#[derive(Clone)]
pub struct MetricRegistry {
    metrics: BTreeMap<String, Arc<dyn Metric>>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for builtin in BuiltinMetric::iter() {
            registry.register_as(builtin.to_string(), builtin.instance());
        }
        registry
    }
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("metrics", &self.names())
            .finish()
    }
}

impl MetricRegistry {
    /// A registry without any metrics
    pub fn empty() -> Self {
        Self {
            metrics: BTreeMap::new(),
        }
    }

    /// Registers a metric under its own name
    pub fn register(&mut self, metric: impl Metric + 'static) -> &mut Self {
        let name = metric.name().to_string();
        self.register_as(name, Arc::new(metric))
    }

    pub fn register_as(&mut self, name: impl Into<String>, metric: Arc<dyn Metric>) -> &mut Self {
        let name = name.into();
        tracing::debug!(metric = %name, "registering metric");
        self.metrics.insert(name, metric);
        self
    }

    /// Gets a metric by exact name, falling back to the builtin names case insensitively
    pub fn get(&self, name: &str) -> Option<Arc<dyn Metric>> {
        self.metrics.get(name).cloned().or_else(|| {
            let builtin = BuiltinMetric::from_str(name).ok()?;
            self.metrics.get(&builtin.to_string()).cloned()
        })
    }

    /// Gets a metric by name
    ///
    /// # Errors
    ///
    /// Errors with [`EvaluationError::UnknownMetric`] if no metric is registered under `name`
    pub fn load(&self, name: &str) -> Result<Arc<dyn Metric>, EvaluationError> {
        self.get(name).ok_or_else(|| EvaluationError::UnknownMetric {
            name: name.to_string(),
            available: self.names().into_iter().map(str::to_string).collect(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.metrics.keys().map(String::as_str).collect()
    }
}
