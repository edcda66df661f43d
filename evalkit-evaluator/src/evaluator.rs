//! The evaluation driver.
//!
//! An [`Evaluator`] resolves the data, checks the adapter against its task, invokes the adapter
//! once over the input column and feeds the resulting labels, together with the references, to
//! a metric.
use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use derive_builder::Builder;
use evalkit_core::{
    Adapter, DataSource, Dataset, DatasetLoader, EvaluationError, EvaluationResult,
    JsonDatasetLoader, Label, Metric,
};
use evalkit_metrics::MetricRegistry;

use crate::{
    bootstrap::Bootstrap,
    config::{ComputeConfig, Strategy},
    contract,
    task::Task,
};

/// What an evaluator needs besides its task
#[derive(Debug, Clone, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "anyhow::Error"))]
pub struct EvaluatorSettings {
    /// Metric used when the compute config does not name one
    #[builder(default)]
    pub default_metric_name: Option<String>,
    /// Metrics that can be named in a compute config
    #[builder(default)]
    pub metrics: MetricRegistry,
    /// Resolves datasets passed by name
    #[builder(default = "default_dataset_loader()", setter(custom))]
    pub dataset_loader: Arc<dyn DatasetLoader>,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            default_metric_name: None,
            metrics: MetricRegistry::default(),
            dataset_loader: default_dataset_loader(),
        }
    }
}

fn default_dataset_loader() -> Arc<dyn DatasetLoader> {
    Arc::new(JsonDatasetLoader::default())
}

impl EvaluatorSettings {
    pub fn builder() -> EvaluatorSettingsBuilder {
        EvaluatorSettingsBuilder::default()
    }
}

impl EvaluatorSettingsBuilder {
    pub fn dataset_loader(&mut self, loader: impl DatasetLoader + 'static) -> &mut Self {
        self.dataset_loader = Some(Arc::new(loader));
        self
    }
}

/// Evaluates adapters for a single task.
///
/// Implementors only provide their task and settings; every step of an evaluation is a provided
/// method that can be overridden on its own.
#[async_trait]
pub trait Evaluator: Send + Sync + Debug {
    fn task(&self) -> Task;

    fn settings(&self) -> &EvaluatorSettings;

    fn default_metric_name(&self) -> Option<&str> {
        self.settings().default_metric_name.as_deref()
    }

    /// Resolves the data source and checks the input and label columns
    ///
    /// # Errors
    ///
    /// Errors if a named dataset cannot be loaded, a column is missing or the dataset is empty
    async fn prepare_data(
        &self,
        source: DataSource,
        input_column: &str,
        label_column: &str,
    ) -> Result<Dataset, EvaluationError> {
        let dataset = match source {
            DataSource::Dataset(dataset) => dataset,
            DataSource::Named(name) => self
                .settings()
                .dataset_loader
                .load(&name)
                .await
                .map_err(EvaluationError::DatasetFailed)?,
        };

        for (kind, column) in [("input", input_column), ("label", label_column)] {
            if !dataset.has_column(column) {
                return Err(EvaluationError::InvalidColumn {
                    kind,
                    column: column.to_string(),
                    available: dataset
                        .column_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                });
            }
        }

        if dataset.is_empty() {
            return Err(EvaluationError::EmptyDataset);
        }

        Ok(dataset)
    }

    /// Checks the adapter declares a task compatible with this evaluator
    ///
    /// # Errors
    ///
    /// Errors with a [`evalkit_core::ContractError`] if it does not
    fn prepare_pipeline(&self, adapter: &dyn Adapter) -> Result<(), EvaluationError> {
        contract::validate_adapter(adapter, self.task())?;
        Ok(())
    }

    /// Loads a metric by name, or the default metric if no name is given
    ///
    /// # Errors
    ///
    /// Errors if the metric is unknown, or no name is given and there is no default metric
    fn prepare_metric(&self, metric: Option<&str>) -> Result<Arc<dyn Metric>, EvaluationError> {
        let name = metric
            .or_else(|| self.default_metric_name())
            .ok_or(EvaluationError::MissingDefaultMetric)?;

        self.settings().metrics.load(name)
    }

    /// Scores the predictions with the strategy from the config
    ///
    /// # Errors
    ///
    /// Errors if the metric fails, or the bootstrap cannot be computed
    fn core_compute(
        &self,
        references: &[Label],
        predictions: &[Label],
        metric: &dyn Metric,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        match config.strategy {
            Strategy::Simple => metric
                .compute(predictions, references)
                .map(EvaluationResult::Simple)
                .map_err(EvaluationError::MetricFailed),
            Strategy::Bootstrap => Bootstrap::from_config(config)
                .run(metric, predictions, references)
                .map(EvaluationResult::Bootstrap),
        }
    }

    /// Evaluates an adapter on a dataset, with the metric named in the config
    ///
    /// # Errors
    ///
    /// See [`EvaluationError`]. Contract errors are raised before the adapter is invoked, result
    /// shape errors before the metric is computed.
    async fn compute(
        &self,
        adapter: &dyn Adapter,
        data: DataSource,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        evaluate(self, adapter, data, None, config).await
    }

    /// Like [`Evaluator::compute`], with a metric instance instead of a name
    ///
    /// # Errors
    ///
    /// See [`Evaluator::compute`]
    async fn compute_with_metric(
        &self,
        adapter: &dyn Adapter,
        data: DataSource,
        metric: Arc<dyn Metric>,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        evaluate(self, adapter, data, Some(metric), config).await
    }
}

#[async_trait]
impl<T: Evaluator + ?Sized> Evaluator for Box<T> {
    fn task(&self) -> Task {
        (**self).task()
    }

    fn settings(&self) -> &EvaluatorSettings {
        (**self).settings()
    }

    fn default_metric_name(&self) -> Option<&str> {
        (**self).default_metric_name()
    }

    async fn prepare_data(
        &self,
        source: DataSource,
        input_column: &str,
        label_column: &str,
    ) -> Result<Dataset, EvaluationError> {
        (**self)
            .prepare_data(source, input_column, label_column)
            .await
    }

    fn prepare_pipeline(&self, adapter: &dyn Adapter) -> Result<(), EvaluationError> {
        (**self).prepare_pipeline(adapter)
    }

    fn prepare_metric(&self, metric: Option<&str>) -> Result<Arc<dyn Metric>, EvaluationError> {
        (**self).prepare_metric(metric)
    }

    fn core_compute(
        &self,
        references: &[Label],
        predictions: &[Label],
        metric: &dyn Metric,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        (**self).core_compute(references, predictions, metric, config)
    }

    async fn compute(
        &self,
        adapter: &dyn Adapter,
        data: DataSource,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        (**self).compute(adapter, data, config).await
    }

    async fn compute_with_metric(
        &self,
        adapter: &dyn Adapter,
        data: DataSource,
        metric: Arc<dyn Metric>,
        config: &ComputeConfig,
    ) -> Result<EvaluationResult, EvaluationError> {
        (**self)
            .compute_with_metric(adapter, data, metric, config)
            .await
    }
}

#[tracing::instrument(
    skip_all,
    fields(task = %evaluator.task(), strategy = %config.strategy, adapter = adapter.name()),
    err
)]
async fn evaluate<E: Evaluator + ?Sized>(
    evaluator: &E,
    adapter: &dyn Adapter,
    data: DataSource,
    metric: Option<Arc<dyn Metric>>,
    config: &ComputeConfig,
) -> Result<EvaluationResult, EvaluationError> {
    config.validate()?;

    let task = evaluator.task();
    let input_column = config
        .input_column
        .as_deref()
        .unwrap_or(task.default_input_column());
    let label_column = config
        .label_column
        .as_deref()
        .unwrap_or(task.default_label_column());

    let dataset = evaluator
        .prepare_data(data, input_column, label_column)
        .await?;
    evaluator.prepare_pipeline(adapter)?;
    let metric = match metric {
        Some(metric) => metric,
        None => evaluator.prepare_metric(config.metric.as_deref())?,
    };

    let ignored = config.ignored_settings();
    if !ignored.is_empty() {
        tracing::warn!(?ignored, "bootstrap settings have no effect with the simple strategy");
    }

    let inputs = column(&dataset, "input", input_column)?;
    let references = column(&dataset, "label", label_column)?;

    tracing::debug!(inputs = inputs.len(), "invoking adapter");
    let records = adapter
        .predict(inputs, &config.options)
        .await
        .map_err(EvaluationError::AdapterFailed)?;

    let mut predictions = contract::extract_labels(&records, inputs.len())?;
    if let Some(mapping) = &config.label_mapping {
        predictions = contract::apply_label_mapping(predictions, mapping)?;
    }
    let references = contract::parse_references(references)?;

    tracing::debug!(metric = metric.name(), "computing metric");
    let result = evaluator.core_compute(&references, &predictions, metric.as_ref(), config)?;

    #[cfg(feature = "metrics")]
    evalkit_core::metrics::emit_evaluation(
        &task.to_string(),
        metric.name(),
        predictions.len() as u64,
    );

    Ok(result)
}

fn column<'a>(
    dataset: &'a Dataset,
    kind: &'static str,
    name: &str,
) -> Result<&'a [serde_json::Value], EvaluationError> {
    dataset
        .column(name)
        .ok_or_else(|| EvaluationError::InvalidColumn {
            kind,
            column: name.to_string(),
            available: dataset
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
}
