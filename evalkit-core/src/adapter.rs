//! The contract a prediction pipeline has to satisfy to be evaluated.
//!
//! Any pipeline, regardless of the framework behind it, can be evaluated once it is wrapped in a
//! type implementing [`Adapter`]. The evaluator checks the declared task before invoking it and
//! validates the shape of the returned records afterwards.
use std::{fmt, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::{options::PredictionOptions, prediction::PredictionRecord};

/// A single raw input, as stored in a dataset column
pub type Input = Value;

#[async_trait]
pub trait Adapter: Send + Sync {
    /// The task the wrapped pipeline performs, i.e. `text-classification`
    fn task(&self) -> &str;

    /// Predicts a record for every input.
    ///
    /// Implementations must return exactly one record per input, in input order, each with at
    /// least a `label` key.
    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>>;

    fn name(&self) -> &'static str {
        let name = std::any::type_name::<Self>();
        name.split("::").last().unwrap_or(name)
    }
}

#[async_trait]
impl<T: Adapter + ?Sized> Adapter for Box<T> {
    fn task(&self) -> &str {
        self.as_ref().task()
    }

    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        self.as_ref().predict(inputs, options).await
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

#[async_trait]
impl<T: Adapter + ?Sized> Adapter for Arc<T> {
    fn task(&self) -> &str {
        self.as_ref().task()
    }

    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        self.as_ref().predict(inputs, options).await
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

#[async_trait]
impl<T: Adapter + ?Sized> Adapter for &T {
    fn task(&self) -> &str {
        (**self).task()
    }

    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        (**self).predict(inputs, options).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Use a closure as an adapter
///
/// ```
/// # use evalkit_core::{Adapter, FnAdapter, PredictionRecord};
/// let adapter = FnAdapter::new("text-classification", |inputs, _options| {
///     Ok(inputs.iter().map(|_| PredictionRecord::from_label(1)).collect())
/// });
/// assert_eq!(adapter.task(), "text-classification");
/// ```
pub struct FnAdapter<F> {
    task: String,
    predict: F,
}

impl<F> FnAdapter<F>
where
    F: Fn(&[Input], &PredictionOptions) -> Result<Vec<PredictionRecord>> + Send + Sync,
{
    pub fn new(task: impl Into<String>, predict: F) -> Self {
        Self {
            task: task.into(),
            predict,
        }
    }
}

impl<F> fmt::Debug for FnAdapter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdapter").field("task", &self.task).finish()
    }
}

#[async_trait]
impl<F> Adapter for FnAdapter<F>
where
    F: Fn(&[Input], &PredictionOptions) -> Result<Vec<PredictionRecord>> + Send + Sync,
{
    fn task(&self) -> &str {
        &self.task
    }

    async fn predict(
        &self,
        inputs: &[Input],
        options: &PredictionOptions,
    ) -> Result<Vec<PredictionRecord>> {
        (self.predict)(inputs, options)
    }

    fn name(&self) -> &'static str {
        "FnAdapter"
    }
}
