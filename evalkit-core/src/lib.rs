#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Contract types for evaluating prediction pipelines.
//!
//! An [`Adapter`] wraps a pipeline, a [`Dataset`] holds the examples and a [`Metric`] scores the
//! predictions. The evaluator that ties them together lives in `evalkit-evaluator`.

pub mod adapter;
pub mod dataset;
pub mod errors;
pub mod label;
pub mod metric;
pub mod options;
pub mod prediction;

pub use crate::adapter::*;
pub use crate::dataset::*;
pub use crate::errors::*;
pub use crate::label::*;
pub use crate::metric::*;
pub use crate::options::*;
pub use crate::prediction::*;

/// Re-export of commonly used dependencies.
pub mod prelude;

#[cfg(feature = "metrics")]
pub mod metrics;
