//! Column oriented datasets and the loaders that resolve them by name.
use std::{
    collections::BTreeMap,
    fmt::Debug,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use itertools::Itertools;
use serde_json::{Map, Value};

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
use mockall::automock;

/// An ordered, read-only table of examples.
///
/// Every column holds one value per example; all columns have the same length. Row `i` of the
/// input column pairs with row `i` of the label column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: BTreeMap<String, Vec<Value>>,
    len: usize,
}

impl Dataset {
    /// Builds a dataset from named columns
    ///
    /// # Errors
    ///
    /// Errors if the columns differ in length
    pub fn from_columns<I, K>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        let columns: BTreeMap<String, Vec<Value>> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        let lengths = columns.values().map(Vec::len).unique().collect::<Vec<_>>();
        if lengths.len() > 1 {
            anyhow::bail!(
                "all columns must have the same length, got: {}",
                columns
                    .iter()
                    .map(|(name, values)| format!("{name} ({})", values.len()))
                    .join(", ")
            );
        }

        Ok(Self {
            len: lengths.first().copied().unwrap_or_default(),
            columns,
        })
    }

    /// Builds a dataset from row records. Cells missing from a row are `null`.
    pub fn from_records(records: impl IntoIterator<Item = Map<String, Value>>) -> Self {
        let records = records.into_iter().collect::<Vec<_>>();
        let names = records
            .iter()
            .flat_map(Map::keys)
            .unique()
            .cloned()
            .collect::<Vec<_>>();

        let columns = names
            .into_iter()
            .map(|name| {
                let values = records
                    .iter()
                    .map(|record| record.get(&name).cloned().unwrap_or(Value::Null))
                    .collect();
                (name, values)
            })
            .collect();

        Self {
            columns,
            len: records.len(),
        }
    }

    /// Parses a dataset from JSON.
    ///
    /// Accepts an object of columns (`{"text": [..], "label": [..]}`), an array of row objects,
    /// or JSON lines with one row object per line. A single object whose values are not all
    /// arrays is read as a dataset with one row.
    ///
    /// # Errors
    ///
    /// Errors if the content is none of the above
    pub fn from_json_str(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(columns)) if columns.values().all(Value::is_array) => {
                let columns = columns
                    .into_iter()
                    .filter_map(|(name, values)| match values {
                        Value::Array(values) => Some((name, values)),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                Self::from_columns(columns)
            }
            Ok(Value::Object(row)) => Ok(Self::from_records([row])),
            Ok(Value::Array(rows)) => rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| into_record(index, row))
                .collect::<Result<Vec<_>>>()
                .map(Self::from_records),
            Ok(other) => anyhow::bail!("expected columns or rows, got {other}"),
            Err(_) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .enumerate()
                .map(|(index, line)| {
                    let row = serde_json::from_str(line)
                        .with_context(|| format!("invalid json on row {index}"))?;
                    into_record(index, row)
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::from_records),
        }
    }

    /// Reads a dataset from a `.json` or `.jsonl` file, see [`Dataset::from_json_str`]
    ///
    /// # Errors
    ///
    /// Errors if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs_err::read_to_string(path)?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse dataset {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

fn into_record(index: usize, row: Value) -> Result<Map<String, Value>> {
    match row {
        Value::Object(record) => Ok(record),
        other => anyhow::bail!("row {index} is not an object: {other}"),
    }
}

/// Where the evaluator gets its data from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A dataset already in memory
    Dataset(Dataset),
    /// A name, resolved through a [`DatasetLoader`]
    Named(String),
}

impl From<Dataset> for DataSource {
    fn from(dataset: Dataset) -> Self {
        DataSource::Dataset(dataset)
    }
}

impl From<&str> for DataSource {
    fn from(name: &str) -> Self {
        DataSource::Named(name.to_string())
    }
}

impl From<String> for DataSource {
    fn from(name: String) -> Self {
        DataSource::Named(name)
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
/// Resolves a dataset by name
pub trait DatasetLoader: Send + Sync + Debug {
    async fn load(&self, name: &str) -> Result<Dataset>;
}

/// Loads datasets from json files in a directory.
///
/// A name resolves to `<root>/<name>.json`, then `<root>/<name>.jsonl`, then `<root>/<name>`.
#[derive(Debug, Clone)]
pub struct JsonDatasetLoader {
    root: PathBuf,
}

impl JsonDatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        [
            self.root.join(format!("{name}.json")),
            self.root.join(format!("{name}.jsonl")),
            self.root.join(name),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
    }
}

impl Default for JsonDatasetLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl DatasetLoader for JsonDatasetLoader {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn load(&self, name: &str) -> Result<Dataset> {
        let path = self
            .resolve(name)
            .with_context(|| format!("no dataset named {name} in {}", self.root.display()))?;

        tracing::debug!(path = %path.display(), "loading dataset");
        Dataset::from_path(path)
    }
}
