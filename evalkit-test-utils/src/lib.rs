#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]
//! Adapters, metrics and datasets for testing evaluations.

mod adapters;
mod metrics;

pub use adapters::*;
pub use metrics::*;

use evalkit_core::Dataset;
use serde_json::json;
use temp_dir::TempDir;

/// Two movie reviews, positive then negative, in the default text classification columns
pub fn movie_reviews() -> Dataset {
    Dataset::from_columns([
        (
            "text",
            vec![
                json!("This movie is awesome"),
                json!("This movie is terrible"),
            ],
        ),
        ("label", vec![json!(1), json!(0)]),
    ])
    .expect("columns have equal length")
}

/// Writes `content` to `<name>` in a fresh temporary directory.
///
/// The directory is removed when the returned [`TempDir`] is dropped.
pub fn temp_file(name: &str, content: &str) -> TempDir {
    let dir = TempDir::new().expect("can create temp dir");
    fs_err::write(dir.path().join(name), content).expect("can write file");
    dir
}
