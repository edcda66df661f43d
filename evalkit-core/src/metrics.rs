use std::sync::OnceLock;

use metrics::{Label, counter, describe_counter};

static METRICS_INIT: OnceLock<bool> = OnceLock::new();

/// Lazily describes all the metrics used in this module once
pub fn lazy_init() {
    METRICS_INIT.get_or_init(|| {
        describe_counter!("evalkit.evaluations", "completed evaluations");
        describe_counter!(
            "evalkit.predictions",
            "predictions scored across all evaluations"
        );
        true
    });
}

/// Emits usage for a completed evaluation
pub fn emit_evaluation(task: &str, metric: &str, predictions: u64) {
    let labels = [
        Label::new("task", task.to_string()),
        Label::new("metric", metric.to_string()),
    ];

    lazy_init();
    counter!("evalkit.evaluations", labels.iter()).increment(1);
    counter!("evalkit.predictions", labels.iter()).increment(predictions);
}
