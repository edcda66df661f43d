//! Precision, recall and f1 for single label classification.
use std::collections::BTreeMap;

use anyhow::Result;
use derive_builder::Builder;
use evalkit_core::{Label, Metric, MetricResult};
use itertools::Itertools;

use crate::average::Average;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
    support: usize,
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(self, other: Counts) -> Counts {
        Counts {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
            support: self.support + other.support,
        }
    }
}

/// Per-class counts over every label seen in either predictions or references
fn class_counts<'a>(
    predictions: &'a [Label],
    references: &'a [Label],
) -> BTreeMap<&'a Label, Counts> {
    let mut classes: BTreeMap<&Label, Counts> = predictions
        .iter()
        .chain(references)
        .map(|label| (label, Counts::default()))
        .collect();

    for (prediction, reference) in predictions.iter().zip(references) {
        if prediction == reference {
            classes.entry(prediction).or_default().true_positives += 1;
        } else {
            classes.entry(prediction).or_default().false_positives += 1;
            classes.entry(reference).or_default().false_negatives += 1;
        }
        classes.entry(reference).or_default().support += 1;
    }

    classes
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, Copy)]
enum Score {
    Precision,
    Recall,
    F1,
}

impl Score {
    fn of(self, counts: Counts) -> f64 {
        let Counts {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            ..
        } = counts;

        match self {
            Score::Precision => ratio(tp, tp + fp),
            Score::Recall => ratio(tp, tp + fn_),
            Score::F1 => ratio(2 * tp, 2 * tp + fp + fn_),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn averaged(self, average: &Average, predictions: &[Label], references: &[Label]) -> Result<f64> {
        crate::check_inputs(predictions, references)?;
        let classes = class_counts(predictions, references);

        let score = match average {
            Average::Binary { pos_label } => {
                if classes.len() > 2 {
                    anyhow::bail!(
                        "target is multiclass ({} classes) but average is binary, use micro, macro or weighted averaging",
                        classes.len()
                    );
                }
                if classes.len() == 2 && !classes.contains_key(pos_label) {
                    anyhow::bail!(
                        "pos_label {pos_label} is not a valid label, labels are: {}",
                        classes.keys().join(", ")
                    );
                }

                classes
                    .get(pos_label)
                    .map_or(0.0, |counts| self.of(*counts))
            }
            Average::Micro => self.of(
                classes
                    .values()
                    .copied()
                    .fold(Counts::default(), |total, counts| total + counts),
            ),
            Average::Macro => {
                classes.values().map(|counts| self.of(*counts)).sum::<f64>() / classes.len() as f64
            }
            Average::Weighted => {
                let total_support: usize = classes.values().map(|counts| counts.support).sum();
                let weighted: f64 = classes
                    .values()
                    .map(|counts| self.of(*counts) * counts.support as f64)
                    .sum();

                if total_support == 0 {
                    0.0
                } else {
                    weighted / total_support as f64
                }
            }
        };

        tracing::trace!(?average, score, "averaged classification score");
        Ok(score)
    }
}

macro_rules! classification_metric {
    ($(#[$doc:meta])* $metric:ident, $builder:ident, $score:expr, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
        #[builder(setter(into), build_fn(error = "anyhow::Error"))]
        pub struct $metric {
            #[builder(default)]
            average: Average,
        }

        impl $metric {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn builder() -> $builder {
                $builder::default()
            }

            pub fn with_average(average: Average) -> Self {
                Self { average }
            }

            pub fn average(&self) -> &Average {
                &self.average
            }
        }

        impl Metric for $metric {
            fn name(&self) -> &str {
                $name
            }

            fn compute(&self, predictions: &[Label], references: &[Label]) -> Result<MetricResult> {
                let score = $score.averaged(&self.average, predictions, references)?;
                Ok(MetricResult::from([($name, score)]))
            }
        }
    };
}

classification_metric!(
    /// Fraction of predicted positives that are correct
    Precision,
    PrecisionBuilder,
    Score::Precision,
    "precision"
);

classification_metric!(
    /// Fraction of actual positives that are found
    Recall,
    RecallBuilder,
    Score::Recall,
    "recall"
);

classification_metric!(
    /// Harmonic mean of precision and recall
    F1,
    F1Builder,
    Score::F1,
    "f1"
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn labels(values: &[i64]) -> Vec<Label> {
        values.iter().copied().map(Label::from).collect()
    }

    fn score(metric: &dyn Metric, predictions: &[i64], references: &[i64]) -> f64 {
        let result = metric
            .compute(&labels(predictions), &labels(references))
            .unwrap();
        result.get(metric.name()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    const MULTI_TRUE: &[i64] = &[0, 1, 2, 0, 1, 2];
    const MULTI_PRED: &[i64] = &[0, 2, 1, 0, 0, 1];

    #[test_case(Average::Macro, 0.8 / 3.0; "macro")]
    #[test_case(Average::Micro, 1.0 / 3.0; "micro")]
    #[test_case(Average::Weighted, 1.6 / 6.0; "weighted")]
    fn test_f1_multiclass(average: Average, expected: f64) {
        assert_close(
            score(&F1::with_average(average), MULTI_PRED, MULTI_TRUE),
            expected,
        );
    }

    #[test]
    fn test_precision_and_recall_macro() {
        assert_close(
            score(&Precision::with_average(Average::Macro), MULTI_PRED, MULTI_TRUE),
            2.0 / 9.0,
        );
        assert_close(
            score(&Recall::with_average(Average::Macro), MULTI_PRED, MULTI_TRUE),
            1.0 / 3.0,
        );
    }

    #[test]
    fn test_binary_defaults_to_positive_one() {
        let predictions = [1, 1, 0, 1];
        let references = [1, 0, 1, 1];

        assert_close(score(&Precision::new(), &predictions, &references), 2.0 / 3.0);
        assert_close(score(&Recall::new(), &predictions, &references), 2.0 / 3.0);
        assert_close(score(&F1::new(), &predictions, &references), 2.0 / 3.0);
    }

    #[test]
    fn test_binary_perfect() {
        assert_close(score(&F1::new(), &[1, 0], &[1, 0]), 1.0);
    }

    #[test]
    fn test_binary_custom_pos_label() {
        let metric = Recall::builder()
            .average(Average::Binary {
                pos_label: Label::Integer(0),
            })
            .build()
            .unwrap();

        assert_close(score(&metric, &[1, 1, 0, 1], &[1, 0, 1, 0]), 0.0);
        assert_eq!(metric.name(), "recall");
    }

    #[test]
    fn test_zero_division_scores_zero() {
        // Nothing is predicted positive
        assert_close(score(&Precision::new(), &[0, 0], &[1, 0]), 0.0);
        // Only one class present and it is not the positive one
        assert_close(score(&F1::new(), &[0, 0], &[0, 0]), 0.0);
    }

    #[test]
    fn test_binary_rejects_multiclass() {
        let err = F1::new()
            .compute(&labels(MULTI_PRED), &labels(MULTI_TRUE))
            .unwrap_err();

        insta::assert_snapshot!(
            err.to_string(),
            @"target is multiclass (3 classes) but average is binary, use micro, macro or weighted averaging"
        );
    }

    #[test]
    fn test_binary_rejects_missing_pos_label() {
        let predictions = vec![Label::from("POSITIVE"), Label::from("NEGATIVE")];

        let err = F1::new().compute(&predictions, &predictions).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"pos_label 1 is not a valid label, labels are: NEGATIVE, POSITIVE"
        );
    }

    #[test]
    fn test_text_labels_macro() {
        let predictions = vec![Label::from("yurt"), Label::from("tent")];
        let references = vec![Label::from("yurt"), Label::from("yurt")];

        let result = F1::with_average(Average::Macro)
            .compute(&predictions, &references)
            .unwrap();
        // yurt: tp 1, fn 1 -> 2/3, tent: fp 1 -> 0
        assert_close(result.get("f1").unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn test_class_counts() {
        let predictions = labels(&[1, 1, 0]);
        let references = labels(&[1, 0, 0]);
        let counts = class_counts(&predictions, &references);

        assert_eq!(
            counts[&Label::Integer(1)],
            Counts {
                true_positives: 1,
                false_positives: 1,
                false_negatives: 0,
                support: 1,
            }
        );
        assert_eq!(
            counts[&Label::Integer(0)],
            Counts {
                true_positives: 1,
                false_positives: 0,
                false_negatives: 1,
                support: 2,
            }
        );
    }

    #[test]
    fn test_class_counts_include_reference_only_labels() {
        let predictions = vec![Label::from("cat"), Label::from("cat")];
        let references = vec![Label::from("cat"), Label::from("dog")];
        let counts = class_counts(&predictions, &references);

        assert_eq!(
            counts.keys().copied().collect::<Vec<_>>(),
            vec![&Label::from("cat"), &Label::from("dog")]
        );
        assert_eq!(
            counts[&Label::from("dog")],
            Counts {
                true_positives: 0,
                false_positives: 0,
                false_negatives: 1,
                support: 1,
            }
        );
    }
}
