//! Paired bootstrap over a metric.
//!
//! Every resample draws `n` example indices with replacement and computes the metric on the
//! resampled predictions and references together. Every key of the metric result gets its own
//! interval, all from the same resamples.
//!
//! Intervals are bias corrected and accelerated (BCa) by default. The bias correction comes from
//! the share of resampled scores below the original score, the acceleration from the
//! leave-one-out scores of every example.
use std::collections::BTreeMap;

use evalkit_core::{BootstrapScore, EvaluationError, Label, Metric, MetricResult};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

use crate::config::{ComputeConfig, IntervalMethod, MAX_N_RESAMPLES};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bootstrap {
    confidence_level: f64,
    n_resamples: usize,
    random_state: Option<u64>,
    method: IntervalMethod,
}

impl Bootstrap {
    pub fn new(confidence_level: f64, n_resamples: usize, random_state: Option<u64>) -> Self {
        Self {
            confidence_level,
            n_resamples,
            random_state,
            method: IntervalMethod::default(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: IntervalMethod) -> Self {
        self.method = method;
        self
    }

    pub fn from_config(config: &ComputeConfig) -> Self {
        Self::new(
            config.confidence_level,
            config.n_resamples,
            config.random_state,
        )
        .with_method(config.method)
    }

    /// Checks the confidence level and the number of resamples
    ///
    /// # Errors
    ///
    /// Errors with [`EvaluationError::InvalidConfig`] if the confidence level is not between 0
    /// and 1, or the number of resamples is below 2 or above [`MAX_N_RESAMPLES`]
    pub fn check(&self) -> Result<(), EvaluationError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(EvaluationError::InvalidConfig(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }

        if self.n_resamples < 2 {
            return Err(EvaluationError::InvalidConfig(format!(
                "n_resamples must be at least 2, got {}",
                self.n_resamples
            )));
        }

        if self.n_resamples > MAX_N_RESAMPLES {
            return Err(EvaluationError::InvalidConfig(format!(
                "n_resamples must be at most {MAX_N_RESAMPLES}, got {}",
                self.n_resamples
            )));
        }

        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Scores the metric with a confidence interval and standard error for every key
    ///
    /// # Errors
    ///
    /// Errors if the settings are out of range, if there are fewer than two examples, or if the
    /// metric fails on the original data, a resample or a leave-one-out sample
    #[tracing::instrument(
        skip_all,
        fields(metric = metric.name(), n_resamples = self.n_resamples, method = %self.method)
    )]
    pub fn run(
        &self,
        metric: &dyn Metric,
        predictions: &[Label],
        references: &[Label],
    ) -> Result<BTreeMap<String, BootstrapScore>, EvaluationError> {
        self.check()?;

        let n = predictions.len();
        if n < 2 {
            return Err(EvaluationError::InvalidConfig(format!(
                "bootstrapping needs at least 2 examples, got {n}"
            )));
        }

        let original = metric
            .compute(predictions, references)
            .map_err(EvaluationError::MetricFailed)?;

        let mut samples: BTreeMap<&str, Vec<f64>> =
            original.keys().map(|key| (key, Vec::new())).collect();

        let mut rng = self.rng();
        let mut resampled_predictions = Vec::with_capacity(n);
        let mut resampled_references = Vec::with_capacity(n);

        for _ in 0..self.n_resamples {
            resampled_predictions.clear();
            resampled_references.clear();
            for _ in 0..n {
                let index = rng.random_range(0..n);
                resampled_predictions.push(predictions[index].clone());
                resampled_references.push(references[index].clone());
            }

            let result = metric
                .compute(&resampled_predictions, &resampled_references)
                .map_err(EvaluationError::MetricFailed)?;
            push_scores(&mut samples, &result, "resample")?;
        }

        let jackknife = match self.method {
            IntervalMethod::Bca => leave_one_out(metric, predictions, references, &original)?,
            IntervalMethod::Percentile => BTreeMap::new(),
        };

        let tail = (1.0 - self.confidence_level) / 2.0;
        let scores = samples
            .into_iter()
            .map(|(key, mut scores)| {
                scores.sort_by(f64::total_cmp);
                let score = original.get(key).unwrap_or_default();
                let confidence_interval = match jackknife.get(key) {
                    Some(jackknife) => bca_interval(&scores, score, jackknife, tail),
                    None => (percentile(&scores, tail), percentile(&scores, 1.0 - tail)),
                };
                let score = BootstrapScore {
                    score,
                    confidence_interval,
                    standard_error: standard_error(&scores),
                };
                tracing::debug!(key, ?score, "bootstrapped score");
                (key.to_string(), score)
            })
            .collect();

        Ok(scores)
    }
}

fn push_scores(
    samples: &mut BTreeMap<&str, Vec<f64>>,
    result: &MetricResult,
    sample: &str,
) -> Result<(), EvaluationError> {
    for (key, scores) in samples.iter_mut() {
        let score = result.get(key).ok_or_else(|| {
            EvaluationError::MetricFailed(anyhow::anyhow!(
                "metric did not return `{key}` for a {sample}"
            ))
        })?;
        scores.push(score);
    }
    Ok(())
}

/// Metric scores with each example left out in turn
fn leave_one_out<'a>(
    metric: &dyn Metric,
    predictions: &[Label],
    references: &[Label],
    original: &'a MetricResult,
) -> Result<BTreeMap<&'a str, Vec<f64>>, EvaluationError> {
    let mut samples: BTreeMap<&str, Vec<f64>> = original
        .keys()
        .map(|key| (key, Vec::with_capacity(predictions.len())))
        .collect();

    for left_out in 0..predictions.len() {
        let kept = |labels: &[Label]| {
            labels
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != left_out)
                .map(|(_, label)| label.clone())
                .collect::<Vec<_>>()
        };

        let result = metric
            .compute(&kept(predictions), &kept(references))
            .map_err(EvaluationError::MetricFailed)?;
        push_scores(&mut samples, &result, "leave-one-out sample")?;
    }

    Ok(samples)
}

/// BCa interval from sorted resampled scores, with `tail` the probability outside each bound
fn bca_interval(sorted: &[f64], original: f64, jackknife: &[f64], tail: f64) -> (f64, f64) {
    let bias = normal_ppf(percentile_of_score(sorted, original));
    let (lower, upper) = bca_levels(bias, acceleration(jackknife), tail);

    if lower.is_finite() && upper.is_finite() {
        (percentile(sorted, lower), percentile(sorted, upper))
    } else {
        tracing::warn!(
            bias,
            "no bias correction possible, falling back to a percentile interval"
        );
        (percentile(sorted, tail), percentile(sorted, 1.0 - tail))
    }
}

/// Quantile levels of the BCa bounds
fn bca_levels(bias: f64, acceleration: f64, tail: f64) -> (f64, f64) {
    let adjust = |z: f64| {
        let shifted = bias + z;
        normal_cdf(bias + shifted / (1.0 - acceleration * shifted))
    };

    let z = normal_ppf(tail);
    (adjust(z), adjust(-z))
}

/// Skewness of the leave-one-out scores, zero when they do not vary
#[allow(clippy::cast_precision_loss)]
fn acceleration(jackknife: &[f64]) -> f64 {
    if jackknife.is_empty() {
        return 0.0;
    }

    let mean = jackknife.iter().sum::<f64>() / jackknife.len() as f64;
    let (cubes, squares) = jackknife.iter().fold((0.0, 0.0), |(cubes, squares), value| {
        let deviation = mean - value;
        (cubes + deviation.powi(3), squares + deviation.powi(2))
    });

    let denominator = 6.0 * squares.powf(1.5);
    if denominator > 0.0 {
        cubes / denominator
    } else {
        0.0
    }
}

/// Share of values below `score`, counting ties as half
#[allow(clippy::cast_precision_loss)]
fn percentile_of_score(values: &[f64], score: f64) -> f64 {
    let below = values.iter().filter(|value| **value < score).count();
    let at_or_below = values.iter().filter(|value| **value <= score).count();
    (below + at_or_below) as f64 / (2 * values.len()) as f64
}

/// Quantile `q` of sorted values, interpolating linearly between the closest ranks
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };

    let rank = q.clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
}

/// Sample standard deviation (ddof = 1)
#[allow(clippy::cast_precision_loss)]
fn standard_error(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
    variance.sqrt()
}

/// Standard normal cumulative distribution
fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, accurate to about 1e-7
fn erfc(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 10] = [
        -1.265_512_23,
        1.000_023_68,
        0.374_091_96,
        0.096_784_18,
        -0.186_288_06,
        0.278_868_07,
        -1.135_203_98,
        1.488_515_87,
        -0.822_152_23,
        0.170_872_77,
    ];

    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let polynomial = COEFFICIENTS
        .iter()
        .rev()
        .fold(0.0, |acc, coefficient| acc * t + coefficient);
    let tail = t * (-z * z + polynomial).exp();

    if x >= 0.0 { tail } else { 2.0 - tail }
}

/// Inverse of [`normal_cdf`], infinite at 0 and 1
fn normal_ppf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const LOW: f64 = 0.024_25;

    fn horner(coefficients: &[f64], x: f64) -> f64 {
        coefficients
            .iter()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }
    let outer = |q: f64| horner(&C, q) / (horner(&D, q) * q + 1.0);

    if p <= 0.0 {
        f64::NEG_INFINITY
    } else if p >= 1.0 {
        f64::INFINITY
    } else if p < LOW {
        outer((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - LOW {
        -outer((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        horner(&A, r) * q / (horner(&B, r) * r + 1.0)
    }
}
