//! Bandwidth selection
//!
//! Implements Silverman's rule of thumb:
//!
//! h = 0.9 * min(σ, IQR / 1.34) * n^(-1/5)
//!
//! with a fallback chain for degenerate samples. When the robust spread
//! estimate is zero the standard deviation is used instead, and when that
//! is zero too the spread is taken as 1. An empty sample gets
//! [`FALLBACK_BANDWIDTH`]. The result is always positive and finite.
//!
//! Quartiles are taken by plain order-statistic indexing
//! (`sorted[floor(0.25 n)]`, `sorted[floor(0.75 n)]`) without interpolation.

use serde::{Deserialize, Serialize};

/// Bandwidth used when the sample carries no usable spread information
pub const FALLBACK_BANDWIDTH: f64 = 1.0;

/// Multiplier in Silverman's rule
pub const SILVERMAN_FACTOR: f64 = 0.9;

/// IQR of the standard normal distribution (rounded as in Silverman's text)
pub const IQR_NORMAL_SCALE: f64 = 1.34;

/// How the bandwidth for a sample is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BandwidthRule {
    /// Silverman's rule of thumb, scaled by `adjust`
    Silverman {
        #[serde(default = "default_adjust")]
        adjust: f64,
    },
    /// Use this bandwidth regardless of the sample
    Fixed { value: f64 },
}

fn default_adjust() -> f64 {
    1.0
}

impl Default for BandwidthRule {
    fn default() -> Self {
        BandwidthRule::Silverman {
            adjust: default_adjust(),
        }
    }
}

impl BandwidthRule {
    /// Resolve the bandwidth for a sample
    ///
    /// A fixed value or adjusted result that is not positive and finite
    /// resolves to [`FALLBACK_BANDWIDTH`].
    pub fn select(&self, sample: &[f64]) -> f64 {
        let h = match *self {
            BandwidthRule::Silverman { adjust } => silverman_bandwidth(sample) * adjust,
            BandwidthRule::Fixed { value } => value,
        };
        sanitize_bandwidth(h)
    }
}

/// Compute the Silverman rule-of-thumb bandwidth for a sample
pub fn silverman_bandwidth(sample: &[f64]) -> f64 {
    let n = sample.len();
    if n == 0 {
        return FALLBACK_BANDWIDTH;
    }

    let std_dev = sample_std_dev(sample);
    let iqr = interquartile_range(sample).unwrap_or(0.0);
    let spread = spread_estimate(std_dev, iqr);

    SILVERMAN_FACTOR * spread * (n as f64).powf(-0.2)
}

/// Spread estimate `A` used by Silverman's rule
///
/// Takes `min(σ, IQR / 1.34)`, then falls back to `σ`, then to 1.
/// Non-finite inputs count as zero.
pub fn spread_estimate(std_dev: f64, iqr: f64) -> f64 {
    let std_dev = usable(std_dev);
    let robust = usable(iqr / IQR_NORMAL_SCALE);

    let a = std_dev.min(robust);
    if a > 0.0 {
        a
    } else if std_dev > 0.0 {
        std_dev
    } else {
        1.0
    }
}

/// Unbiased sample standard deviation (divides by `n - 1`)
///
/// Returns 0 for fewer than two values.
pub fn sample_std_dev(sample: &[f64]) -> f64 {
    let n = sample.len();
    if n < 2 {
        return 0.0;
    }

    let mean = sample.iter().sum::<f64>() / n as f64;
    let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// First and third quartiles by order-statistic indexing
///
/// Returns `None` for an empty sample.
pub fn quartiles(sample: &[f64]) -> Option<(f64, f64)> {
    let n = sample.len();
    if n == 0 {
        return None;
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = sorted[(n as f64 * 0.25).floor() as usize];
    let q3 = sorted[((n as f64 * 0.75).floor() as usize).min(n - 1)];
    Some((q1, q3))
}

/// Interquartile range `Q3 - Q1`
pub fn interquartile_range(sample: &[f64]) -> Option<f64> {
    quartiles(sample).map(|(q1, q3)| q3 - q1)
}

/// Replace a bandwidth that would poison the density sum
pub(crate) fn sanitize_bandwidth(h: f64) -> f64 {
    if h.is_finite() && h > 0.0 {
        h
    } else {
        tracing::warn!(
            "Bandwidth {} is not positive and finite, using fallback {}",
            h,
            FALLBACK_BANDWIDTH
        );
        FALLBACK_BANDWIDTH
    }
}

fn usable(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        0.0
    }
}
