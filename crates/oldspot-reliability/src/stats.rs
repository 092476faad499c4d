//! Summary statistics over observed times to failure.

use serde::{Deserialize, Serialize};

/// Multiplier for the 95% two-sided normal interval.
const Z_95: f64 = 1.96;

/// Mean, spread, and confidence interval of a component's observed times to
/// failure across Monte-Carlo iterations.
///
/// A component that never failed has no samples; its mean is NaN and must
/// not poison the statistics of other components. With fewer than two
/// samples the spread and interval are NaN as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtfSummary {
    /// Sample mean (s).
    pub mean: f64,
    /// Sample standard deviation (s).
    pub std_dev: f64,
    /// Lower bound of the confidence interval (s).
    pub ci_lower: f64,
    /// Upper bound of the confidence interval (s).
    pub ci_upper: f64,
    /// Confidence level that was requested.
    pub confidence: f64,
    /// Number of observed failures.
    pub samples: usize,
}

impl TtfSummary {
    /// Summarize a set of observed times to failure.
    ///
    /// The `confidence` level is recorded but reserved: the interval is
    /// always the 1.96-sigma normal approximation (95%) until a Student's t
    /// inverse is worth carrying.
    pub fn from_ttfs(ttfs: &[f64], confidence: f64) -> Self {
        let n = ttfs.len();
        let mean = if n == 0 {
            f64::NAN
        } else {
            ttfs.iter().sum::<f64>() / n as f64
        };

        let (std_dev, ci_lower, ci_upper) = if n < 2 {
            (f64::NAN, f64::NAN, f64::NAN)
        } else {
            let variance =
                ttfs.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            let std_dev = variance.sqrt();
            let half_width = Z_95 * std_dev / (n as f64).sqrt();
            (std_dev, mean - half_width, mean + half_width)
        };

        Self {
            mean,
            std_dev,
            ci_lower,
            ci_upper,
            confidence,
            samples: n,
        }
    }
}
