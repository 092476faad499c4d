//! The Weibull failure distribution.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::gamma;

/// A stretch of operating time over which a device ages at a constant rate.
///
/// Intermediate form between a trace sample and a [`Weibull`]: the wearout
/// models reduce each sample to the mean time to failure the device would
/// have if it ran under those conditions forever, and `duration` says how
/// long it actually did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MttfSegment {
    /// Length of the segment (s).
    pub duration: f64,
    /// Mean time to failure under the segment's operating conditions (s).
    /// Infinite when the conditions cause no wear.
    pub mttf: f64,
}

/// A Weibull distribution over times to failure,
/// `R(t) = exp(-(t/alpha)^beta)`.
///
/// `alpha` is the characteristic life and `beta` the shape; aging
/// mechanisms all use `beta = 2` per JEDEC JEP122H. `alpha` may be
/// infinite, meaning the device never wears out; all queries propagate the
/// infinity rather than treating it as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weibull {
    alpha: f64,
    beta: f64,
}

impl Weibull {
    /// Create a distribution from its rate and shape parameters.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// A distribution under which the device never fails.
    pub fn never(beta: f64) -> Self {
        Self {
            alpha: f64::INFINITY,
            beta,
        }
    }

    /// Estimate the distribution of a device whose mean time to failure
    /// varies over a piecewise-stationary operating history.
    ///
    /// Each segment's MTTF is converted to a rate parameter
    /// `alpha_i = mttf_i / Gamma(1/beta + 1)`, and the aggregate rate is the
    /// time-weighted harmonic average of the segment rates, following the
    /// system-level reliability model of Xiang et al. (CODES+ISSS 2010).
    /// Segments with infinite MTTF contribute no aging; a history with no
    /// aging at all yields an infinite rate parameter.
    pub fn from_segments(beta: f64, segments: &[MttfSegment]) -> Self {
        if segments.is_empty() {
            return Self::never(beta);
        }

        let gamma_factor = gamma(1.0 / beta + 1.0);
        let mut total_time = 0.0;
        let mut weighted_rate = 0.0;
        for segment in segments {
            let alpha_i = segment.mttf / gamma_factor;
            total_time += segment.duration;
            weighted_rate += segment.duration / alpha_i;
        }

        Self {
            alpha: total_time / weighted_rate,
            beta,
        }
    }

    /// The fraction of a device population still alive at time `t`.
    pub fn reliability(&self, t: f64) -> f64 {
        (-(t / self.alpha).powf(self.beta)).exp()
    }

    /// The time at which reliability drops to `r`.
    ///
    /// Infinite when the device never wears out. `r` must be positive; the
    /// simulator's sampler never draws zero.
    pub fn inverse(&self, r: f64) -> f64 {
        if self.alpha.is_infinite() {
            return f64::INFINITY;
        }
        self.alpha * (-r.ln()).powf(1.0 / self.beta)
    }

    /// Mean time to failure, `alpha * Gamma(1/beta + 1)`.
    pub fn mttf(&self) -> f64 {
        self.alpha * gamma(1.0 / self.beta + 1.0)
    }

    /// The rate (characteristic life) parameter.
    pub fn rate(&self) -> f64 {
        self.alpha
    }

    /// The shape parameter.
    pub fn shape(&self) -> f64 {
        self.beta
    }
}

/// The distribution of a device subject to two independent competing
/// failure processes: pointwise product of the reliability functions,
/// `1/alpha = ((1/alpha_a)^beta + (1/alpha_b)^beta)^(1/beta)`.
///
/// Panics if the shapes differ; the product of Weibull distributions with
/// different shape parameters is not Weibull.
impl Mul for Weibull {
    type Output = Weibull;

    fn mul(self, other: Weibull) -> Weibull {
        assert!(
            self.beta == other.beta,
            "product of Weibull distributions with shapes {} and {} is not a Weibull distribution",
            self.beta,
            other.beta
        );
        let alpha = ((1.0 / self.alpha).powf(self.beta) + (1.0 / other.alpha).powf(self.beta))
            .powf(-1.0 / self.beta);
        Weibull {
            alpha,
            beta: self.beta,
        }
    }
}
