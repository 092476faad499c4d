//! Weibull lifetime distributions and failure statistics.
//!
//! Every wearout mechanism modeled by this toolchain is assumed to produce
//! Weibull-distributed times to failure with shape parameter 2, following
//! JEDEC JEP122H. This crate provides the distribution itself, the
//! piecewise-stationary rate estimation used to fold a time-varying
//! operating trace into a single distribution, and summary statistics over
//! observed times to failure.

pub mod stats;
pub mod weibull;

pub use stats::TtfSummary;
pub use weibull::{MttfSegment, Weibull};

/// Gamma function via the Lanczos approximation (g = 7, n = 9).
pub fn gamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::INFINITY;
    }

    let g = 7;
    let coefficients = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut a = coefficients[0];
        for (i, &c) in coefficients.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        let t = x + g as f64 + 0.5;
        (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
    }
}

/// Linearly interpolate between two samples `(x, y)` of a function,
/// solving for the `y` at which the function crosses `x`.
pub fn linterp(x: f64, start: (f64, f64), end: (f64, f64)) -> f64 {
    start.1 + (end.1 - start.1) * (x - start.0) / (end.0 - start.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_matches_factorials() {
        assert!((gamma(1.0) - 1.0).abs() < 1e-10);
        assert!((gamma(2.0) - 1.0).abs() < 1e-10);
        assert!((gamma(3.0) - 2.0).abs() < 1e-10);
        assert!((gamma(4.0) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn gamma_at_half_integers() {
        // Gamma(1/2) = sqrt(pi), Gamma(3/2) = sqrt(pi)/2
        let sqrt_pi = std::f64::consts::PI.sqrt();
        assert!((gamma(0.5) - sqrt_pi).abs() < 1e-10);
        assert!((gamma(1.5) - sqrt_pi / 2.0).abs() < 1e-10);
    }

    #[test]
    fn gamma_of_nonpositive_is_infinite() {
        assert!(gamma(0.0).is_infinite());
        assert!(gamma(-1.0).is_infinite());
    }

    #[test]
    fn linterp_midpoint() {
        assert_eq!(linterp(1.5, (1.0, 10.0), (2.0, 20.0)), 15.0);
    }

    #[test]
    fn linterp_at_endpoints() {
        assert_eq!(linterp(1.0, (1.0, 10.0), (2.0, 20.0)), 10.0);
        assert_eq!(linterp(2.0, (1.0, 10.0), (2.0, 20.0)), 20.0);
    }
}
