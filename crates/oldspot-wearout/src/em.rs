//! Electromigration.

use serde::{Deserialize, Serialize};

use oldspot_trace::diag::warn_once;
use oldspot_trace::{quantity, DataPoint};

use crate::params::{DeviceParams, EmParams};
use crate::K_B;

/// Electromigration wearout model, Black's equation:
/// `MTTF = A * j^-n * exp(Ea / (k_B * T))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Em {
    pub device: DeviceParams,
    pub params: EmParams,
}

impl Default for Em {
    fn default() -> Self {
        Self {
            device: DeviceParams::default(),
            params: EmParams::default(),
        }
    }
}

impl Em {
    /// Time to failure (s). Electromigration depends on current density
    /// and temperature only; the duty cycle and failure criterion are
    /// unused.
    pub fn time_to_failure(&self, point: &DataPoint, _duty_cycle: f64, _fail: Option<f64>) -> f64 {
        let temperature = point.value(quantity::TEMPERATURE);
        let Some(j) = self.current_density(point) else {
            warn_once(
                "trace has no current, current density, or power data; \
                 electromigration contributes no stress",
            );
            return f64::INFINITY;
        };

        self.params.a * j.powf(-self.params.n) * (self.params.e_a / (K_B * temperature)).exp()
    }

    /// Resolve the interconnect current density from the trace, preferring
    /// a direct `current_density` column, then `current` over the wire
    /// cross-section, then an estimate from power draw.
    fn current_density(&self, point: &DataPoint) -> Option<f64> {
        let section = self.params.w * self.params.h;
        if let Some(j) = point.get(quantity::CURRENT_DENSITY) {
            return Some(j);
        }
        if let Some(current) = point.get(quantity::CURRENT) {
            return Some(current / section);
        }
        if let Some(power) = point.get(quantity::POWER) {
            warn_once(
                "trace has no current data; estimating current density from power draw",
            );
            return Some(power / point.value(quantity::VDD) / section);
        }
        None
    }
}
