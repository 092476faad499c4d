//! Time-dependent dielectric breakdown.

use serde::{Deserialize, Serialize};

use oldspot_trace::{quantity, DataPoint};

use crate::params::{DeviceParams, TddbParams};
use crate::K_B;

/// TDDB wearout model (Srinivasan et al., ISCA 2004):
/// `MTTF = Vdd^(a - b*T) * exp((X + Y/T + Z*T) / (k_B * T))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tddb {
    pub device: DeviceParams,
    pub params: TddbParams,
}

impl Default for Tddb {
    fn default() -> Self {
        Self {
            device: DeviceParams::default(),
            params: TddbParams::default(),
        }
    }
}

impl Tddb {
    /// Time to failure (s). Gate-oxide breakdown is driven by field and
    /// temperature alone; the duty cycle and failure criterion are unused.
    pub fn time_to_failure(&self, point: &DataPoint, _duty_cycle: f64, _fail: Option<f64>) -> f64 {
        let vdd = point.value(quantity::VDD);
        let t = point.value(quantity::TEMPERATURE);
        let p = &self.params;

        vdd.powf(p.a - p.b * t) * ((p.x + p.y / t + p.z * t) / (K_B * t)).exp()
    }
}
