//! Hot-carrier injection.

use serde::{Deserialize, Serialize};

use oldspot_trace::{quantity, DataPoint};

use crate::params::{DeviceParams, HciParams};
use crate::{failure_threshold, EV_PER_J, FAIL_DEFAULT, K_B, Q};

/// Hot-carrier injection wearout model.
///
/// Closed-form inversion of the ExtraTime degradation model (Oboril and
/// Tahoori, DSN 2012): the threshold shift grows as a power of the number
/// of stress cycles, so the cycle count at the failure threshold divides by
/// the switching rate to give a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hci {
    pub device: DeviceParams,
    pub params: HciParams,
}

impl Default for Hci {
    fn default() -> Self {
        Self {
            device: DeviceParams::default(),
            params: HciParams::default(),
        }
    }
}

impl Hci {
    /// Time to failure (s). A device that never switches suffers no
    /// hot-carrier stress (the result is infinite at zero duty cycle).
    pub fn time_to_failure(&self, point: &DataPoint, duty_cycle: f64, fail: Option<f64>) -> f64 {
        let fail = fail.unwrap_or(FAIL_DEFAULT);
        let vdd = point.value(quantity::VDD);
        let temperature = point.value(quantity::TEMPERATURE);
        let frequency = point.value(quantity::FREQUENCY);

        let d = &self.device;
        let p = &self.params;
        let d_vth_fail = failure_threshold(vdd, d.vt0_n, fail, d.alpha);

        // Thermal voltage and drain saturation voltage.
        let v_t = K_B / EV_PER_J * temperature / Q;
        let v_dsat = ((vdd - d.vt0_n + 2.0 * v_t) * d.l * p.e_sat)
            / (vdd - d.vt0_n + 2.0 * v_t + p.a_bulk * d.l * p.e_sat);
        // Lateral field in the pinch-off region and vertical oxide field.
        let e_m = (vdd - v_dsat) / p.l;
        let e_ox = (vdd - d.vt0_n) / d.t_ox;
        let a_hci = Q / d.c_ox * p.k * (d.c_ox * (vdd - d.vt0_n)).sqrt();

        let cycles = (d_vth_fail
            / (a_hci
                * (e_ox / p.e0).exp()
                * (-p.phi_it / EV_PER_J / (Q * p.lambda * e_m)).exp()))
        .powf(1.0 / p.n);

        cycles / (duty_cycle * frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operating_point(vdd: f64, frequency: f64) -> DataPoint {
        let mut point = DataPoint::new(1.0, 1.0);
        point.set(quantity::VDD, vdd);
        point.set(quantity::TEMPERATURE, 350.0);
        point.set(quantity::FREQUENCY, frequency);
        point
    }

    #[test]
    fn zero_duty_cycle_never_fails() {
        let hci = Hci::default();
        let ttf = hci.time_to_failure(&operating_point(1.0, 1e9), 0.0, None);
        assert!(ttf.is_infinite());
    }

    #[test]
    fn nominal_conditions_give_finite_lifetime() {
        let hci = Hci::default();
        let ttf = hci.time_to_failure(&operating_point(1.0, 1e9), 1.0, None);
        assert!(ttf.is_finite());
        assert!(ttf > 0.0);
    }

    #[test]
    fn faster_clocks_fail_sooner() {
        let hci = Hci::default();
        let slow = hci.time_to_failure(&operating_point(1.0, 1e8), 1.0, None);
        let fast = hci.time_to_failure(&operating_point(1.0, 1e9), 1.0, None);
        assert!((slow / fast - 10.0).abs() < 1e-6);
    }

    #[test]
    fn higher_vdd_fails_sooner() {
        let hci = Hci::default();
        let low = hci.time_to_failure(&operating_point(0.9, 1e9), 1.0, None);
        let high = hci.time_to_failure(&operating_point(1.1, 1e9), 1.0, None);
        assert!(high < low);
    }
}
