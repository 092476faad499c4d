//! Negative bias temperature instability.

use serde::{Deserialize, Serialize};

use oldspot_reliability::linterp;
use oldspot_trace::diag::warn_once;
use oldspot_trace::{quantity, DataPoint};

use crate::params::{DeviceParams, NbtiParams};
use crate::{failure_threshold, FAIL_DEFAULT, K_B};

/// Simulation step for the threshold-drift search (s). One day.
const DT: f64 = 3600.0 * 24.0;

/// NBTI wearout model.
///
/// The published degradation model is not invertible, so the time to
/// failure is found by stepping threshold-voltage drift forward in time
/// until it crosses the failure threshold, then linearly interpolating
/// between the last two samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nbti {
    pub device: DeviceParams,
    pub params: NbtiParams,
}

impl Default for Nbti {
    fn default() -> Self {
        Self {
            device: DeviceParams::default(),
            params: NbtiParams::default(),
        }
    }
}

impl Nbti {
    /// Threshold-voltage drift after `t` seconds of stress.
    ///
    /// `d_vth` is the drift accumulated so far; it feeds back only through
    /// the reduced overdrive voltage, while both trap populations are
    /// rebuilt from the absolute time. The effective duty cycle follows the
    /// ExtraTime recovery-aware weighting.
    pub fn degradation(
        &self,
        t: f64,
        vdd: f64,
        d_vth: f64,
        temperature: f64,
        duty_cycle: f64,
    ) -> f64 {
        let duty_cycle =
            (duty_cycle / (1.0 + ((1.0 - duty_cycle) / 2.0).sqrt())).powf(1.0 / 6.0);
        let mut v = vdd - self.device.vt0_p - d_vth;
        if v < 0.0 {
            warn_once(format!(
                "subthreshold VDD {vdd} not supported; operating at threshold instead"
            ));
            v = 0.0;
        }
        let p = &self.params;
        let e_ait = 2.0 / 3.0 * (p.e_akf - p.e_akr) + p.e_adh2 / 6.0;
        let d_n_it =
            p.a * v.powf(p.gamma_it) * (-e_ait / (K_B * temperature)).exp() * t.powf(1.0 / 6.0);
        let d_n_ht = p.b * v.powf(p.gamma_ht) * (-p.e_aht / (K_B * temperature)).exp();

        duty_cycle * 0.027e-12 * (d_n_it + d_n_ht)
    }

    /// Time to failure (s) at the given operating point. A device that is
    /// never under negative bias does not degrade.
    pub fn time_to_failure(&self, point: &DataPoint, duty_cycle: f64, fail: Option<f64>) -> f64 {
        let fail = fail.unwrap_or(FAIL_DEFAULT);
        if duty_cycle == 0.0 {
            return f64::INFINITY;
        }

        let vdd = point.value(quantity::VDD);
        let temperature = point.value(quantity::TEMPERATURE);
        let d_vth_fail = failure_threshold(vdd, self.device.vt0_p, fail, self.device.alpha);

        let mut d_vth = 0.0;
        let mut d_vth_prev = 0.0;
        let mut t = 0.0;
        while d_vth < d_vth_fail {
            d_vth_prev = d_vth;
            d_vth = self.degradation(t, vdd, d_vth, temperature, duty_cycle);
            t += DT;
        }
        t -= DT;

        if d_vth == 0.0 {
            0.0
        } else {
            linterp(d_vth_fail, (d_vth_prev, t - DT), (d_vth, t))
        }
    }
}
