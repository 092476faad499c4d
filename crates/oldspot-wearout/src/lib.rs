//! Transistor wearout mechanism models.
//!
//! Four aging mechanisms are modeled, each reducing an operating point and a
//! duty cycle to a mean time to failure in seconds:
//!
//! - **NBTI** — negative bias temperature instability, by forward-simulating
//!   threshold-voltage drift (Joshi et al., IRPS 2012)
//! - **EM** — electromigration, via Black's equation
//! - **HCI** — hot-carrier injection, closed form from the ExtraTime model
//!   (Oboril and Tahoori, DSN 2012)
//! - **TDDB** — time-dependent dielectric breakdown (Srinivasan et al.,
//!   ISCA 2004)
//!
//! All mechanisms are assumed to produce Weibull-distributed failures with
//! shape parameter 2 (JEDEC JEP122H).

pub mod em;
pub mod hci;
pub mod nbti;
pub mod params;
pub mod tddb;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use oldspot_reliability::{MttfSegment, Weibull};
use oldspot_trace::DataPoint;

pub use em::Em;
pub use hci::Hci;
pub use nbti::Nbti;
pub use params::{read_params, DeviceParams};
pub use tddb::Tddb;

/// Electron charge (C).
pub const Q: f64 = 1.60217662e-19;
/// Boltzmann constant (eV/K).
pub const K_B: f64 = 8.6173303e-5;
/// Electron-volts per joule.
pub const EV_PER_J: f64 = 6.242e18;
/// Weibull shape parameter shared by every mechanism (JEDEC JEP122H).
pub const WEIBULL_SHAPE: f64 = 2.0;
/// Default relative delay change at which a device counts as failed.
pub const FAIL_DEFAULT: f64 = 0.05;

/// The threshold-voltage shift at which a `fail` relative delay change is
/// reached, from the alpha-power-law delay model.
pub fn failure_threshold(vdd: f64, vt0: f64, fail: f64, alpha: f64) -> f64 {
    (vdd - vt0) * (1.0 - (1.0 + fail).powf(-1.0 / alpha))
}

/// Identifies one of the modeled wearout mechanisms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MechanismKind {
    Nbti,
    Em,
    Hci,
    Tddb,
}

impl MechanismKind {
    /// Every modeled mechanism, in canonical order.
    pub const ALL: [MechanismKind; 4] = [
        MechanismKind::Nbti,
        MechanismKind::Em,
        MechanismKind::Hci,
        MechanismKind::Tddb,
    ];

    /// Conventional display name.
    pub fn name(&self) -> &'static str {
        match self {
            MechanismKind::Nbti => "NBTI",
            MechanismKind::Em => "EM",
            MechanismKind::Hci => "HCI",
            MechanismKind::Tddb => "TDDB",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MechanismKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nbti" => Ok(MechanismKind::Nbti),
            "em" => Ok(MechanismKind::Em),
            "hci" => Ok(MechanismKind::Hci),
            "tddb" => Ok(MechanismKind::Tddb),
            other => Err(format!("unknown aging mechanism {other:?}")),
        }
    }
}

/// A configured wearout mechanism model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Mechanism {
    Nbti(Nbti),
    Em(Em),
    Hci(Hci),
    Tddb(Tddb),
}

impl Mechanism {
    /// Create the named mechanism with its literature-default parameters.
    pub fn new(kind: MechanismKind) -> Self {
        match kind {
            MechanismKind::Nbti => Mechanism::Nbti(Nbti::default()),
            MechanismKind::Em => Mechanism::Em(Em::default()),
            MechanismKind::Hci => Mechanism::Hci(Hci::default()),
            MechanismKind::Tddb => Mechanism::Tddb(Tddb::default()),
        }
    }

    pub fn kind(&self) -> MechanismKind {
        match self {
            Mechanism::Nbti(_) => MechanismKind::Nbti,
            Mechanism::Em(_) => MechanismKind::Em,
            Mechanism::Hci(_) => MechanismKind::Hci,
            Mechanism::Tddb(_) => MechanismKind::Tddb,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Mean time to failure (s) for a device running at the given operating
    /// point with the given duty cycle. `fail` is the relative delay change
    /// counted as failure; `None` uses [`FAIL_DEFAULT`].
    pub fn time_to_failure(&self, point: &DataPoint, duty_cycle: f64, fail: Option<f64>) -> f64 {
        match self {
            Mechanism::Nbti(m) => m.time_to_failure(point, duty_cycle, fail),
            Mechanism::Em(m) => m.time_to_failure(point, duty_cycle, fail),
            Mechanism::Hci(m) => m.time_to_failure(point, duty_cycle, fail),
            Mechanism::Tddb(m) => m.time_to_failure(point, duty_cycle, fail),
        }
    }

    /// Fold a piecewise-stationary history of per-segment MTTFs into this
    /// mechanism's failure distribution.
    pub fn distribution(&self, segments: &[MttfSegment]) -> Weibull {
        Weibull::from_segments(WEIBULL_SHAPE, segments)
    }

    /// Set a named parameter, trying the mechanism's own parameters first
    /// and the shared device parameters second. Returns false if the key is
    /// not recognized by either.
    pub fn set_param(&mut self, key: &str, value: f64) -> bool {
        match self {
            Mechanism::Nbti(m) => m.params.set(key, value) || m.device.set(key, value),
            Mechanism::Em(m) => m.params.set(key, value) || m.device.set(key, value),
            Mechanism::Hci(m) => m.params.set(key, value) || m.device.set(key, value),
            Mechanism::Tddb(m) => m.params.set(key, value) || m.device.set(key, value),
        }
    }

    /// Apply a set of parameter overrides, warning once per unrecognized
    /// key.
    pub fn apply_params(&mut self, overrides: &[(String, f64)]) {
        for (key, value) in overrides {
            if !self.set_param(key, *value) {
                oldspot_trace::diag::warn_once(format!(
                    "ignoring unknown {} parameter {key:?}",
                    self.name()
                ));
            }
        }
    }
}
