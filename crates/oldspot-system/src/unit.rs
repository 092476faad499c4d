//! Units: the leaves of the failure-dependency tree.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use oldspot_reliability::{MttfSegment, Weibull};
use oldspot_trace::diag::warn_once;
use oldspot_trace::{quantity, DataPoint};
use oldspot_wearout::{Mechanism, MechanismKind};

use crate::config::Configuration;

/// Index of a unit in the system's registry, assigned densely in creation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// What kind of block a unit is, which decides how its duty cycle is
/// derived from the trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// The `activity` column is read directly as a 0..1 duty fraction.
    #[default]
    #[serde(rename = "unit")]
    Generic,
    /// Activity is estimated as the fraction of peak power being drawn.
    Core,
    /// The `activity` column counts switching events; it is normalized by
    /// the number of cycles in the sample (`duration * frequency`). For
    /// NBTI the normalized value is further folded through the expected
    /// stress integral over the block's transistor population.
    Logic,
    /// Activity is data-dependent rather than usage-dependent: high-order
    /// bits sit at static zero, so NBTI and TDDB see full stress while HCI
    /// sees none.
    Memory,
}

/// A unit: one architectural block with its per-configuration operating
/// traces, computed failure distributions, and mutable simulation state.
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    /// Observed times to failure across Monte-Carlo iterations (s).
    pub ttfs: Vec<f64>,

    /// Total redundant copies, and whether spares are serial (cold
    /// standby, rejuvenated on takeover) or parallel (shadow copies aging
    /// alongside).
    copies: u32,
    serial: bool,

    /// Copies left before the unit is dead.
    remaining: u32,
    /// Equivalent age under the current configuration (s).
    age: f64,
    /// Residual survival probability since the last rejuvenation.
    current_reliability: f64,
    failed: bool,
    config: Configuration,
    prev_config: Configuration,

    traces: IndexMap<Configuration, Vec<DataPoint>>,
    per_mechanism: IndexMap<Configuration, BTreeMap<MechanismKind, Weibull>>,
    overall: IndexMap<Configuration, Weibull>,
}

impl Unit {
    /// Create a unit from its prepared traces. Every configuration key
    /// must already have defaults filled in and frequencies converted;
    /// the fresh configuration must be present.
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        kind: UnitKind,
        serial: bool,
        copies: u32,
        traces: IndexMap<Configuration, Vec<DataPoint>>,
    ) -> Self {
        debug_assert!(traces.contains_key(&Configuration::fresh()));
        Self {
            id,
            name: name.into(),
            kind,
            ttfs: Vec::new(),
            copies,
            serial,
            remaining: copies,
            age: 0.0,
            current_reliability: 1.0,
            failed: false,
            config: Configuration::empty(),
            prev_config: Configuration::empty(),
            traces,
            per_mechanism: IndexMap::new(),
            overall: IndexMap::new(),
        }
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn current_reliability(&self) -> f64 {
        self.current_reliability
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn prev_config(&self) -> &Configuration {
        &self.prev_config
    }

    pub fn traces(&self) -> &IndexMap<Configuration, Vec<DataPoint>> {
        &self.traces
    }

    /// The duty cycle a mechanism sees at one operating point, before
    /// clamping.
    pub fn activity(&self, point: &DataPoint, mechanism: MechanismKind) -> f64 {
        match self.kind {
            UnitKind::Generic => point.value(quantity::ACTIVITY),
            UnitKind::Core => {
                point.value(quantity::POWER) / point.value(quantity::PEAK_POWER)
            }
            UnitKind::Logic => {
                let duty = (point.value(quantity::ACTIVITY)
                    / (point.duration * point.value(quantity::FREQUENCY)))
                .min(1.0);
                if mechanism == MechanismKind::Nbti {
                    1.0 - duty * duty / 2.0
                } else {
                    duty
                }
            }
            UnitKind::Memory => {
                if mechanism == MechanismKind::Hci {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    /// Compute the failure distributions for every configuration this unit
    /// has a trace for: one Weibull per mechanism from the trace's
    /// piecewise-stationary MTTFs, and their product as the overall
    /// distribution. Run once before simulation; the results are read-only
    /// afterwards.
    pub fn compute_reliability(&mut self, mechanisms: &[Mechanism]) {
        let mut per_mechanism = IndexMap::new();
        let mut overall = IndexMap::new();

        for (config, trace) in &self.traces {
            let mut distributions = BTreeMap::new();
            for mechanism in mechanisms {
                let segments: Vec<MttfSegment> = trace
                    .iter()
                    .map(|point| {
                        let duty_cycle =
                            self.activity(point, mechanism.kind()).clamp(0.0, 1.0);
                        MttfSegment {
                            duration: point.duration,
                            mttf: mechanism.time_to_failure(point, duty_cycle, None),
                        }
                    })
                    .collect();
                distributions.insert(mechanism.kind(), mechanism.distribution(&segments));
            }

            let combined = distributions
                .values()
                .copied()
                .reduce(|a, b| a * b)
                .unwrap_or_else(|| Weibull::never(oldspot_wearout::WEIBULL_SHAPE));
            per_mechanism.insert(config.clone(), distributions);
            overall.insert(config.clone(), combined);
        }

        self.per_mechanism = per_mechanism;
        self.overall = overall;
    }

    /// Return the unit to fresh, leaving the computed distributions
    /// untouched.
    pub fn reset(&mut self) {
        self.age = 0.0;
        self.current_reliability = 1.0;
        self.failed = false;
        self.remaining = self.copies;
        self.prev_config = Configuration::empty();
    }

    /// Adopt the current failure frontier as this unit's configuration,
    /// remembering the previous one for the equivalent-age translation.
    /// Falls back to the fresh configuration (with a deduplicated warning)
    /// when no trace covers the frontier.
    pub fn set_configuration(&mut self, frontier: &Configuration) {
        self.prev_config = std::mem::replace(&mut self.config, frontier.clone());
        if !self.traces.contains_key(&self.config) {
            warn_once(format!(
                "unit {}: no trace for configuration {}; using the fresh configuration",
                self.name, self.config
            ));
            self.config = Configuration::fresh();
        }
    }

    /// Sample the time until this unit's next failure, relative to now.
    ///
    /// A residual reliability value is drawn uniformly below the current
    /// one and mapped through the inverse reliability function; subtracting
    /// the age already consumed leaves the incremental time to failure
    /// under the current configuration. Infinite when the unit cannot fail
    /// in this configuration.
    pub fn next_event<R: Rng>(&self, rng: &mut R) -> f64 {
        if !(self.current_reliability > 0.0) {
            // Reliability underflowed to zero; the unit is overdue.
            return 0.0;
        }
        let r = loop {
            let r = rng.gen_range(0.0..self.current_reliability);
            if r > 0.0 {
                break r;
            }
        };
        let next = self.inverse(&self.config, r);
        if next.is_infinite() {
            return f64::INFINITY;
        }
        next - self.inverse(&self.config, self.current_reliability)
    }

    /// Advance this unit's age by `dt` seconds and refresh its residual
    /// reliability.
    ///
    /// When the configuration changed since the last update, the age is
    /// first translated so that the current reliability value maps to the
    /// same point on the new configuration's curve (Bolchini et al., ICCD
    /// 2014): reliability is configuration-invariant, age is not.
    pub fn update_reliability(&mut self, dt: f64) {
        self.age += dt;
        if !self.prev_config.is_empty() {
            self.age -= self.inverse(&self.prev_config, self.current_reliability)
                - self.inverse(&self.config, self.current_reliability);
        }
        self.current_reliability = self.reliability(&self.config, self.age);
    }

    /// Survival probability at age `t` under configuration `config`.
    pub fn reliability(&self, config: &Configuration, t: f64) -> f64 {
        self.distribution(config).reliability(t)
    }

    /// The age at which reliability reaches `r` under configuration
    /// `config`.
    pub fn inverse(&self, config: &Configuration, r: f64) -> f64 {
        self.distribution(config).inverse(r)
    }

    /// The overall failure distribution for a configuration, if computed.
    pub fn overall_reliability(&self, config: &Configuration) -> Option<&Weibull> {
        self.overall.get(config)
    }

    /// The per-mechanism failure distribution for a configuration, if
    /// computed.
    pub fn mechanism_reliability(
        &self,
        config: &Configuration,
        mechanism: MechanismKind,
    ) -> Option<&Weibull> {
        self.per_mechanism.get(config)?.get(&mechanism)
    }

    fn distribution(&self, config: &Configuration) -> &Weibull {
        match self.overall.get(config) {
            Some(distribution) => distribution,
            None => panic!(
                "unit {}: no distribution for configuration {config}; \
                 compute_reliability must run before simulation",
                self.name
            ),
        }
    }

    /// Overall aging rate (Weibull rate parameter) under a configuration,
    /// or 0 for configurations in which this unit is the failed one.
    pub fn aging_rate(&self, config: &Configuration) -> f64 {
        if self.failed_in(config) {
            0.0
        } else {
            self.overall.get(config).map_or(f64::NAN, Weibull::rate)
        }
    }

    /// Overall aging rate of the fresh system.
    pub fn fresh_aging_rate(&self) -> f64 {
        self.aging_rate(&Configuration::fresh())
    }

    /// Aging rate attributable to a single mechanism in the fresh system.
    pub fn mechanism_aging_rate(&self, mechanism: MechanismKind) -> f64 {
        self.mechanism_reliability(&Configuration::fresh(), mechanism)
            .map_or(f64::NAN, Weibull::rate)
    }

    /// Whether this unit is one of the failed units of a configuration.
    pub fn failed_in(&self, config: &Configuration) -> bool {
        config.contains(&self.name)
    }

    /// Record one local failure. Redundant copies absorb failures until
    /// none remain; serial spares start life fresh, so the unit's age and
    /// reliability are rejuvenated.
    pub fn failure(&mut self) {
        debug_assert!(self.remaining > 0, "failure() on an exhausted unit");
        self.remaining -= 1;
        self.failed = self.remaining == 0;
        if self.serial {
            self.current_reliability = 1.0;
            self.age = 0.0;
            self.prev_config = Configuration::empty();
        }
    }

    pub(crate) fn mark_failed(&mut self) {
        self.failed = true;
    }
}
