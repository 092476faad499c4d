//! Event-driven Monte-Carlo lifetime simulation.
//!
//! Each iteration replays the system's life from fresh: every healthy unit
//! samples its next failure time from its residual reliability, the
//! earliest failure fires, every survivor ages by that interval (with
//! equivalent-age translation when the failure changed the surviving
//! configuration), redundancy absorbs what it can, and the loop repeats
//! until the root of the failure-dependency tree reports failure. Times to
//! failure accumulate on every component for later aggregation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use oldspot_system::{ComponentId, System, UnitId};

/// Configuration for a Monte-Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of iterations (default: 1000).
    pub iterations: usize,
    /// Random seed for reproducibility (optional).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Set a seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome counts for a Monte-Carlo run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Iterations that drove the root to failure.
    pub completed: usize,
    /// Iterations abandoned because no remaining unit could fail.
    pub stalled: usize,
}

/// Run the Monte-Carlo simulation, accumulating times to failure on every
/// component of the system.
///
/// Reliability distributions must already be computed on every unit. The
/// run is deterministic for a given seed: units are visited in registry
/// order and ties between simultaneous events resolve to the lowest id.
pub fn run_monte_carlo(system: &mut System, config: &SimulationConfig) -> SimulationStats {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut stats = SimulationStats::default();
    for iteration in 0..config.iterations {
        debug!(iteration, "beginning Monte Carlo iteration");
        if run_iteration(system, &mut rng, iteration) {
            stats.completed += 1;
        } else {
            stats.stalled += 1;
        }
    }
    stats
}

/// Simulate one system lifetime. Returns false if the iteration stalled
/// without the root failing.
fn run_iteration(system: &mut System, rng: &mut StdRng, iteration: usize) -> bool {
    for unit in &mut system.units {
        unit.reset();
    }

    let mut failed_components: HashSet<ComponentId> = HashSet::new();
    let mut t = 0.0;
    while !system.root_failed() {
        // Adopt the current failure frontier on every surviving unit.
        let frontier = system.failure_frontier();
        for unit in system.units.iter_mut().filter(|u| !u.failed()) {
            unit.set_configuration(&frontier);
        }

        // Earliest sampled failure wins; registry order breaks ties.
        let mut dt_event = f64::INFINITY;
        let mut next_failure: Option<UnitId> = None;
        for unit in system.units.iter().filter(|u| !u.failed()) {
            let dt = unit.next_event(rng);
            if dt < dt_event {
                dt_event = dt;
                next_failure = Some(unit.id);
            }
        }
        let Some(failing) = next_failure else {
            tracing::warn!("no unit failure possible during iteration {iteration}");
            return false;
        };

        // Everything that survived the interval ages through it, including
        // the failing unit (a redundant spare may absorb the event).
        for unit in system.units.iter_mut().filter(|u| !u.failed()) {
            unit.update_reliability(dt_event);
        }
        system.unit_mut(failing).failure();
        t += dt_event;

        record_failures(system, &mut failed_components, t);
    }
    true
}

/// Record a time to failure for every component that failed at time `t`,
/// and retire units that an enclosing group's failure made irrelevant
/// (they are marked failed without a recorded TTF).
fn record_failures(system: &mut System, failed_components: &mut HashSet<ComponentId>, t: f64) {
    let mut newly_failed = Vec::new();
    system.walk(|id| {
        if system.is_failed(id) && !failed_components.contains(&id) && !newly_failed.contains(&id)
        {
            newly_failed.push(id);
        }
    });
    for id in newly_failed {
        failed_components.insert(id);
        system.push_ttf(id, t);
    }

    for unit in system.parents_failed() {
        failed_components.insert(ComponentId::Unit(unit));
    }
}
