//! The failure-dependency tree.
//!
//! Groups form the internal nodes and units the leaves. Groups own their
//! sub-groups; unit leaves are indices into the flat registry, because a
//! unit may appear under several groups at once. Both arenas live in
//! [`System`], which is the root handle the simulator works on.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::unit::{Unit, UnitId};

/// Index of a group in the system's group arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// A node of the failure-dependency tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    Group(GroupId),
    Unit(UnitId),
}

/// An internal node: fails when strictly more than `failures` of its
/// children have failed (`failures = 0` tolerates none).
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub failures: usize,
    pub children: Vec<ComponentId>,
    /// Observed times to failure across Monte-Carlo iterations (s).
    pub ttfs: Vec<f64>,
}

/// The whole simulated system: the unit registry and the group tree.
#[derive(Debug, Clone)]
pub struct System {
    pub units: Vec<Unit>,
    pub groups: Vec<Group>,
    pub root: GroupId,
}

impl System {
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.0]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn component_name(&self, id: ComponentId) -> &str {
        match id {
            ComponentId::Group(g) => &self.groups[g.0].name,
            ComponentId::Unit(u) => &self.units[u.0].name,
        }
    }

    /// Failure predicate, evaluated lazily on demand. Cheap enough that no
    /// memoization is kept within an iteration.
    pub fn is_failed(&self, id: ComponentId) -> bool {
        match id {
            ComponentId::Unit(u) => self.units[u.0].failed(),
            ComponentId::Group(g) => {
                let group = &self.groups[g.0];
                let mut failed = 0;
                for &child in &group.children {
                    if self.is_failed(child) {
                        failed += 1;
                        if failed > group.failures {
                            return true;
                        }
                    }
                }
                false
            }
        }
    }

    pub fn root_failed(&self) -> bool {
        self.is_failed(ComponentId::Group(self.root))
    }

    /// Prefix depth-first traversal over every node. A unit shared by
    /// several groups is visited once per appearance.
    pub fn walk(&self, mut op: impl FnMut(ComponentId)) {
        let mut stack = vec![ComponentId::Group(self.root)];
        while let Some(id) = stack.pop() {
            op(id);
            if let ComponentId::Group(g) = id {
                stack.extend(self.groups[g.0].children.iter().copied());
            }
        }
    }

    /// Prefix depth-first traversal that only descends into a node's
    /// children when `op` returns true for it.
    pub fn conditional_walk(&self, mut op: impl FnMut(ComponentId) -> bool) {
        let mut stack = vec![ComponentId::Group(self.root)];
        while let Some(id) = stack.pop() {
            if op(id) {
                if let ComponentId::Group(g) = id {
                    stack.extend(self.groups[g.0].children.iter().copied());
                }
            }
        }
    }

    /// The visible failure frontier: the names of the topmost failed
    /// components reachable from the root. The fresh configuration when
    /// nothing has failed.
    pub fn failure_frontier(&self) -> Configuration {
        let mut frontier = Configuration::empty();
        self.conditional_walk(|id| {
            if self.is_failed(id) {
                frontier.insert(self.component_name(id));
                false
            } else {
                true
            }
        });
        if frontier.is_empty() {
            Configuration::fresh()
        } else {
            frontier
        }
    }

    /// Mark every unit that is no longer reachable through healthy nodes
    /// as failed — a unit becomes irrelevant the moment an enclosing group
    /// fails. Returns the units newly marked by this call.
    pub fn parents_failed(&mut self) -> Vec<UnitId> {
        let mut reachable = vec![false; self.units.len()];
        self.conditional_walk(|id| {
            if self.is_failed(id) {
                return false;
            }
            if let ComponentId::Unit(u) = id {
                reachable[u.0] = true;
            }
            true
        });

        let mut newly_failed = Vec::new();
        for (index, unit) in self.units.iter_mut().enumerate() {
            if !reachable[index] && !unit.failed() {
                unit.mark_failed();
                newly_failed.push(UnitId(index));
            }
        }
        newly_failed
    }

    /// Append an observed time to failure to a component's record.
    pub fn push_ttf(&mut self, id: ComponentId, t: f64) {
        match id {
            ComponentId::Group(g) => self.groups[g.0].ttfs.push(t),
            ComponentId::Unit(u) => self.units[u.0].ttfs.push(t),
        }
    }

    /// A component's observed times to failure.
    pub fn ttfs(&self, id: ComponentId) -> &[f64] {
        match id {
            ComponentId::Group(g) => &self.groups[g.0].ttfs,
            ComponentId::Unit(u) => &self.units[u.0].ttfs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitKind;
    use indexmap::IndexMap;
    use oldspot_trace::{quantity, DataPoint};

    fn test_unit(id: usize, name: &str) -> Unit {
        let mut point = DataPoint::new(1.0, 1.0);
        point.set(quantity::VDD, 1.0);
        point.set(quantity::TEMPERATURE, 350.0);
        point.set(quantity::FREQUENCY, 1e9);
        point.set(quantity::ACTIVITY, 1.0);
        let mut traces = IndexMap::new();
        traces.insert(Configuration::fresh(), vec![point]);
        Unit::new(UnitId(id), name, UnitKind::Generic, true, 1, traces)
    }

    /// Two units under a tolerant group, a third alongside, all under the
    /// root:
    ///
    ///   root (failures=0)
    ///   ├── pair (failures=1)
    ///   │   ├── a
    ///   │   └── b
    ///   └── c
    fn test_system() -> System {
        let units = vec![test_unit(0, "a"), test_unit(1, "b"), test_unit(2, "c")];
        let pair = Group {
            name: "pair".to_string(),
            failures: 1,
            children: vec![
                ComponentId::Unit(UnitId(0)),
                ComponentId::Unit(UnitId(1)),
            ],
            ttfs: Vec::new(),
        };
        let root = Group {
            name: "root".to_string(),
            failures: 0,
            children: vec![ComponentId::Group(GroupId(0)), ComponentId::Unit(UnitId(2))],
            ttfs: Vec::new(),
        };
        System {
            units,
            groups: vec![pair, root],
            root: GroupId(1),
        }
    }

    fn fail_unit(system: &mut System, id: usize) {
        system.units[id].failure();
    }

    #[test]
    fn group_fails_strictly_above_threshold() {
        let mut system = test_system();
        assert!(!system.root_failed());

        // One failure in the tolerant pair: nothing fails.
        fail_unit(&mut system, 0);
        assert!(!system.is_failed(ComponentId::Group(GroupId(0))));
        assert!(!system.root_failed());

        // Second failure exceeds the pair's threshold and takes the root
        // (which tolerates none) with it.
        fail_unit(&mut system, 1);
        assert!(system.is_failed(ComponentId::Group(GroupId(0))));
        assert!(system.root_failed());
    }

    #[test]
    fn walk_visits_every_appearance() {
        let system = test_system();
        let mut visited = Vec::new();
        system.walk(|id| visited.push(system.component_name(id).to_string()));
        assert_eq!(visited.len(), 5);
        for name in ["root", "pair", "a", "b", "c"] {
            assert!(visited.contains(&name.to_string()));
        }
    }

    #[test]
    fn frontier_is_fresh_when_healthy() {
        let system = test_system();
        assert!(system.failure_frontier().is_fresh());
    }

    #[test]
    fn frontier_reports_topmost_failures_only() {
        let mut system = test_system();
        fail_unit(&mut system, 0);
        let frontier = system.failure_frontier();
        assert!(frontier.contains("a"));
        assert!(!frontier.contains("pair"));

        // Once the pair group fails, it masks its members.
        fail_unit(&mut system, 1);
        let frontier = system.failure_frontier();
        assert!(frontier.contains("pair"));
        assert!(!frontier.contains("a"));
        assert!(!frontier.contains("b"));
        assert!(!frontier.contains("c"));
    }

    #[test]
    fn parents_failed_promotes_enclosed_units() {
        let mut system = test_system();
        fail_unit(&mut system, 0);
        // "a" is failed but "b" is still reachable through the healthy
        // pair group.
        assert!(system.parents_failed().is_empty());

        fail_unit(&mut system, 1);
        // The pair group is now failed; nothing under it is reachable, and
        // the root's failure also cuts off "c".
        let newly = system.parents_failed();
        assert_eq!(newly, vec![UnitId(2)]);
        assert!(system.units[2].failed());
    }

    #[test]
    fn shared_unit_counts_in_both_groups() {
        // "s" appears under both groups; its failure counts against both
        // thresholds.
        let units = vec![test_unit(0, "s")];
        let left = Group {
            name: "left".to_string(),
            failures: 0,
            children: vec![ComponentId::Unit(UnitId(0))],
            ttfs: Vec::new(),
        };
        let right = Group {
            name: "right".to_string(),
            failures: 0,
            children: vec![ComponentId::Unit(UnitId(0))],
            ttfs: Vec::new(),
        };
        let root = Group {
            name: "root".to_string(),
            failures: 1,
            children: vec![ComponentId::Group(GroupId(0)), ComponentId::Group(GroupId(1))],
            ttfs: Vec::new(),
        };
        let mut system = System {
            units,
            groups: vec![left, right, root],
            root: GroupId(2),
        };
        assert!(!system.root_failed());
        fail_unit(&mut system, 0);
        // Both groups fail from the one shared unit, exceeding the root's
        // tolerance of one failed child.
        assert!(system.root_failed());
    }
}
