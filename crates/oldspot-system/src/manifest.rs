//! The chip description manifest.
//!
//! A system is described in a TOML file: a list of units, each with its
//! kind, default operating values, optional redundancy, and one trace per
//! surviving configuration; and a tree of groups with failure-tolerance
//! thresholds referencing the units by name.
//!
//! ```toml
//! [[unit]]
//! name = "core0"
//! type = "core"
//! defaults = { vdd = 1.0, temperature = 355.0 }
//! redundancy = { type = "serial", count = 2 }
//!
//! [[unit.trace]]
//! file = "traces/core0.csv"
//! failed = []
//!
//! [[unit.trace]]
//! file = "traces/core0_degraded.csv"
//! failed = ["core1"]
//!
//! [tree]
//! name = "chip"
//! failures = 0
//! units = ["core0"]
//! ```
//!
//! Relative trace paths resolve against the manifest's directory. A unit
//! with no fresh trace gets a synthetic single-point trace built from its
//! defaults, so a description can omit traces entirely and still simulate.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use oldspot_trace::{parse_trace, quantity, DataPoint};

use crate::config::Configuration;
use crate::error::{Result, SystemError};
use crate::tree::{ComponentId, Group, GroupId, System};
use crate::unit::{Unit, UnitId, UnitKind};

/// MHz-to-Hz conversion applied to the frequency quantity after loading.
const MHZ: f64 = 1e6;

/// Top-level manifest schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemManifest {
    /// Unit declarations, in registry (id) order.
    #[serde(rename = "unit", default)]
    pub units: Vec<UnitSpec>,
    /// The failure-dependency tree, rooted at this group.
    pub tree: GroupSpec,
}

/// One unit declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: UnitKind,
    /// Default quantity values for trace samples that lack them.
    #[serde(default)]
    pub defaults: HashMap<String, f64>,
    #[serde(default)]
    pub redundancy: Option<RedundancySpec>,
    #[serde(rename = "trace", default)]
    pub traces: Vec<TraceSpec>,
}

/// Redundant-copy declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedundancySpec {
    #[serde(rename = "type")]
    pub kind: RedundancyKind,
    pub count: u32,
}

/// Whether spares take over on failure (serial) or age alongside the
/// active copy (parallel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedundancyKind {
    Serial,
    Parallel,
}

/// One trace declaration: the file and the configuration it was recorded
/// under (an empty `failed` list is the fresh system).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSpec {
    pub file: PathBuf,
    #[serde(default)]
    pub failed: Vec<String>,
}

/// One group of the failure-dependency tree. Children are the named units
/// followed by the nested groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    /// How many failed children the group tolerates; it fails when
    /// strictly more have failed.
    #[serde(default)]
    pub failures: usize,
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(rename = "group", default)]
    pub groups: Vec<GroupSpec>,
}

impl SystemManifest {
    /// Read and parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SystemError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&contents)
    }

    /// Parse a manifest from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| SystemError::Parse(e.to_string()))
    }

    /// Build the simulated system: load every trace, fill defaults,
    /// convert frequencies, synthesize missing fresh traces, and resolve
    /// the group tree against the unit registry.
    ///
    /// `base_dir` anchors relative trace paths (normally the manifest's
    /// directory); `delimiter` separates trace file fields.
    pub fn build(&self, base_dir: &Path, delimiter: char) -> Result<System> {
        let mut units = Vec::with_capacity(self.units.len());
        let mut units_by_name = HashMap::new();

        for (index, spec) in self.units.iter().enumerate() {
            let id = UnitId(index);
            if units_by_name.insert(spec.name.clone(), id).is_some() {
                return Err(SystemError::DuplicateUnit {
                    name: spec.name.clone(),
                });
            }

            let defaults = spec.effective_defaults();
            let mut traces: IndexMap<Configuration, Vec<DataPoint>> = IndexMap::new();
            for trace_spec in &spec.traces {
                let path = if trace_spec.file.is_absolute() {
                    trace_spec.file.clone()
                } else {
                    base_dir.join(&trace_spec.file)
                };
                let trace = parse_trace(&path, delimiter)?;
                let config = Configuration::from_failed(trace_spec.failed.iter().cloned());
                traces.insert(config, trace);
            }

            let fresh = Configuration::fresh();
            traces
                .entry(fresh)
                .or_insert_with(|| vec![synthetic_point(&defaults)]);

            for trace in traces.values_mut() {
                for point in trace.iter_mut() {
                    for (name, value) in &defaults {
                        point.fill_default(name, *value);
                    }
                    let frequency = point.value(quantity::FREQUENCY);
                    point.set(quantity::FREQUENCY, frequency * MHZ);
                }
            }

            let (serial, copies) = match &spec.redundancy {
                Some(redundancy) => (
                    redundancy.kind == RedundancyKind::Serial,
                    redundancy.count,
                ),
                None => (true, 1),
            };
            units.push(Unit::new(id, &spec.name, spec.kind, serial, copies, traces));
        }

        let mut groups = Vec::new();
        let root = build_group(&self.tree, &units_by_name, &mut groups)?;

        Ok(System { units, groups, root })
    }
}

impl UnitSpec {
    /// The unit's defaults: the built-in values for its kind, overridden
    /// by anything declared in the manifest.
    fn effective_defaults(&self) -> HashMap<String, f64> {
        let mut defaults = HashMap::new();
        defaults.insert(quantity::VDD.to_string(), 1.0);
        defaults.insert(quantity::TEMPERATURE.to_string(), 350.0);
        defaults.insert(quantity::FREQUENCY.to_string(), 1000.0); // MHz
        defaults.insert(quantity::ACTIVITY.to_string(), 0.0);
        if self.kind == UnitKind::Core {
            defaults.insert(quantity::POWER.to_string(), 1.0);
            defaults.insert(quantity::PEAK_POWER.to_string(), 1.0);
        }
        for (name, value) in &self.defaults {
            defaults.insert(name.clone(), *value);
        }
        defaults
    }
}

/// A single-sample trace standing in for a missing fresh trace.
fn synthetic_point(defaults: &HashMap<String, f64>) -> DataPoint {
    let mut point = DataPoint::new(1.0, 1.0);
    for (name, value) in defaults {
        point.set(name, *value);
    }
    point
}

fn build_group(
    spec: &GroupSpec,
    units_by_name: &HashMap<String, UnitId>,
    groups: &mut Vec<Group>,
) -> Result<GroupId> {
    let mut children = Vec::new();
    for name in &spec.units {
        let id = units_by_name
            .get(name)
            .ok_or_else(|| SystemError::UnknownUnit {
                group: spec.name.clone(),
                unit: name.clone(),
            })?;
        children.push(ComponentId::Unit(*id));
    }
    for sub in &spec.groups {
        children.push(ComponentId::Group(build_group(sub, units_by_name, groups)?));
    }

    let id = GroupId(groups.len());
    groups.push(Group {
        name: spec.name.clone(),
        failures: spec.failures,
        children,
        ttfs: Vec::new(),
    });
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_manifest() {
        let toml = r#"
            [[unit]]
            name = "core0"
            type = "core"
            defaults = { temperature = 360.0 }
            redundancy = { type = "parallel", count = 2 }

            [[unit.trace]]
            file = "core0.csv"
            failed = ["core1"]

            [[unit]]
            name = "cache"
            type = "memory"

            [tree]
            name = "chip"
            failures = 0
            units = ["cache"]

            [[tree.group]]
            name = "cores"
            failures = 1
            units = ["core0"]
        "#;

        let manifest = SystemManifest::from_str(toml).unwrap();
        assert_eq!(manifest.units.len(), 2);
        assert_eq!(manifest.units[0].kind, UnitKind::Core);
        assert_eq!(manifest.units[1].kind, UnitKind::Memory);
        assert_eq!(manifest.units[0].traces[0].failed, vec!["core1"]);
        assert_eq!(manifest.tree.groups[0].failures, 1);
    }

    #[test]
    fn unknown_unit_type_is_a_parse_error() {
        let toml = r#"
            [[unit]]
            name = "x"
            type = "accelerator"

            [tree]
            name = "chip"
        "#;
        assert!(matches!(
            SystemManifest::from_str(toml),
            Err(SystemError::Parse(_))
        ));
    }

    #[test]
    fn build_synthesizes_fresh_trace_from_defaults() {
        let toml = r#"
            [[unit]]
            name = "u"
            defaults = { vdd = 0.9, activity = 1.0 }

            [tree]
            name = "chip"
            units = ["u"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        let system = manifest.build(Path::new("."), ',').unwrap();

        let unit = &system.units[0];
        let trace = &unit.traces()[&Configuration::fresh()];
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].value(quantity::VDD), 0.9);
        assert_eq!(trace[0].value(quantity::ACTIVITY), 1.0);
        assert_eq!(trace[0].value(quantity::TEMPERATURE), 350.0);
        // Default 1000 MHz, stored in Hz.
        assert_eq!(trace[0].value(quantity::FREQUENCY), 1e9);
    }

    #[test]
    fn build_loads_traces_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("u.csv"),
            "time,vdd,frequency\n10.0,0.95,2000\n20.0,1.0,1500\n",
        )
        .unwrap();
        let toml = r#"
            [[unit]]
            name = "u"

            [[unit.trace]]
            file = "u.csv"

            [tree]
            name = "chip"
            units = ["u"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        let system = manifest.build(dir.path(), ',').unwrap();

        let unit = &system.units[0];
        let trace = &unit.traces()[&Configuration::fresh()];
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].duration, 10.0);
        assert_eq!(trace[1].duration, 10.0);
        // Trace frequencies are MHz on disk.
        assert_eq!(trace[0].value(quantity::FREQUENCY), 2e9);
        // Missing quantities come from the built-in defaults.
        assert_eq!(trace[0].value(quantity::TEMPERATURE), 350.0);
        assert_eq!(trace[0].value(quantity::ACTIVITY), 0.0);
    }

    #[test]
    fn build_rejects_unknown_tree_references() {
        let toml = r#"
            [[unit]]
            name = "u"

            [tree]
            name = "chip"
            units = ["ghost"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        let err = manifest.build(Path::new("."), ',').unwrap_err();
        assert!(matches!(err, SystemError::UnknownUnit { unit, .. } if unit == "ghost"));
    }

    #[test]
    fn build_rejects_duplicate_unit_names() {
        let toml = r#"
            [[unit]]
            name = "u"

            [[unit]]
            name = "u"

            [tree]
            name = "chip"
            units = ["u"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        assert!(matches!(
            manifest.build(Path::new("."), ',').unwrap_err(),
            SystemError::DuplicateUnit { .. }
        ));
    }

    #[test]
    fn build_resolves_nested_groups() {
        let toml = r#"
            [[unit]]
            name = "a"

            [[unit]]
            name = "b"

            [tree]
            name = "chip"

            [[tree.group]]
            name = "pair"
            failures = 1
            units = ["a", "b"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        let system = manifest.build(Path::new("."), ',').unwrap();

        assert_eq!(system.groups.len(), 2);
        let root = system.group(system.root);
        assert_eq!(root.name, "chip");
        assert_eq!(root.children.len(), 1);
        match root.children[0] {
            ComponentId::Group(g) => {
                let pair = system.group(g);
                assert_eq!(pair.failures, 1);
                assert_eq!(pair.children.len(), 2);
            }
            _ => panic!("expected a nested group"),
        }
    }

    #[test]
    fn missing_trace_file_is_fatal() {
        let toml = r#"
            [[unit]]
            name = "u"

            [[unit.trace]]
            file = "missing.csv"

            [tree]
            name = "chip"
            units = ["u"]
        "#;
        let manifest = SystemManifest::from_str(toml).unwrap();
        assert!(matches!(
            manifest.build(Path::new("/nonexistent"), ',').unwrap_err(),
            SystemError::Trace(_)
        ));
    }
}
