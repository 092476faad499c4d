//! End-to-end tests: manifest and trace files on disk, through reliability
//! computation and Monte-Carlo simulation, to the output writers.

use std::fs;
use std::path::Path;

use oldspot_report::{write_ttf_dump, write_unit_rates, TimeUnit};
use oldspot_sim::{run_monte_carlo, SimulationConfig};
use oldspot_system::{Configuration, System, SystemManifest};
use oldspot_wearout::{Mechanism, MechanismKind};

fn build_system(dir: &Path, manifest: &str, mechanisms: &[Mechanism]) -> System {
    let manifest = SystemManifest::from_str(manifest).unwrap();
    let mut system = manifest.build(dir, ',').unwrap();
    for unit in &mut system.units {
        unit.compute_reliability(mechanisms);
    }
    system
}

fn all_mechanisms() -> Vec<Mechanism> {
    MechanismKind::ALL.iter().map(|&k| Mechanism::new(k)).collect()
}

#[test]
fn single_unit_lifetime_from_trace_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cpu.csv"),
        "time,vdd,temperature,frequency,activity\n1.0,1.0,350,1000,1.0\n",
    )
    .unwrap();
    let manifest = r#"
        [[unit]]
        name = "cpu"

        [[unit.trace]]
        file = "cpu.csv"

        [tree]
        name = "chip"
        failures = 0
        units = ["cpu"]
    "#;
    let mechanisms = [Mechanism::new(MechanismKind::Nbti)];
    let mut system = build_system(dir.path(), manifest, &mechanisms);

    let expected = system.units[0]
        .overall_reliability(&Configuration::fresh())
        .unwrap()
        .mttf();
    assert!(expected.is_finite() && expected > 0.0);

    let stats = run_monte_carlo(&mut system, &SimulationConfig::default().with_seed(1));
    assert_eq!(stats.completed, 1000);

    let root_ttfs = &system.group(system.root).ttfs;
    assert_eq!(root_ttfs.len(), 1000);
    let mean = root_ttfs.iter().sum::<f64>() / root_ttfs.len() as f64;
    assert!((mean - expected).abs() / expected < 0.1);
}

#[test]
fn core_unit_combines_all_four_mechanisms() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"
        [[unit]]
        name = "core0"
        type = "core"
        defaults = { power = 0.5, peak_power = 1.0 }

        [tree]
        name = "chip"
        units = ["core0"]
    "#;
    let system = build_system(dir.path(), manifest, &all_mechanisms());

    let fresh = Configuration::fresh();
    let unit = &system.units[0];
    let overall = unit.overall_reliability(&fresh).unwrap();

    // The overall rate obeys the competing-failures identity over the four
    // equal-shape mechanisms.
    let mut inverse_sq = 0.0;
    for kind in MechanismKind::ALL {
        let d = unit.mechanism_reliability(&fresh, kind).unwrap();
        assert_eq!(d.shape(), 2.0);
        inverse_sq += (1.0 / d.rate()).powi(2);
    }
    let expected = inverse_sq.powf(-0.5);
    assert!((overall.rate() - expected).abs() / expected < 1e-9);
    // And it is no better than any single mechanism.
    for kind in MechanismKind::ALL {
        let d = unit.mechanism_reliability(&fresh, kind).unwrap();
        assert!(overall.rate() <= d.rate());
    }
}

#[test]
fn missing_degraded_trace_falls_back_to_fresh() {
    // Two units that depend on each other's survival only through the
    // frontier: neither declares a trace for the other's failure, so the
    // simulator falls back to the fresh trace and still finishes.
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"
        [[unit]]
        name = "a"
        defaults = { activity = 1.0 }

        [[unit]]
        name = "b"
        defaults = { activity = 1.0 }

        [tree]
        name = "chip"
        failures = 1
        units = ["a", "b"]
    "#;
    let mechanisms = [Mechanism::new(MechanismKind::Nbti)];
    let mut system = build_system(dir.path(), manifest, &mechanisms);

    let config = SimulationConfig {
        iterations: 100,
        seed: Some(5),
    };
    let stats = run_monte_carlo(&mut system, &config);
    assert_eq!(stats.completed, 100);
    assert_eq!(system.group(system.root).ttfs.len(), 100);
}

#[test]
fn redundant_unit_outlives_its_single_copy_twin() {
    let dir = tempfile::tempdir().unwrap();
    let single = r#"
        [[unit]]
        name = "u"
        defaults = { activity = 1.0 }

        [tree]
        name = "chip"
        units = ["u"]
    "#;
    let spared = r#"
        [[unit]]
        name = "u"
        defaults = { activity = 1.0 }
        redundancy = { type = "serial", count = 3 }

        [tree]
        name = "chip"
        units = ["u"]
    "#;
    let mechanisms = [Mechanism::new(MechanismKind::Nbti)];
    let config = SimulationConfig {
        iterations: 1000,
        seed: Some(9),
    };

    let mut single = build_system(dir.path(), single, &mechanisms);
    run_monte_carlo(&mut single, &config);
    let single_ttfs = &single.group(single.root).ttfs;
    let single_mean = single_ttfs.iter().sum::<f64>() / single_ttfs.len() as f64;

    let mut spared = build_system(dir.path(), spared, &mechanisms);
    run_monte_carlo(&mut spared, &config);
    let spared_ttfs = &spared.group(spared.root).ttfs;
    let spared_mean = spared_ttfs.iter().sum::<f64>() / spared_ttfs.len() as f64;

    assert!((spared_mean / single_mean - 3.0).abs() < 0.25);
}

#[test]
fn csv_outputs_cover_every_unit() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"
        [[unit]]
        name = "a"
        defaults = { activity = 1.0 }

        [[unit]]
        name = "b"
        defaults = { activity = 1.0 }

        [tree]
        name = "chip"
        failures = 0
        units = ["a", "b"]
    "#;
    let mechanisms = [Mechanism::new(MechanismKind::Nbti)];
    let mut system = build_system(dir.path(), manifest, &mechanisms);
    let config = SimulationConfig {
        iterations: 20,
        seed: Some(2),
    };
    run_monte_carlo(&mut system, &config);

    let rates = dir.path().join("rates.csv");
    write_unit_rates(&rates, &system, TimeUnit::Hours).unwrap();
    let contents = fs::read_to_string(&rates).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "name,mttf,failures,alpha");
    assert!(lines[1].starts_with("a,"));
    assert!(lines[2].starts_with("b,"));

    let dump = dir.path().join("ttfs.csv");
    write_ttf_dump(&dump, &system, TimeUnit::Hours).unwrap();
    let contents = fs::read_to_string(&dump).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("chip,"));
    // The root tolerates no failures: only the first unit to die records a
    // TTF each iteration, so the root has a full record while the units
    // split the 20 iterations between them.
    let root_ttfs: usize = lines[0].matches(',').count();
    assert_eq!(root_ttfs, 20);
    let unit_ttfs: usize = lines[1].matches(',').count() + lines[2].matches(',').count();
    assert_eq!(unit_ttfs, 20);
}
