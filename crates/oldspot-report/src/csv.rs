//! CSV output: per-unit aging rates, per-mechanism aging rates, and the
//! raw TTF dump.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use oldspot_reliability::TtfSummary;
use oldspot_system::System;
use oldspot_wearout::MechanismKind;

use crate::time::TimeUnit;

/// Write per-unit lifetime results: observed MTTF, failure count, and the
/// fresh-configuration aging rate. One row per unit, name first.
pub fn write_unit_rates(
    path: impl AsRef<Path>,
    system: &System,
    time_unit: TimeUnit,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "name,mttf,failures,alpha")?;
    for unit in &system.units {
        let summary = TtfSummary::from_ttfs(&unit.ttfs, 0.95);
        writeln!(
            out,
            "{},{},{},{}",
            unit.name,
            time_unit.from_seconds(summary.mean),
            unit.ttfs.len(),
            time_unit.from_seconds(unit.fresh_aging_rate()),
        )?;
    }
    out.flush()
}

/// Write the fresh-configuration aging rate each mechanism imposes on each
/// unit. One column per selected mechanism, one row per unit.
pub fn write_mechanism_rates(
    path: impl AsRef<Path>,
    system: &System,
    mechanisms: &[MechanismKind],
    time_unit: TimeUnit,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "name")?;
    for mechanism in mechanisms {
        write!(out, ",{}", mechanism.name())?;
    }
    writeln!(out)?;
    for unit in &system.units {
        write!(out, "{}", unit.name)?;
        for mechanism in mechanisms {
            write!(
                out,
                ",{}",
                time_unit.from_seconds(unit.mechanism_aging_rate(*mechanism))
            )?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Dump every observed time to failure: the root first, then each unit in
/// registry order. Rows are variable length — the component name followed
/// by its TTFs.
pub fn write_ttf_dump(
    path: impl AsRef<Path>,
    system: &System,
    time_unit: TimeUnit,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let root = system.group(system.root);
    write_ttf_row(&mut out, &root.name, &root.ttfs, time_unit)?;
    for unit in &system.units {
        write_ttf_row(&mut out, &unit.name, &unit.ttfs, time_unit)?;
    }
    out.flush()
}

fn write_ttf_row(
    out: &mut impl Write,
    name: &str,
    ttfs: &[f64],
    time_unit: TimeUnit,
) -> io::Result<()> {
    write!(out, "{name}")?;
    for &ttf in ttfs {
        write!(out, ",{}", time_unit.from_seconds(ttf))?;
    }
    writeln!(out)
}
