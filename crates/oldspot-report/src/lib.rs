//! Human- and machine-readable output for simulation results.
//!
//! All simulation-internal times are seconds; conversion to display units
//! happens here, at the output boundary, and nowhere else.

pub mod csv;
pub mod time;

pub use csv::{write_mechanism_rates, write_ttf_dump, write_unit_rates};
pub use time::TimeUnit;

use chrono::Utc;

use oldspot_reliability::TtfSummary;
use oldspot_system::System;

/// Format the lifetime report for the system root.
pub fn format_lifetime_report(system: &System, time_unit: TimeUnit) -> String {
    let root = system.group(system.root);
    let summary = TtfSummary::from_ttfs(&root.ttfs, 0.95);

    let mut output = String::new();
    output.push_str(&format!("Lifetime statistics for {}\n", root.name));
    output.push_str(&format!("Analysis date: {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
    output.push_str(&format!("Iterations with an observed failure: {}\n", summary.samples));
    output.push_str(&format!(
        "Mean: {} {}\n",
        time_unit.from_seconds(summary.mean),
        time_unit
    ));
    output.push_str(&format!(
        "Standard deviation: {} {}\n",
        time_unit.from_seconds(summary.std_dev),
        time_unit
    ));
    output.push_str(&format!(
        "95% confidence interval: [{}, {}] {}\n",
        time_unit.from_seconds(summary.ci_lower),
        time_unit.from_seconds(summary.ci_upper),
        time_unit
    ));
    output
}
