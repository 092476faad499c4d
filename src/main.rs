//! Command-line entry point for the lifetime estimator.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use oldspot_report::{
    format_lifetime_report, write_mechanism_rates, write_ttf_dump, write_unit_rates, TimeUnit,
};
use oldspot_sim::{run_monte_carlo, SimulationConfig};
use oldspot_system::SystemManifest;
use oldspot_trace::diag::warn_once;
use oldspot_wearout::{read_params, Mechanism, MechanismKind};

/// Estimate the lifetime distribution of a heterogeneous system-on-chip.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chip description manifest (TOML)
    config: PathBuf,

    /// Number of Monte-Carlo iterations to perform
    #[arg(short = 'n', long, default_value_t = 1000)]
    iterations: usize,

    /// Comma-separated list of aging mechanisms to simulate, or "all"
    #[arg(long, default_value = "all")]
    aging_mechanisms: String,

    /// One-character field delimiter for trace files
    #[arg(long, default_value_t = ',')]
    trace_delimiter: char,

    /// Units for displaying times to failure
    #[arg(long, value_parser = parse_time_unit, default_value = "hours")]
    time_units: TimeUnit,

    /// File of technology constants shared by all aging mechanisms
    #[arg(long)]
    technology_file: Option<PathBuf>,

    /// File of model parameters for NBTI
    #[arg(long)]
    nbti_parameters: Option<PathBuf>,

    /// File of model parameters for electromigration
    #[arg(long)]
    em_parameters: Option<PathBuf>,

    /// File of model parameters for HCI
    #[arg(long)]
    hci_parameters: Option<PathBuf>,

    /// File of model parameters for TDDB
    #[arg(long)]
    tddb_parameters: Option<PathBuf>,

    /// Write per-unit aging rates, MTTFs, and failure counts to a CSV file
    #[arg(long)]
    unit_aging_rates: Option<PathBuf>,

    /// Write per-mechanism aging rates for each unit to a CSV file
    #[arg(long)]
    mechanism_aging_rates: Option<PathBuf>,

    /// Dump every observed time to failure to a CSV file
    #[arg(long)]
    dump_ttfs: Option<PathBuf>,

    /// Seed for the Monte-Carlo random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_time_unit(s: &str) -> Result<TimeUnit, String> {
    match s {
        "seconds" => Ok(TimeUnit::Seconds),
        "minutes" => Ok(TimeUnit::Minutes),
        "hours" => Ok(TimeUnit::Hours),
        "days" => Ok(TimeUnit::Days),
        "weeks" => Ok(TimeUnit::Weeks),
        "months" => Ok(TimeUnit::Months),
        "years" => Ok(TimeUnit::Years),
        other => Err(format!("unknown time unit {other:?}")),
    }
}

/// Build the selected mechanisms with their parameter overrides applied.
fn select_mechanisms(cli: &Cli) -> Result<Vec<Mechanism>> {
    let mut kinds: Vec<MechanismKind> = Vec::new();
    for token in cli.aging_mechanisms.split(',') {
        let token = token.trim().to_ascii_lowercase();
        if token == "all" {
            for kind in MechanismKind::ALL {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        } else {
            match token.parse::<MechanismKind>() {
                Ok(kind) => {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                Err(_) => warn_once(format!("ignoring unknown aging mechanism {token:?}")),
            }
        }
    }
    if kinds.is_empty() {
        bail!("no aging mechanisms selected");
    }

    let technology = cli.technology_file.as_deref().map(read_params);
    let mut mechanisms = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let mut mechanism = Mechanism::new(kind);
        if let Some(technology) = &technology {
            mechanism.apply_params(technology);
        }
        let params_file = match kind {
            MechanismKind::Nbti => &cli.nbti_parameters,
            MechanismKind::Em => &cli.em_parameters,
            MechanismKind::Hci => &cli.hci_parameters,
            MechanismKind::Tddb => &cli.tddb_parameters,
        };
        if let Some(path) = params_file {
            mechanism.apply_params(&read_params(path));
        }
        mechanisms.push(mechanism);
    }
    Ok(mechanisms)
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mechanisms = select_mechanisms(&cli)?;

    info!("loading chip description {}", cli.config.display());
    let manifest = SystemManifest::from_path(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let base_dir = cli.config.parent().unwrap_or(Path::new("."));
    let mut system = manifest
        .build(base_dir, cli.trace_delimiter)
        .context("failed to build the system")?;

    info!("computing per-configuration reliability distributions");
    for unit in &mut system.units {
        unit.compute_reliability(&mechanisms);
    }

    info!("running {} Monte Carlo iterations", cli.iterations);
    let sim_config = SimulationConfig {
        iterations: cli.iterations,
        seed: cli.seed,
    };
    let stats = run_monte_carlo(&mut system, &sim_config);
    if stats.stalled > 0 {
        tracing::warn!(
            "{} of {} iterations ended without a system failure",
            stats.stalled,
            cli.iterations
        );
    }

    print!("{}", format_lifetime_report(&system, cli.time_units));

    let kinds: Vec<MechanismKind> = mechanisms.iter().map(Mechanism::kind).collect();
    if let Some(path) = &cli.unit_aging_rates {
        write_unit_rates(path, &system, cli.time_units)
            .with_context(|| format!("could not write to {}", path.display()))?;
    }
    if let Some(path) = &cli.mechanism_aging_rates {
        write_mechanism_rates(path, &system, &kinds, cli.time_units)
            .with_context(|| format!("could not write to {}", path.display()))?;
    }
    if let Some(path) = &cli.dump_ttfs {
        write_ttf_dump(path, &system, cli.time_units)
            .with_context(|| format!("could not write to {}", path.display()))?;
    }

    Ok(())
}
