//! CLI command handlers.
//!
//! Each handler returns its outcome so tests can inspect it; [`run_cli`]
//! maps failures to exit code 1.

use std::process::ExitCode;

use serde::Serialize;
use tracing::info;

use super::output::{
    print_banner, print_batch_report, print_help, print_matrix, print_result, print_setup,
    print_verification, print_version,
};
use super::{Args, Command, RunOptions};
use crate::domains::batch::{BatchReport, BatchRunner};
use crate::domains::optimization::SimulationResult;
use crate::domains::relationships::{generate_preset_matrix, RelationshipMatrix};
use crate::engine::{SimRng, Simulation, UtilityGuard, RELATIONSHIP_STREAM};
use crate::error::{SeatError, SeatResult};

/// Verification runs when `--runs` is absent.
pub const DEFAULT_VERIFY_RUNS: usize = 3;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let outcome = match args.command {
        Command::Run(opts) => run_simulation(&opts).map(|_| true),
        Command::Batch(opts) => run_batch(&opts).map(|_| true),
        Command::Verify(opts) => verify_reproducibility(&opts),
        Command::Matrix(opts) => show_matrix(&opts).map(|_| true),
        Command::Help => {
            print_help();
            Ok(true)
        }
        Command::Version => {
            print_version();
            Ok(true)
        }
        Command::Invalid { message } => {
            eprintln!("Error: {message}\n");
            print_help();
            Ok(false)
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(hint) = error_hint(&e) {
                eprintln!("{hint}");
            }
            ExitCode::from(1)
        }
    }
}

/// Follow-up line printed under a failed command's error.
#[must_use]
pub fn error_hint(error: &SeatError) -> Option<&'static str> {
    if error.is_guard_violation() {
        Some("Jidoka: search stopped on a broken utility trace; no result was produced")
    } else if error.is_configuration() {
        Some("Run 'seatsim help' for valid options")
    } else {
        None
    }
}

/// Optimize one seating.
///
/// # Errors
///
/// Returns configuration, optimization or serialization errors.
pub fn run_simulation(opts: &RunOptions) -> SeatResult<SimulationResult> {
    let sim = Simulation::new(opts.to_config()?)?;
    let result = sim.run()?;

    if opts.json {
        print_json(&result)?;
    } else {
        print_banner("seatsim - Seating Optimization");
        print_setup(&sim);
        if opts.verbose {
            print_matrix(sim.relationships());
            println!();
        }
        print_result(&result, opts.verbose);
    }

    Ok(result)
}

/// Repeat independent runs and summarize them.
///
/// # Errors
///
/// Returns configuration, optimization or serialization errors.
pub fn run_batch(opts: &RunOptions) -> SeatResult<BatchReport> {
    let config = opts.to_config()?;
    let threads = config.batch.threads;
    let report = BatchRunner::new(config)?.run()?;

    if opts.json {
        print_json(&report.summary)?;
    } else {
        print_banner("seatsim - Batch Runner");
        println!("Runs: {}  Threads: {threads}\n", report.summary.runs);
        print_batch_report(&report, opts.verbose);
    }

    Ok(report)
}

/// Run the same configuration repeatedly and compare result digests.
///
/// Returns whether every digest matched.
///
/// # Errors
///
/// Returns configuration, optimization or serialization errors.
pub fn verify_reproducibility(opts: &RunOptions) -> SeatResult<bool> {
    let runs = opts.runs.unwrap_or(DEFAULT_VERIFY_RUNS);
    if runs == 0 {
        return Err(SeatError::config("verify needs at least one run"));
    }
    let config = opts.to_config()?;

    let guard = UtilityGuard::default();
    let digests = (0..runs)
        .map(|_| {
            let result = Simulation::new(config.clone())?.run()?;
            guard.check_history(&result.utility_history)?;
            result.digest()
        })
        .collect::<SeatResult<Vec<_>>>()?;
    let identical = digests.windows(2).all(|w| w[0] == w[1]);
    info!(runs, identical, "reproducibility check finished");

    if opts.json {
        print_json(&serde_json::json!({
            "runs": runs,
            "identical": identical,
            "digests": digests,
        }))?;
    } else {
        print_banner("seatsim - Reproducibility Check");
        println!("Seed: {}", config.seed());
        print_verification(&digests, identical);
    }

    Ok(identical)
}

/// Print the relationship matrix a run would use.
///
/// # Errors
///
/// Returns configuration or serialization errors.
pub fn show_matrix(opts: &RunOptions) -> SeatResult<RelationshipMatrix> {
    let config = opts.to_config()?;
    let matrix = generate_preset_matrix(
        config.relationships.preset,
        config.table.num_agents,
        SimRng::derive_seed(config.seed(), RELATIONSHIP_STREAM),
        config.relationships.mean,
        config.relationships.std_dev,
    )?;

    if opts.json {
        print_json(&matrix.rows())?;
    } else {
        println!("Preset: {}  Seed: {}\n", config.relationships.preset, config.seed());
        print_matrix(&matrix);
    }

    Ok(matrix)
}

fn print_json<T: Serialize>(value: &T) -> SeatResult<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| SeatError::serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}
