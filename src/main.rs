//! seatsim CLI - greedy seating optimization
//!
//! Command-line interface for running seating simulations.

use std::process::ExitCode;

use seatsim::cli::{init_logging, run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose());
    run_cli(args)
}
