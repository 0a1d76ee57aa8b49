//! CLI module tests.

use super::args::{Args, Command, RunOptions};
use super::commands::{
    error_hint, run_batch, run_cli, run_simulation, show_matrix, verify_reproducibility,
};
use super::output::{
    print_batch_report, print_help, print_result, print_verification, print_version,
};
use crate::domains::relationships::RelationshipPreset;
use crate::error::SeatError;
use std::path::PathBuf;
use std::process::ExitCode;

fn opts_of(args: &[&str]) -> RunOptions {
    match Args::parse_from(args.iter().copied()).command {
        Command::Run(o) | Command::Batch(o) | Command::Verify(o) | Command::Matrix(o) => o,
        other => panic!("expected a simulation command, got {other:?}"),
    }
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["seatsim"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["seatsim", flag]).command, Command::Help);
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        assert_eq!(Args::parse_from(["seatsim", flag]).command, Command::Version);
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["seatsim", "unknown-cmd"]);
    assert!(matches!(
        args.command,
        Command::Invalid { ref message } if message.contains("unknown-cmd")
    ));
}

#[test]
fn test_parse_run_defaults() {
    let args = Args::parse_from(["seatsim", "run"]);
    assert_eq!(args.command, Command::Run(RunOptions::default()));
    assert!(!args.verbose());
}

#[test]
fn test_parse_run_all_options() {
    let opts = opts_of(&[
        "seatsim",
        "run",
        "--config",
        "dinner.yaml",
        "--agents",
        "6",
        "--close",
        "0.9",
        "--explore",
        "0.1",
        "--seed",
        "12345",
        "--max-iterations",
        "25",
        "--preset",
        "polarized",
        "--mean",
        "0.4",
        "--std-dev",
        "0.1",
        "--json",
        "-v",
    ]);

    assert_eq!(opts.config_path, Some(PathBuf::from("dinner.yaml")));
    assert_eq!(opts.agents, Some(6));
    assert_eq!(opts.close, Some(0.9));
    assert_eq!(opts.explore, Some(0.1));
    assert_eq!(opts.seed, Some(12345));
    assert_eq!(opts.max_iterations, Some(25));
    assert_eq!(opts.preset, Some(RelationshipPreset::Polarized));
    assert_eq!(opts.mean, Some(0.4));
    assert_eq!(opts.std_dev, Some(0.1));
    assert!(opts.json);
    assert!(opts.verbose);
}

#[test]
fn test_parse_batch_runs_threads() {
    let args =
        Args::parse_from(["seatsim", "batch", "--runs", "20", "--threads", "4", "--verbose"]);
    assert!(args.verbose());
    match args.command {
        Command::Batch(opts) => {
            assert_eq!(opts.runs, Some(20));
            assert_eq!(opts.threads, Some(4));
        }
        other => panic!("Expected Batch command, got {other:?}"),
    }
}

#[test]
fn test_parse_verify_and_matrix() {
    assert!(matches!(
        Args::parse_from(["seatsim", "verify", "--runs", "5"]).command,
        Command::Verify(RunOptions { runs: Some(5), .. })
    ));
    assert!(matches!(
        Args::parse_from(["seatsim", "matrix", "--agents", "3"]).command,
        Command::Matrix(RunOptions { agents: Some(3), .. })
    ));
}

#[test]
fn test_parse_missing_value() {
    let args = Args::parse_from(["seatsim", "run", "--seed"]);
    assert!(matches!(args.command, Command::Invalid { ref message } if message.contains("--seed")));
}

#[test]
fn test_parse_bad_number() {
    let args = Args::parse_from(["seatsim", "run", "--agents", "many"]);
    assert!(matches!(args.command, Command::Invalid { ref message } if message.contains("many")));
}

#[test]
fn test_parse_bad_preset() {
    let args = Args::parse_from(["seatsim", "run", "--preset", "chaotic"]);
    assert!(matches!(args.command, Command::Invalid { .. }));
}

#[test]
fn test_parse_unknown_option() {
    let args = Args::parse_from(["seatsim", "run", "--fast"]);
    assert!(matches!(args.command, Command::Invalid { ref message } if message.contains("--fast")));
}

// ============================================================================
// RunOptions resolution tests
// ============================================================================

#[test]
fn test_to_config_applies_overrides() {
    let opts = opts_of(&["seatsim", "run", "--agents", "4", "--seed", "9", "--threads", "2"]);
    let config = opts.to_config().expect("valid");
    assert_eq!(config.table.num_agents, 4);
    assert_eq!(config.seed(), 9);
    assert_eq!(config.batch.threads, 2);
}

#[test]
fn test_to_config_rejects_invalid_values() {
    assert!(opts_of(&["seatsim", "run", "--agents", "10"]).to_config().is_err());
    assert!(opts_of(&["seatsim", "run", "--close", "1.5"]).to_config().is_err());
    assert!(opts_of(&["seatsim", "run", "--max-iterations", "0"]).to_config().is_err());
}

#[test]
fn test_to_config_file_then_overrides() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "reproducibility:\n  seed: 5\ntable:\n  num_agents: 3").expect("write");

    let path = file.path().to_string_lossy().to_string();
    let opts = opts_of(&["seatsim", "run", "--config", &path, "--agents", "7"]);
    let config = opts.to_config().expect("valid");
    assert_eq!(config.seed(), 5);
    assert_eq!(config.table.num_agents, 7);
}

#[test]
fn test_to_config_missing_file() {
    let opts = opts_of(&["seatsim", "run", "--config", "/nonexistent/seatsim.yaml"]);
    assert!(opts.to_config().is_err());
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_run_simulation_command() {
    let opts = opts_of(&["seatsim", "run", "--seed", "42", "--max-iterations", "50", "-v"]);
    let result = run_simulation(&opts).expect("runs");
    assert!(result.final_utility() >= result.initial_utility());
    assert_eq!(result.utility_history.len(), result.num_moves() + 1);
}

#[test]
fn test_run_simulation_json() {
    let opts = opts_of(&["seatsim", "run", "--agents", "3", "--json"]);
    assert!(run_simulation(&opts).is_ok());
}

#[test]
fn test_run_batch_command() {
    let opts = opts_of(&[
        "seatsim", "batch", "--agents", "5", "--runs", "4", "--threads", "2", "-v",
    ]);
    let report = run_batch(&opts).expect("runs");
    assert_eq!(report.summary.runs, 4);
}

#[test]
fn test_verify_identical() {
    let opts = opts_of(&["seatsim", "verify", "--agents", "5", "--runs", "3"]);
    assert!(verify_reproducibility(&opts).expect("runs"));
}

#[test]
fn test_verify_zero_runs_rejected() {
    let opts = opts_of(&["seatsim", "verify", "--runs", "0"]);
    assert!(verify_reproducibility(&opts).is_err());
}

#[test]
fn test_show_matrix_command() {
    let opts = opts_of(&["seatsim", "matrix", "--agents", "4", "--seed", "3"]);
    let matrix = show_matrix(&opts).expect("valid");
    assert_eq!(matrix.num_agents(), 4);
    assert!(matrix.validate().is_ok());
}

#[test]
fn test_run_cli_exit_codes() {
    assert_eq!(run_cli(Args::parse_from(["seatsim", "help"])), ExitCode::SUCCESS);
    assert_eq!(run_cli(Args::parse_from(["seatsim", "version"])), ExitCode::SUCCESS);
    assert_eq!(
        run_cli(Args::parse_from(["seatsim", "matrix", "--agents", "2"])),
        ExitCode::SUCCESS
    );
    assert_eq!(run_cli(Args::parse_from(["seatsim", "bogus"])), ExitCode::from(1));
    assert_eq!(
        run_cli(Args::parse_from(["seatsim", "run", "--agents", "0"])),
        ExitCode::from(1)
    );
}

#[test]
fn test_error_hint_by_error_kind() {
    let regression = SeatError::UtilityRegression {
        previous: 2.0,
        current: 1.0,
    };
    assert!(error_hint(&regression).is_some_and(|h| h.starts_with("Jidoka")));

    let bad_input = SeatError::config("num_agents must be in 1..=9");
    assert!(error_hint(&bad_input).is_some_and(|h| h.contains("seatsim help")));
    assert!(error_hint(&SeatError::SeatOutOfRange(11)).is_some());

    assert_eq!(error_hint(&SeatError::AgentNotFound(3)), None);
    assert_eq!(error_hint(&SeatError::Worker("pool".into())), None);
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_print_help_and_version() {
    print_help();
    print_version();
}

#[test]
fn test_print_result_and_reports() {
    let opts = opts_of(&["seatsim", "batch", "--agents", "4", "--runs", "2"]);
    let report = run_batch(&opts).expect("runs");
    print_result(&report.runs[0].result, true);
    print_batch_report(&report, true);

    let digests = report.digests().expect("encodes");
    print_verification(&digests, false);
    print_verification(&digests[..1], true);
}
