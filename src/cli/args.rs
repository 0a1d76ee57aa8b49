//! CLI argument parsing.
//!
//! Parses from any string iterator so tests can drive it without a process.

use std::path::PathBuf;

use crate::config::SimConfig;
use crate::domains::relationships::RelationshipPreset;
use crate::error::{SeatError, SeatResult};

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Optimize one seating.
    Run(RunOptions),
    /// Repeated runs with summary statistics.
    Batch(RunOptions),
    /// Check that repeated runs produce identical digests.
    Verify(RunOptions),
    /// Print a generated relationship matrix.
    Matrix(RunOptions),
    /// Show help
    Help,
    /// Show version
    Version,
    /// Unparseable command line.
    Invalid {
        /// What went wrong.
        message: String,
    },
}

/// Options shared by every simulation command.
///
/// Each `Some` overrides the matching configuration field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Number of agents.
    pub agents: Option<usize>,
    /// Close-seeking weight.
    pub close: Option<f64>,
    /// Novelty-seeking weight.
    pub explore: Option<f64>,
    /// Master seed.
    pub seed: Option<u64>,
    /// Iteration budget.
    pub max_iterations: Option<usize>,
    /// Relationship preset.
    pub preset: Option<RelationshipPreset>,
    /// Balanced-preset mean.
    pub mean: Option<f64>,
    /// Balanced-preset standard deviation.
    pub std_dev: Option<f64>,
    /// Batch or verification runs.
    pub runs: Option<usize>,
    /// Batch worker threads.
    pub threads: Option<usize>,
    /// Debug-level logging.
    pub verbose: bool,
    /// Emit JSON instead of tables.
    pub json: bool,
}

impl RunOptions {
    /// Resolve the effective configuration: file (or defaults), then overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be loaded or the result is invalid.
    pub fn to_config(&self) -> SeatResult<SimConfig> {
        let mut config = match &self.config_path {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(n) = self.agents {
            config.table.num_agents = n;
        }
        if let Some(close) = self.close {
            config.desires.close = close;
        }
        if let Some(explore) = self.explore {
            config.desires.explore = explore;
        }
        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(max) = self.max_iterations {
            config.optimization.max_iterations = max;
        }
        if let Some(preset) = self.preset {
            config.relationships.preset = preset;
        }
        if let Some(mean) = self.mean {
            config.relationships.mean = mean;
        }
        if let Some(std_dev) = self.std_dev {
            config.relationships.std_dev = std_dev;
        }
        if let Some(runs) = self.runs {
            config.batch.runs = runs;
        }
        if let Some(threads) = self.threads {
            config.batch.threads = threads;
        }

        config.check()?;
        Ok(config)
    }
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether debug logging was requested.
    #[must_use]
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Run(opts)
            | Command::Batch(opts)
            | Command::Verify(opts)
            | Command::Matrix(opts) => opts.verbose,
            _ => false,
        }
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let rest = &args[2..];
        let command = match args[1].as_str() {
            "run" => Self::wrap(parse_options(rest), Command::Run),
            "batch" => Self::wrap(parse_options(rest), Command::Batch),
            "verify" => Self::wrap(parse_options(rest), Command::Verify),
            "matrix" => Self::wrap(parse_options(rest), Command::Matrix),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => Command::Invalid {
                message: format!("unknown command: {unknown}"),
            },
        };

        Self { command }
    }

    fn wrap(parsed: SeatResult<RunOptions>, make: fn(RunOptions) -> Command) -> Command {
        match parsed {
            Ok(opts) => make(opts),
            Err(e) => Command::Invalid {
                message: e.to_string(),
            },
        }
    }
}

/// Parse the option list following a command.
fn parse_options(args: &[String]) -> SeatResult<RunOptions> {
    let mut opts = RunOptions::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "-v" | "--verbose" => opts.verbose = true,
            "--json" => opts.json = true,
            "--config" => opts.config_path = Some(PathBuf::from(value(flag, iter.next())?)),
            "--agents" => opts.agents = Some(parse_value(flag, iter.next())?),
            "--close" => opts.close = Some(parse_value(flag, iter.next())?),
            "--explore" => opts.explore = Some(parse_value(flag, iter.next())?),
            "--seed" => opts.seed = Some(parse_value(flag, iter.next())?),
            "--max-iterations" => opts.max_iterations = Some(parse_value(flag, iter.next())?),
            "--preset" => opts.preset = Some(value(flag, iter.next())?.parse()?),
            "--mean" => opts.mean = Some(parse_value(flag, iter.next())?),
            "--std-dev" => opts.std_dev = Some(parse_value(flag, iter.next())?),
            "--runs" => opts.runs = Some(parse_value(flag, iter.next())?),
            "--threads" => opts.threads = Some(parse_value(flag, iter.next())?),
            other => return Err(SeatError::config(format!("unknown option: {other}"))),
        }
    }

    Ok(opts)
}

fn value<'a>(flag: &str, next: Option<&'a String>) -> SeatResult<&'a str> {
    next.map(String::as_str)
        .ok_or_else(|| SeatError::config(format!("{flag} requires a value")))
}

fn parse_value<T: std::str::FromStr>(flag: &str, next: Option<&String>) -> SeatResult<T> {
    let raw = value(flag, next)?;
    raw.parse()
        .map_err(|_| SeatError::config(format!("invalid value for {flag}: {raw}")))
}
