//! CLI module for seatsim.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions};
pub use commands::{
    error_hint, run_batch, run_cli, run_simulation, show_matrix, verify_reproducibility,
    DEFAULT_VERIFY_RUNS,
};
pub use output::{print_help, print_version};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global fmt subscriber: `DEBUG` when verbose, else `INFO`.
///
/// A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests;
