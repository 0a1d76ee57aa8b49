//! Repeated independent runs with summary statistics.
//!
//! Run `i` builds its own [`Simulation`] from stream `i` of
//! [`SimRng::partition`] over the master seed, so results depend only on the
//! configuration and never on how runs are spread over worker threads.
//!
//! # Example
//!
//! ```rust
//! use seatsim::config::SimConfig;
//! use seatsim::domains::batch::BatchRunner;
//!
//! let config = SimConfig::builder().seed(3).runs(4).build();
//! let report = BatchRunner::new(config).unwrap().run().unwrap();
//! assert_eq!(report.summary.runs, 4);
//! ```

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::optimization::SimulationResult;
use crate::config::SimConfig;
use crate::engine::{SimRng, Simulation};
use crate::error::{SeatError, SeatResult};

/// One run of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRun {
    /// 0-based run index.
    pub index: usize,
    /// Master seed used for this run.
    pub seed: u64,
    /// Optimization outcome.
    pub result: SimulationResult,
}

/// Location and spread of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Statistics {
    /// Summarize `values`; all zeros for an empty sample.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Aggregate over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of runs.
    pub runs: usize,
    /// Runs that reached a local optimum.
    pub converged: usize,
    /// `converged / runs`.
    pub convergence_rate: f64,
    /// Initial utility.
    pub initial_utility: Statistics,
    /// Final utility.
    pub final_utility: Statistics,
    /// Final minus initial utility.
    pub improvement: Statistics,
    /// Mean iterations consumed.
    pub mean_iterations: f64,
    /// Mean executed moves.
    pub mean_moves: f64,
}

impl BatchSummary {
    /// Aggregate a set of results.
    #[must_use]
    pub fn from_results(results: &[SimulationResult]) -> Self {
        let runs = results.len();
        let converged = results.iter().filter(|r| r.converged).count();

        let initial: Vec<f64> = results.iter().map(SimulationResult::initial_utility).collect();
        let final_: Vec<f64> = results.iter().map(SimulationResult::final_utility).collect();
        let improvement: Vec<f64> = results.iter().map(SimulationResult::improvement).collect();

        let (convergence_rate, mean_iterations, mean_moves) = if runs == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let n = runs as f64;
            (
                converged as f64 / n,
                results.iter().map(|r| r.iterations as f64).sum::<f64>() / n,
                results.iter().map(|r| r.num_moves() as f64).sum::<f64>() / n,
            )
        };

        Self {
            runs,
            converged,
            convergence_rate,
            initial_utility: Statistics::from_values(&initial),
            final_utility: Statistics::from_values(&final_),
            improvement: Statistics::from_values(&improvement),
            mean_iterations,
            mean_moves,
        }
    }
}

/// Runs plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Individual runs in index order.
    pub runs: Vec<BatchRun>,
    /// Aggregate statistics.
    pub summary: BatchSummary,
}

impl BatchReport {
    fn from_runs(runs: Vec<BatchRun>) -> Self {
        let results: Vec<SimulationResult> = runs.iter().map(|r| r.result.clone()).collect();
        let summary = BatchSummary::from_results(&results);
        Self { runs, summary }
    }

    /// Digest of every run in index order.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn digests(&self) -> SeatResult<Vec<String>> {
        self.runs.iter().map(|r| r.result.digest()).collect()
    }
}

/// Executes `config.batch.runs` independent simulations.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: SimConfig,
}

impl BatchRunner {
    /// Create a runner.
    ///
    /// # Errors
    ///
    /// Returns error if configuration validation fails.
    pub fn new(config: SimConfig) -> SeatResult<Self> {
        config.check()?;
        Ok(Self { config })
    }

    /// Configuration shared by every run.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Master seed of run `index`.
    #[must_use]
    pub const fn seed_for(&self, index: usize) -> u64 {
        SimRng::derive_seed(self.config.seed(), index as u64)
    }

    /// Master seeds of every run, one partitioned stream per index.
    #[must_use]
    pub fn seeds(&self) -> Vec<u64> {
        SimRng::new(self.config.seed())
            .partition(self.config.batch.runs)
            .iter()
            .map(SimRng::seed)
            .collect()
    }

    /// Execute a single run by index.
    ///
    /// # Errors
    ///
    /// Returns the run's optimization error.
    pub fn run_one(&self, index: usize) -> SeatResult<BatchRun> {
        self.run_seeded(index, self.seed_for(index))
    }

    fn run_seeded(&self, index: usize, seed: u64) -> SeatResult<BatchRun> {
        let result = Simulation::with_seed(self.config.clone(), seed)?.run()?;
        debug!(index, seed, converged = result.converged, "batch run finished");
        Ok(BatchRun {
            index,
            seed,
            result,
        })
    }

    /// Execute all runs with `config.batch.threads` workers.
    ///
    /// # Errors
    ///
    /// Returns the first failing run's error.
    pub fn run(&self) -> SeatResult<BatchReport> {
        if self.config.batch.threads <= 1 {
            self.run_sequential()
        } else {
            self.run_parallel(self.config.batch.threads)
        }
    }

    /// Execute all runs on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the first failing run's error.
    pub fn run_sequential(&self) -> SeatResult<BatchReport> {
        let runs = self
            .seeds()
            .into_iter()
            .enumerate()
            .map(|(i, seed)| self.run_seeded(i, seed))
            .collect::<SeatResult<Vec<_>>>()?;
        let report = BatchReport::from_runs(runs);
        log_summary(&report.summary, 1);
        Ok(report)
    }

    /// Execute all runs on a dedicated rayon pool of `threads` workers.
    ///
    /// Results come back in index order, identical to [`Self::run_sequential`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for zero threads, `Worker` if the pool
    /// cannot be built, or the first failing run's error.
    pub fn run_parallel(&self, threads: usize) -> SeatResult<BatchReport> {
        if threads == 0 {
            return Err(SeatError::config("threads must be positive"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SeatError::Worker(e.to_string()))?;

        let seeds = self.seeds();
        let runs = pool.install(|| {
            seeds
                .into_par_iter()
                .enumerate()
                .map(|(i, seed)| self.run_seeded(i, seed))
                .collect::<SeatResult<Vec<_>>>()
        })?;

        let report = BatchReport::from_runs(runs);
        log_summary(&report.summary, threads);
        Ok(report)
    }
}

fn log_summary(summary: &BatchSummary, workers: usize) {
    info!(
        runs = summary.runs,
        converged = summary.converged,
        workers,
        mean_final = summary.final_utility.mean,
        "batch complete"
    );
}
