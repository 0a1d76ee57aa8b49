//! Simulation engine.
//!
//! Wires a validated [`SimConfig`] to the core:
//! - Deterministic RNG streams derived from the master seed
//! - Relationship matrix and initial seating built once per run
//! - Greedy search guarded by Jidoka checks

pub mod jidoka;
pub mod rng;

pub use jidoka::UtilityGuard;
pub use rng::SimRng;

use crate::config::SimConfig;
use crate::domains::optimization::{HillClimber, SimulationResult};
use crate::domains::relationships::{generate_preset_matrix, RelationshipMatrix};
use crate::domains::utility::DesireParams;
use crate::error::SeatResult;
use crate::table::{generate_random_seating, SeatingState};

/// Stream index of the relationship generator.
pub const RELATIONSHIP_STREAM: u64 = 0;

/// Stream index of the seating generator.
pub const SEATING_STREAM: u64 = 1;

/// One fully initialized run: matrix, seating and desires.
///
/// Built fresh per run; nothing is shared across simulations.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Configuration the run was built from.
    config: SimConfig,
    /// Immutable relationships.
    relationships: RelationshipMatrix,
    /// Starting seating.
    initial: SeatingState,
    /// Desire weights.
    desires: DesireParams,
}

impl Simulation {
    /// Build a run from configuration using its master seed.
    ///
    /// The matrix uses stream [`RELATIONSHIP_STREAM`] (the master seed
    /// itself) and the seating uses stream [`SEATING_STREAM`].
    ///
    /// # Errors
    ///
    /// Returns error if configuration validation fails.
    pub fn new(config: SimConfig) -> SeatResult<Self> {
        let seed = config.seed();
        Self::with_seed(config, seed)
    }

    /// Build a run from configuration with an explicit master seed.
    ///
    /// # Errors
    ///
    /// Returns error if configuration validation fails.
    pub fn with_seed(mut config: SimConfig, seed: u64) -> SeatResult<Self> {
        config.reproducibility.seed = seed;
        config.check()?;
        let desires = config.desire_params()?;

        let relationships = generate_preset_matrix(
            config.relationships.preset,
            config.table.num_agents,
            SimRng::derive_seed(seed, RELATIONSHIP_STREAM),
            config.relationships.mean,
            config.relationships.std_dev,
        )?;
        let initial = generate_random_seating(
            config.table.num_agents,
            config.table.num_seats,
            SimRng::derive_seed(seed, SEATING_STREAM),
        )?;

        Ok(Self {
            config,
            relationships,
            initial,
            desires,
        })
    }

    /// Run the greedy search to convergence or budget exhaustion.
    ///
    /// # Errors
    ///
    /// Returns guard errors from the search.
    pub fn run(&self) -> SeatResult<SimulationResult> {
        HillClimber::default().run(
            &self.initial,
            &self.relationships,
            &self.desires,
            self.config.optimization.max_iterations,
        )
    }

    /// Configuration (with the effective seed).
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Relationship matrix.
    #[must_use]
    pub const fn relationships(&self) -> &RelationshipMatrix {
        &self.relationships
    }

    /// Initial seating.
    #[must_use]
    pub const fn initial_state(&self) -> &SeatingState {
        &self.initial
    }

    /// Desire weights.
    #[must_use]
    pub const fn desires(&self) -> &DesireParams {
        &self.desires
    }

    /// Effective master seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.config.seed()
    }
}
