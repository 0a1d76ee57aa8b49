//! # seatsim
//!
//! Deterministic greedy seating optimization around a ten-seat table.
//!
//! Agents sit in two facing rows of five with one designated empty seat.
//! Each agent values sitting next to people it likes (close desire) and
//! next to people it barely knows (explore desire). The optimizer repeatedly
//! moves the single agent whose relocation into the empty seat raises total
//! utility the most, until no move helps.
//!
//! - Jidoka: the utility trace is guarded against regressions and NaN
//! - Poka-Yoke: configuration is range- and semantically validated
//! - Reproducibility: every generator takes an explicit seed
//!
//! ## Example
//!
//! ```rust
//! use seatsim::prelude::*;
//!
//! let config = SimConfig::builder().seed(42).max_iterations(50).build();
//! let result = Simulation::new(config).unwrap().run().unwrap();
//! assert!(result.final_utility() >= result.initial_utility());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod cli;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod table;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{SimConfig, SimConfigBuilder};
    pub use crate::domains::batch::{BatchReport, BatchRunner, BatchSummary};
    pub use crate::domains::optimization::{HillClimber, SimulationResult};
    pub use crate::domains::relationships::{RelationshipMatrix, RelationshipPreset};
    pub use crate::domains::utility::DesireParams;
    pub use crate::engine::jidoka::UtilityGuard;
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::Simulation;
    pub use crate::error::{SeatError, SeatResult};
    pub use crate::table::{AgentId, SeatId, SeatingState};
}

/// Re-export for public API
pub use domains::optimization::{apply_move, find_best_move, run_optimization};
pub use domains::relationships::generate_relationship_matrix;
pub use domains::utility::total_utility;
pub use error::{SeatError, SeatResult};
pub use table::generate_random_seating;
