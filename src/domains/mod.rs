//! Seating-domain models.
//!
//! - Relationships: symmetric strength matrices and their generators
//! - Utility: close-seeking and novelty-seeking desire model
//! - Optimization: greedy single-agent hill climbing
//! - Batch: repeated independent runs with summary statistics

pub mod batch;
pub mod optimization;
pub mod relationships;
pub mod utility;

pub use batch::{BatchReport, BatchRun, BatchRunner, BatchSummary, Statistics};
pub use optimization::{
    apply_move, find_best_move, run_optimization, HillClimber, MoveRecord, SearchState,
    SimulationResult,
};
pub use relationships::{generate_relationship_matrix, RelationshipMatrix, RelationshipPreset};
pub use utility::{agent_utility, total_utility, utility_change, DesireParams};
