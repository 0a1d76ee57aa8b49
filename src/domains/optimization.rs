//! Greedy hill-climbing over single-agent moves.
//!
//! Each iteration evaluates moving every agent into the empty seat, executes
//! the single best strictly-improving move, and stops when no move improves
//! total utility by more than [`IMPROVEMENT_TOLERANCE`] (local optimum) or
//! when the iteration budget runs out.
//!
//! # Example
//!
//! ```rust
//! use seatsim::domains::optimization::run_optimization;
//! use seatsim::domains::relationships::generate_relationship_matrix;
//! use seatsim::domains::utility::DesireParams;
//! use seatsim::table::generate_random_seating;
//!
//! let relationships = generate_relationship_matrix(9, 42, 0.5, 0.2).unwrap();
//! let initial = generate_random_seating(9, 10, 42).unwrap();
//! let desires = DesireParams::new(0.7, 0.3).unwrap();
//!
//! let result = run_optimization(&initial, &relationships, &desires, 50).unwrap();
//! assert!(result.final_utility() >= result.initial_utility());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::relationships::RelationshipMatrix;
use super::utility::{total_utility, utility_change, DesireParams};
use crate::engine::jidoka::UtilityGuard;
use crate::error::{SeatError, SeatResult};
use crate::table::{AgentId, SeatId, SeatingState};

/// Gains at or below this are treated as no improvement.
pub const IMPROVEMENT_TOLERANCE: f64 = 1e-10;

/// Search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Still looking for improving moves.
    Running,
    /// No improving move exists: local optimum reached.
    Converged,
    /// Iteration budget spent before convergence.
    Exhausted,
}

/// One executed move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based iteration that executed the move.
    pub iteration: usize,
    /// Agent that moved.
    pub agent: AgentId,
    /// Seat the agent left (the new empty seat).
    pub from_seat: SeatId,
    /// Seat the agent took (the previous empty seat).
    pub to_seat: SeatId,
    /// Total utility gained.
    pub gain: f64,
}

/// Outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seating before the first move.
    pub initial_state: SeatingState,
    /// Seating when the search stopped.
    pub final_state: SeatingState,
    /// Iterations consumed (the detecting iteration when converged).
    pub iterations: usize,
    /// Total utility, starting with the initial state, one entry per move.
    pub utility_history: Vec<f64>,
    /// Whether a local optimum was reached.
    pub converged: bool,
    /// Terminal search state.
    pub search_state: SearchState,
    /// Executed moves in order.
    pub moves: Vec<MoveRecord>,
}

impl SimulationResult {
    /// Utility of the initial seating.
    #[must_use]
    pub fn initial_utility(&self) -> f64 {
        self.utility_history.first().copied().unwrap_or(0.0)
    }

    /// Utility of the final seating.
    #[must_use]
    pub fn final_utility(&self) -> f64 {
        self.utility_history.last().copied().unwrap_or(0.0)
    }

    /// Final minus initial utility.
    #[must_use]
    pub fn improvement(&self) -> f64 {
        self.final_utility() - self.initial_utility()
    }

    /// Number of executed moves.
    #[must_use]
    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }

    /// Whether every executed move strictly increased utility.
    #[must_use]
    pub fn is_strictly_increasing(&self) -> bool {
        self.utility_history.windows(2).all(|w| w[1] > w[0])
    }

    /// Hex blake3 digest of the binary-encoded result.
    ///
    /// Identical inputs give identical digests on every platform.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn digest(&self) -> SeatResult<String> {
        let bytes = bincode::serialize(self).map_err(|e| SeatError::serialization(e.to_string()))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Best move into the current empty seat.
///
/// Returns `(Some(agent), gain)` for the agent with the strictly greatest gain
/// above [`IMPROVEMENT_TOLERANCE`]; the lowest agent id wins ties. Otherwise
/// returns `(None, best_gain)` with the largest (possibly negative) gain seen.
///
/// # Errors
///
/// Returns `AgentNotFound` if the state and matrix disagree on agents.
pub fn find_best_move(
    state: &SeatingState,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
) -> SeatResult<(Option<AgentId>, f64)> {
    let mut best_agent = None;
    let mut best_gain = f64::NEG_INFINITY;

    for agent in state.agents() {
        let gain = utility_change(state, agent, relationships, desires)?;
        if gain > best_gain {
            best_gain = gain;
            best_agent = Some(agent);
        }
    }

    if best_gain > IMPROVEMENT_TOLERANCE {
        Ok((best_agent, best_gain))
    } else {
        Ok((None, best_gain))
    }
}

/// Move `agent` into the empty seat of `state`.
///
/// # Errors
///
/// Returns `AgentNotFound` if the agent is not seated.
pub fn apply_move(state: &SeatingState, agent: AgentId) -> SeatResult<SeatingState> {
    state.apply_move(agent)
}

/// Greedy single-agent hill climber.
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimber {
    /// Guard applied to every new history entry.
    guard: UtilityGuard,
}

impl HillClimber {
    /// Run to a local optimum or until `max_iterations` iterations elapse.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for `max_iterations == 0`, invalid
    /// desires, or a matrix that does not cover the seated agents. Returns a
    /// guard error if the utility trace turns non-finite or regresses.
    pub fn run(
        &self,
        initial: &SeatingState,
        relationships: &RelationshipMatrix,
        desires: &DesireParams,
        max_iterations: usize,
    ) -> SeatResult<SimulationResult> {
        if max_iterations == 0 {
            return Err(SeatError::config("max_iterations must be positive"));
        }
        desires.validate()?;
        if relationships.num_agents() != initial.num_agents() {
            return Err(SeatError::config(format!(
                "relationship matrix covers {} agents but the seating has {}",
                relationships.num_agents(),
                initial.num_agents()
            )));
        }

        let mut state = *initial;
        let mut utility = total_utility(&state, relationships, desires)?;
        self.guard.check_finite("initial utility", utility)?;

        let mut history = vec![utility];
        let mut moves = Vec::new();
        let mut search = SearchState::Running;
        let mut iterations = max_iterations;

        for iteration in 1..=max_iterations {
            let (best, gain) = find_best_move(&state, relationships, desires)?;
            let Some(agent) = best else {
                search = SearchState::Converged;
                iterations = iteration;
                break;
            };

            let from_seat = state.seat_of(agent)?;
            let to_seat = state.empty_seat();
            state = state.apply_move(agent)?;

            let next = total_utility(&state, relationships, desires)?;
            self.guard.check_step(iteration, utility, next)?;
            debug!(iteration, agent, from_seat, to_seat, gain, utility = next, "move executed");

            utility = next;
            history.push(utility);
            moves.push(MoveRecord {
                iteration,
                agent,
                from_seat,
                to_seat,
                gain,
            });
        }

        if search == SearchState::Running {
            search = SearchState::Exhausted;
            warn!(max_iterations, utility, "iteration budget exhausted before convergence");
        } else {
            info!(iterations, moves = moves.len(), utility, "converged to local optimum");
        }

        Ok(SimulationResult {
            initial_state: *initial,
            final_state: state,
            iterations,
            utility_history: history,
            converged: search == SearchState::Converged,
            search_state: search,
            moves,
        })
    }
}

/// Run greedy search from `initial` with the default guard.
///
/// # Errors
///
/// See [`HillClimber::run`].
pub fn run_optimization(
    initial: &SeatingState,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
    max_iterations: usize,
) -> SeatResult<SimulationResult> {
    HillClimber::default().run(initial, relationships, desires, max_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::relationships::{
        generate_relationship_matrix, DEFAULT_MEAN, DEFAULT_STD_DEV,
    };
    use crate::table::generate_random_seating;

    fn pair_matrix(strength: f64) -> RelationshipMatrix {
        RelationshipMatrix::from_rows(&[vec![1.0, strength], vec![strength, 1.0]]).expect("valid")
    }

    /// Agents 1 and 2 in seats 1 and 3, seat 2 empty: either move joins them.
    fn split_pair() -> SeatingState {
        SeatingState::from_assignments(&[1, 0, 2, 0, 0, 0, 0, 0, 0, 0], 2).expect("valid")
    }

    #[test]
    fn test_tie_break_lowest_agent() {
        let m = pair_matrix(0.8);
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        let (agent, gain) = find_best_move(&split_pair(), &m, &d).expect("valid");
        assert_eq!(agent, Some(1));
        assert!((gain - 2.0 * 0.7 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_no_improvement_returns_none() {
        let m = pair_matrix(0.8);
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        // Already adjacent in seats 1 and 2; empty seat 3 next to agent 2 only.
        let state =
            SeatingState::from_assignments(&[1, 2, 0, 0, 0, 0, 0, 0, 0, 0], 3).expect("valid");
        let (agent, gain) = find_best_move(&state, &m, &d).expect("valid");
        assert_eq!(agent, None);
        assert!(gain <= IMPROVEMENT_TOLERANCE);
    }

    #[test]
    fn test_zero_desires_never_move() {
        let m = generate_relationship_matrix(9, 3, DEFAULT_MEAN, DEFAULT_STD_DEV).expect("valid");
        let d = DesireParams::new(0.0, 0.0).expect("valid");
        let state = generate_random_seating(9, 10, 3).expect("valid");
        let result = run_optimization(&state, &m, &d, 10).expect("valid");
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.utility_history, vec![0.0]);
        assert_eq!(result.final_state, state);
    }

    #[test]
    fn test_run_pair_converges_after_one_move() {
        let m = pair_matrix(0.8);
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        let result = run_optimization(&split_pair(), &m, &d, 10).expect("valid");

        assert!(result.converged);
        assert_eq!(result.search_state, SearchState::Converged);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.num_moves(), 1);
        assert_eq!(result.utility_history.len(), 2);
        assert_eq!(
            result.moves[0],
            MoveRecord {
                iteration: 1,
                agent: 1,
                from_seat: 1,
                to_seat: 2,
                gain: result.moves[0].gain,
            }
        );
        assert_eq!(result.final_state.seat_of(1).ok(), Some(2));
        assert_eq!(result.final_state.empty_seat(), 1);
    }

    #[test]
    fn test_budget_exhaustion() {
        let m = pair_matrix(0.8);
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        let result = run_optimization(&split_pair(), &m, &d, 1).expect("valid");

        assert!(!result.converged);
        assert_eq!(result.search_state, SearchState::Exhausted);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.utility_history.len(), 2);
    }

    #[test]
    fn test_rejects_zero_budget() {
        let m = pair_matrix(0.8);
        let d = DesireParams::default();
        assert!(matches!(
            run_optimization(&split_pair(), &m, &d, 0),
            Err(SeatError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_mismatched_matrix() {
        let m = generate_relationship_matrix(3, 1, 0.5, 0.2).expect("valid");
        let d = DesireParams::default();
        assert!(run_optimization(&split_pair(), &m, &d, 5).is_err());
    }

    #[test]
    fn test_rejects_invalid_desires() {
        let m = pair_matrix(0.8);
        let d = DesireParams {
            close: 2.0,
            explore: 0.0,
        };
        assert!(run_optimization(&split_pair(), &m, &d, 5).is_err());
    }

    #[test]
    fn test_history_invariants_on_generated_run() {
        let m = generate_relationship_matrix(9, 42, DEFAULT_MEAN, DEFAULT_STD_DEV).expect("valid");
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        let initial = generate_random_seating(9, 10, 42).expect("valid");
        let result = run_optimization(&initial, &m, &d, 50).expect("valid");

        assert!(result.converged);
        assert_eq!(result.utility_history.len(), 1 + result.num_moves());
        let u0 = total_utility(&initial, &m, &d).expect("valid");
        assert!((result.initial_utility() - u0).abs() < f64::EPSILON);
        assert!(result.is_strictly_increasing());
        let uf = total_utility(&result.final_state, &m, &d).expect("valid");
        assert!((result.final_utility() - uf).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_idempotent() {
        let m = generate_relationship_matrix(8, 11, DEFAULT_MEAN, DEFAULT_STD_DEV).expect("valid");
        let d = DesireParams::new(0.6, 0.4).expect("valid");
        let initial = generate_random_seating(8, 10, 11).expect("valid");
        let result = run_optimization(&initial, &m, &d, 100).expect("valid");
        assert!(result.converged);

        let first = find_best_move(&result.final_state, &m, &d).expect("valid");
        let second = find_best_move(&result.final_state, &m, &d).expect("valid");
        assert_eq!(first.0, None);
        assert!(first.1 <= IMPROVEMENT_TOLERANCE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_digest_stable() {
        let m = pair_matrix(0.8);
        let d = DesireParams::default();
        let a = run_optimization(&split_pair(), &m, &d, 10).expect("valid");
        let b = run_optimization(&split_pair(), &m, &d, 10).expect("valid");
        let digest = a.digest().expect("encodes");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, b.digest().expect("encodes"));

        let c = run_optimization(&split_pair(), &pair_matrix(0.9), &d, 10).expect("valid");
        assert_ne!(digest, c.digest().expect("encodes"));
    }

    #[test]
    fn test_apply_move_delegates() {
        let state = split_pair();
        assert_eq!(apply_move(&state, 2).ok(), state.apply_move(2).ok());
    }
}
