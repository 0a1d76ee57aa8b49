//! Relationship-based utility.
//!
//! # Governing Equations
//!
//! ```text
//! close(a)   = Σ_{b ∈ N(a), r(a,b) ≥ 0.5} c · r(a,b)
//! explore(a) = Σ_{b ∈ N(a), r(a,b) < 0.5} e · (1 − r(a,b))
//! U(a)       = close(a) + explore(a)
//! U(state)   = Σ_a U(a)
//! ```
//!
//! where `N(a)` is the set of agents seated next to `a`, `c` the close
//! desire and `e` the explore desire. Both terms are non-negative, so every
//! utility is `≥ 0`.

use serde::{Deserialize, Serialize};

use super::relationships::RelationshipMatrix;
use crate::error::{SeatError, SeatResult};
use crate::table::{adjacent_agents, AgentId, SeatingState};

/// Strength at or above which a neighbor counts as close.
pub const CLOSE_THRESHOLD: f64 = 0.5;

/// Desire weights shared by every agent in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesireParams {
    /// Weight on sitting next to close relations.
    pub close: f64,
    /// Weight on sitting next to unfamiliar agents.
    pub explore: f64,
}

impl DesireParams {
    /// Validated desire parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if either weight is outside `[0, 1]`.
    pub fn new(close: f64, explore: f64) -> SeatResult<Self> {
        let desires = Self { close, explore };
        desires.validate()?;
        Ok(desires)
    }

    /// Check both weights lie in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the offending weight.
    pub fn validate(&self) -> SeatResult<()> {
        for (name, value) in [("close", self.close), ("explore", self.explore)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SeatError::config(format!(
                    "desire '{name}' must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for DesireParams {
    fn default() -> Self {
        Self {
            close: 0.7,
            explore: 0.3,
        }
    }
}

/// Utility of one agent split into its two terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUtility {
    /// Close-satisfaction term.
    pub close: f64,
    /// Explore-satisfaction term.
    pub explore: f64,
    /// Number of seated neighbors.
    pub neighbors: usize,
}

impl AgentUtility {
    /// Sum of both terms.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.close + self.explore
    }
}

/// Utility breakdown for `agent` in `state`.
///
/// # Errors
///
/// Returns `AgentNotFound` if the agent is absent from the state or matrix.
pub fn agent_utility_breakdown(
    agent: AgentId,
    state: &SeatingState,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
) -> SeatResult<AgentUtility> {
    let seat = state.seat_of(agent)?;
    let neighbors = adjacent_agents(seat, state)?;

    let mut utility = AgentUtility {
        neighbors: neighbors.len(),
        ..AgentUtility::default()
    };
    for neighbor in neighbors {
        let strength = relationships.strength(agent, neighbor)?;
        if strength >= CLOSE_THRESHOLD {
            utility.close += desires.close * strength;
        } else {
            utility.explore += desires.explore * (1.0 - strength);
        }
    }
    Ok(utility)
}

/// Utility of `agent` in `state`. Isolated agents score 0.0.
///
/// # Errors
///
/// Returns `AgentNotFound` if the agent is absent from the state or matrix.
pub fn agent_utility(
    agent: AgentId,
    state: &SeatingState,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
) -> SeatResult<f64> {
    agent_utility_breakdown(agent, state, relationships, desires).map(|u| u.total())
}

/// Sum of [`agent_utility`] over every seated agent.
///
/// # Errors
///
/// Returns `AgentNotFound` if the state seats agents the matrix does not cover.
pub fn total_utility(
    state: &SeatingState,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
) -> SeatResult<f64> {
    state
        .agents()
        .map(|agent| agent_utility(agent, state, relationships, desires))
        .sum()
}

/// Change in total utility if `agent` moved into the empty seat.
///
/// Evaluates the full candidate state rather than an incremental delta.
///
/// # Errors
///
/// Returns `AgentNotFound` if the agent is absent.
pub fn utility_change(
    state: &SeatingState,
    agent: AgentId,
    relationships: &RelationshipMatrix,
    desires: &DesireParams,
) -> SeatResult<f64> {
    let candidate = state.apply_move(agent)?;
    let before = total_utility(state, relationships, desires)?;
    let after = total_utility(&candidate, relationships, desires)?;
    Ok(after - before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::relationships::generate_relationship_matrix;
    use crate::table::generate_random_seating;

    fn three_agent_matrix() -> RelationshipMatrix {
        // 1-2 close (0.8), 1-3 distant (0.2), 2-3 exactly at threshold (0.5).
        RelationshipMatrix::from_rows(&[
            vec![1.0, 0.8, 0.2],
            vec![0.8, 1.0, 0.5],
            vec![0.2, 0.5, 1.0],
        ])
        .expect("valid matrix")
    }

    fn row_state() -> SeatingState {
        // Seats 1,2,3 hold agents 1,2,3; seat 4 is the designated empty seat.
        SeatingState::from_assignments(&[1, 2, 3, 0, 0, 0, 0, 0, 0, 0], 4).expect("valid")
    }

    #[test]
    fn test_desire_validation() {
        assert!(DesireParams::new(0.0, 1.0).is_ok());
        assert!(DesireParams::new(1.1, 0.2).is_err());
        assert!(DesireParams::new(0.5, -0.01).is_err());
        assert!(DesireParams::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_agent_utility_terms() {
        let m = three_agent_matrix();
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        let state = row_state();

        // Agent 1 sits next to agent 2 only (seat 6 vacant).
        let u1 = agent_utility_breakdown(1, &state, &m, &d).expect("seated");
        assert_eq!(u1.neighbors, 1);
        assert!((u1.close - 0.7 * 0.8).abs() < 1e-12);
        assert!(u1.explore.abs() < 1e-12);

        // Agent 2 sits between 1 (0.8) and 3 (0.5, counts as close).
        let u2 = agent_utility(2, &state, &m, &d).expect("seated");
        assert!((u2 - (0.7 * 0.8 + 0.7 * 0.5)).abs() < 1e-12);

        // Agent 3 sits next to 2 only.
        let u3 = agent_utility(3, &state, &m, &d).expect("seated");
        assert!((u3 - 0.7 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_explore_term() {
        let m = three_agent_matrix();
        let d = DesireParams::new(0.7, 0.3).expect("valid");
        // 1 and 3 side by side in seats 1 and 2.
        let state =
            SeatingState::from_assignments(&[1, 3, 0, 0, 0, 2, 0, 0, 0, 0], 3).expect("valid");
        let u1 = agent_utility_breakdown(1, &state, &m, &d).expect("seated");
        // Neighbors: 3 (0.2 → explore) and 2 facing (0.8 → close).
        assert!((u1.explore - 0.3 * 0.8).abs() < 1e-12);
        assert!((u1.close - 0.7 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_agent_scores_zero() {
        let m = three_agent_matrix();
        let d = DesireParams::default();
        let state =
            SeatingState::from_assignments(&[1, 0, 2, 0, 3, 0, 0, 0, 0, 0], 2).expect("valid");
        for agent in 1..=3 {
            assert!(agent_utility(agent, &state, &m, &d).expect("seated").abs() < f64::EPSILON);
        }
        assert!(total_utility(&state, &m, &d).expect("valid").abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_is_sum_of_agents() {
        let m = three_agent_matrix();
        let d = DesireParams::default();
        let state = row_state();
        let sum: f64 = (1..=3)
            .map(|a| agent_utility(a, &state, &m, &d).expect("seated"))
            .sum();
        assert!((total_utility(&state, &m, &d).expect("valid") - sum).abs() < 1e-12);
    }

    #[test]
    fn test_utility_change_matches_candidate() {
        let m = generate_relationship_matrix(9, 42, 0.5, 0.2).expect("valid");
        let d = DesireParams::default();
        let state = generate_random_seating(9, 10, 42).expect("valid");
        let before = total_utility(&state, &m, &d).expect("valid");
        for agent in 1..=9 {
            let delta = utility_change(&state, agent, &m, &d).expect("seated");
            let after = total_utility(&state.apply_move(agent).expect("seated"), &m, &d)
                .expect("valid");
            assert!((delta - (after - before)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_agent_is_error() {
        let m = three_agent_matrix();
        let d = DesireParams::default();
        assert!(matches!(
            agent_utility(4, &row_state(), &m, &d),
            Err(SeatError::AgentNotFound(4))
        ));
        assert!(utility_change(&row_state(), 9, &m, &d).is_err());
    }

    #[test]
    fn test_matrix_smaller_than_state_is_error() {
        let small = RelationshipMatrix::from_rows(&[vec![1.0, 0.5], vec![0.5, 1.0]])
            .expect("valid");
        assert!(total_utility(&row_state(), &small, &DesireParams::default()).is_err());
    }
}
