//! The ten-seat table: seat topology and seating states.

pub mod adjacency;
pub mod seating;

pub use adjacency::{adjacent_agents, adjacent_seats, are_adjacent};
pub use seating::{generate_random_seating, SeatingState};

use crate::error::{SeatError, SeatResult};

/// Seat identifier, `1..=NUM_SEATS`.
pub type SeatId = usize;

/// Agent identifier, `1..=num_agents`. [`EMPTY`] marks a vacant seat.
pub type AgentId = usize;

/// Number of seats at the table. The topology is fixed.
pub const NUM_SEATS: usize = 10;

/// Seats per row.
pub const ROW_LEN: usize = 5;

/// Sentinel stored in a vacant seat.
pub const EMPTY: AgentId = 0;

/// Check an agent/seat count pair against the fixed table.
///
/// # Errors
///
/// Returns `InvalidConfiguration` unless `num_seats == 10` and
/// `1 <= num_agents < num_seats`.
pub fn validate_table_size(num_agents: usize, num_seats: usize) -> SeatResult<()> {
    if num_seats != NUM_SEATS {
        return Err(SeatError::config(format!(
            "table must have exactly {NUM_SEATS} seats, got {num_seats}"
        )));
    }
    if num_agents == 0 {
        return Err(SeatError::config("num_agents must be at least 1"));
    }
    if num_agents >= num_seats {
        return Err(SeatError::config(format!(
            "num_agents ({num_agents}) must be below num_seats ({num_seats})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_size() {
        assert!(validate_table_size(9, 10).is_ok());
        assert!(validate_table_size(1, 10).is_ok());
        assert!(validate_table_size(0, 10).is_err());
        assert!(validate_table_size(10, 10).is_err());
        assert!(validate_table_size(5, 12).is_err());
    }
}
