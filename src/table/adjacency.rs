//! Seat adjacency for the two-row, ten-seat table.
//!
//! ```text
//!   ┌────┬────┬────┬────┬────┐
//!   │  1 │  2 │  3 │  4 │  5 │
//!   ├────┴────┴────┴────┴────┤
//!   │          table         │
//!   ├────┬────┬────┬────┬────┤
//!   │  6 │  7 │  8 │  9 │ 10 │
//!   └────┴────┴────┴────┴────┘
//! ```
//!
//! Seats are neighbors when they sit side by side in the same row or face
//! each other across the table. The relation is a static table; another
//! table shape would be another table, not another type.

use super::seating::SeatingState;
use super::{AgentId, SeatId, NUM_SEATS};
use crate::error::{SeatError, SeatResult};

/// Side-by-side pairs within a row.
pub const HORIZONTAL_PAIRS: [(SeatId, SeatId); 8] = [
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (6, 7),
    (7, 8),
    (8, 9),
    (9, 10),
];

/// Face-to-face pairs across the table.
pub const FACING_PAIRS: [(SeatId, SeatId); 5] = [(1, 6), (2, 7), (3, 8), (4, 9), (5, 10)];

/// Neighbor lists indexed by `seat - 1`, sorted ascending.
///
/// Symmetric closure of [`HORIZONTAL_PAIRS`] and [`FACING_PAIRS`].
const NEIGHBORS: [&[SeatId]; NUM_SEATS] = [
    &[2, 6],
    &[1, 3, 7],
    &[2, 4, 8],
    &[3, 5, 9],
    &[4, 10],
    &[1, 7],
    &[2, 6, 8],
    &[3, 7, 9],
    &[4, 8, 10],
    &[5, 9],
];

/// Check that `seat` is on the table.
///
/// # Errors
///
/// Returns `SeatOutOfRange` for ids outside `1..=10`.
pub fn check_seat(seat: SeatId) -> SeatResult<()> {
    if (1..=NUM_SEATS).contains(&seat) {
        Ok(())
    } else {
        Err(SeatError::SeatOutOfRange(seat))
    }
}

/// Seats adjacent to `seat`.
///
/// # Errors
///
/// Returns `SeatOutOfRange` for ids outside `1..=10`.
pub fn adjacent_seats(seat: SeatId) -> SeatResult<&'static [SeatId]> {
    check_seat(seat)?;
    Ok(NEIGHBORS[seat - 1])
}

/// Whether seats `a` and `b` are neighbors. Out-of-range seats never are.
#[must_use]
pub fn are_adjacent(a: SeatId, b: SeatId) -> bool {
    adjacent_seats(a).is_ok_and(|neighbors| neighbors.contains(&b))
}

/// Agents seated next to `seat`, in ascending seat order.
///
/// Empty when `seat` itself is unoccupied.
///
/// # Errors
///
/// Returns `SeatOutOfRange` for ids outside `1..=10`.
pub fn adjacent_agents(seat: SeatId, state: &SeatingState) -> SeatResult<Vec<AgentId>> {
    let neighbors = adjacent_seats(seat)?;
    if state.occupant(seat)?.is_none() {
        return Ok(Vec::new());
    }

    let mut agents = Vec::with_capacity(neighbors.len());
    for &neighbor in neighbors {
        if let Some(agent) = state.occupant(neighbor)? {
            agents.push(agent);
        }
    }
    Ok(agents)
}
