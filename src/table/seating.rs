//! Seating states.
//!
//! A [`SeatingState`] is a small `Copy` value: ten slots holding agent ids
//! (with [`EMPTY`] as the vacant sentinel) plus the designated empty seat that
//! the next move fills. Moves never mutate a state; they return a new one.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::adjacency::check_seat;
use super::{validate_table_size, AgentId, SeatId, EMPTY, NUM_SEATS, ROW_LEN};
use crate::engine::rng::SimRng;
use crate::error::{SeatError, SeatResult};

/// Assignment of agents to seats.
///
/// # Invariants
///
/// - agents `1..=num_agents` each occupy exactly one seat;
/// - every other seat holds [`EMPTY`];
/// - `empty_seat` is one of the vacant seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSeating")]
pub struct SeatingState {
    /// Occupant per seat, indexed by `seat - 1`.
    seats: [AgentId; NUM_SEATS],
    /// The vacant seat that moves target.
    empty_seat: SeatId,
    /// Number of seated agents.
    num_agents: usize,
}

/// Serialized form of [`SeatingState`], validated before use.
#[derive(Deserialize)]
struct RawSeating {
    seats: [AgentId; NUM_SEATS],
    empty_seat: SeatId,
    num_agents: usize,
}

impl TryFrom<RawSeating> for SeatingState {
    type Error = SeatError;

    fn try_from(raw: RawSeating) -> SeatResult<Self> {
        let state = Self::from_assignments(&raw.seats, raw.empty_seat)?;
        if state.num_agents != raw.num_agents {
            return Err(SeatError::config(format!(
                "seating lists {} agents but declares num_agents = {}",
                state.num_agents, raw.num_agents
            )));
        }
        Ok(state)
    }
}

impl SeatingState {
    /// Build a state from explicit occupants (`seats[i]` sits in seat `i + 1`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the slice is not ten seats long, the
    /// occupants are not exactly the agents `1..=N` once each, or `empty_seat`
    /// is occupied. Returns `SeatOutOfRange` for an invalid `empty_seat`.
    pub fn from_assignments(seats: &[AgentId], empty_seat: SeatId) -> SeatResult<Self> {
        let seats: [AgentId; NUM_SEATS] = seats.try_into().map_err(|_| {
            SeatError::config(format!(
                "seating must list {NUM_SEATS} seats, got {}",
                seats.len()
            ))
        })?;
        check_seat(empty_seat)?;

        let num_agents = seats.iter().filter(|&&a| a != EMPTY).count();
        validate_table_size(num_agents, NUM_SEATS)?;

        let mut seen = [false; NUM_SEATS];
        for &agent in seats.iter().filter(|&&a| a != EMPTY) {
            if agent > num_agents {
                return Err(SeatError::config(format!(
                    "agent {agent} out of range for {num_agents} agents"
                )));
            }
            if seen[agent - 1] {
                return Err(SeatError::config(format!("agent {agent} seated twice")));
            }
            seen[agent - 1] = true;
        }

        if seats[empty_seat - 1] != EMPTY {
            return Err(SeatError::config(format!(
                "designated empty seat {empty_seat} is occupied by agent {}",
                seats[empty_seat - 1]
            )));
        }

        Ok(Self {
            seats,
            empty_seat,
            num_agents,
        })
    }

    /// Number of seated agents.
    #[must_use]
    pub const fn num_agents(&self) -> usize {
        self.num_agents
    }

    /// The designated empty seat.
    #[must_use]
    pub const fn empty_seat(&self) -> SeatId {
        self.empty_seat
    }

    /// Occupants indexed by `seat - 1`.
    #[must_use]
    pub const fn seats(&self) -> &[AgentId; NUM_SEATS] {
        &self.seats
    }

    /// Agent ids present in this state, ascending.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> {
        1..=self.num_agents
    }

    /// Occupant of `seat`, `None` when vacant.
    ///
    /// # Errors
    ///
    /// Returns `SeatOutOfRange` for ids outside `1..=10`.
    pub fn occupant(&self, seat: SeatId) -> SeatResult<Option<AgentId>> {
        check_seat(seat)?;
        let agent = self.seats[seat - 1];
        Ok((agent != EMPTY).then_some(agent))
    }

    /// Seat held by `agent`.
    ///
    /// # Errors
    ///
    /// Returns `AgentNotFound` when the agent is not seated.
    pub fn seat_of(&self, agent: AgentId) -> SeatResult<SeatId> {
        if agent == EMPTY {
            return Err(SeatError::AgentNotFound(agent));
        }
        self.seats
            .iter()
            .position(|&a| a == agent)
            .map(|idx| idx + 1)
            .ok_or(SeatError::AgentNotFound(agent))
    }

    /// Move `agent` into the designated empty seat.
    ///
    /// The agent's previous seat becomes the new designated empty seat;
    /// every other seat is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AgentNotFound` when the agent is not seated.
    pub fn apply_move(&self, agent: AgentId) -> SeatResult<Self> {
        let from = self.seat_of(agent)?;
        let mut seats = self.seats;
        seats[self.empty_seat - 1] = agent;
        seats[from - 1] = EMPTY;
        Ok(Self {
            seats,
            empty_seat: from,
            num_agents: self.num_agents,
        })
    }

    /// Occupants of row `row` (0 = seats 1..=5, 1 = seats 6..=10).
    #[must_use]
    pub fn row(&self, row: usize) -> &[AgentId] {
        let start = row.min(1) * ROW_LEN;
        &self.seats[start..start + ROW_LEN]
    }
}

impl fmt::Display for SeatingState {
    /// Two rows of five; `*` marks the designated empty seat, `.` other vacancies.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..2 {
            write!(f, "[")?;
            for (col, &agent) in self.row(row).iter().enumerate() {
                let seat = row * ROW_LEN + col + 1;
                if agent != EMPTY {
                    write!(f, " {agent:>2}")?;
                } else if seat == self.empty_seat {
                    write!(f, "  *")?;
                } else {
                    write!(f, "  .")?;
                }
            }
            write!(f, " ]")?;
            if row == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Random initial placement of `num_agents` agents.
///
/// The seats are shuffled with a generator seeded by `seed`; agents
/// `1..=num_agents` take the first shuffled seats in order and the next
/// shuffled seat becomes the designated empty seat.
///
/// # Errors
///
/// Returns `InvalidConfiguration` unless `num_seats == 10` and
/// `1 <= num_agents < num_seats`.
pub fn generate_random_seating(
    num_agents: usize,
    num_seats: usize,
    seed: u64,
) -> SeatResult<SeatingState> {
    let mut rng = SimRng::new(seed);
    random_seating_with(num_agents, num_seats, &mut rng)
}

/// [`generate_random_seating`] drawing from an existing generator.
///
/// # Errors
///
/// Same as [`generate_random_seating`].
pub fn random_seating_with(
    num_agents: usize,
    num_seats: usize,
    rng: &mut SimRng,
) -> SeatResult<SeatingState> {
    validate_table_size(num_agents, num_seats)?;

    let mut order: Vec<SeatId> = (1..=NUM_SEATS).collect();
    rng.shuffle(&mut order);

    let mut seats = [EMPTY; NUM_SEATS];
    for (agent, &seat) in (1..=num_agents).zip(order.iter()) {
        seats[seat - 1] = agent;
    }

    Ok(SeatingState {
        seats,
        empty_seat: order[num_agents],
        num_agents,
    })
}
