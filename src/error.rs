//! Error types for seatsim.
//!
//! All fallible operations return `Result<T, SeatError>`. Validation is
//! front-loaded: configuration, matrices and seatings are checked once at
//! construction and every core operation preserves their invariants.

use thiserror::Error;

use crate::table::{AgentId, SeatId};

/// Result type alias for seatsim operations.
pub type SeatResult<T> = Result<T, SeatError>;

/// Unified error type for all seatsim operations.
#[derive(Debug, Error)]
pub enum SeatError {
    // ===== Configuration Errors =====
    /// Invalid configuration or construction input.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== State Errors =====
    /// Agent id absent from a seating state.
    #[error("Agent {0} not found in seating state")]
    AgentNotFound(AgentId),

    /// Seat id outside the table.
    #[error("Seat {0} is not part of the table")]
    SeatOutOfRange(SeatId),

    // ===== Utility Guard =====
    /// Non-finite utility value (NaN or Inf).
    #[error("Guard: non-finite utility detected at {location}")]
    NonFiniteUtility {
        /// Where the value was observed.
        location: String,
    },

    /// Utility history went down after an executed move.
    #[error("Guard: utility regressed from {previous:.6} to {current:.6}")]
    UtilityRegression {
        /// Utility before the move.
        previous: f64,
        /// Utility after the move.
        current: f64,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ===== Batch Errors =====
    /// The batch worker pool could not be started.
    #[error("Batch worker failed: {0}")]
    Worker(String),
}

impl SeatError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether this error was raised by the utility guard.
    #[must_use]
    pub const fn is_guard_violation(&self) -> bool {
        matches!(
            self,
            Self::NonFiniteUtility { .. } | Self::UtilityRegression { .. }
        )
    }

    /// Whether this error signals bad caller input rather than a broken invariant.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. }
                | Self::YamlParse(_)
                | Self::Validation(_)
                | Self::SeatOutOfRange(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_violation_detection() {
        let non_finite = SeatError::NonFiniteUtility {
            location: "agent 3".to_string(),
        };
        assert!(non_finite.is_guard_violation());

        let regression = SeatError::UtilityRegression {
            previous: 2.0,
            current: 1.5,
        };
        assert!(regression.is_guard_violation());

        assert!(!SeatError::config("bad").is_guard_violation());
        assert!(!SeatError::AgentNotFound(4).is_guard_violation());
    }

    #[test]
    fn test_error_config() {
        let err = SeatError::config("num_agents must be below num_seats");
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("Invalid configuration"));
        assert!(msg.contains("num_agents"));
    }

    #[test]
    fn test_agent_not_found_is_not_configuration() {
        let err = SeatError::AgentNotFound(7);
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("Agent 7"));
    }

    #[test]
    fn test_seat_out_of_range_display() {
        let err = SeatError::SeatOutOfRange(11);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Seat 11"));
    }

    #[test]
    fn test_regression_display() {
        let err = SeatError::UtilityRegression {
            previous: 3.25,
            current: 3.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("3.250000"));
        assert!(msg.contains("3.000000"));
    }

    #[test]
    fn test_io_from() {
        let err: SeatError = std::io::Error::other("disk gone").into();
        assert!(err.to_string().contains("I/O error"));
    }
}
