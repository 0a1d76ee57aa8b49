//! Jidoka (自働化) - stop-on-error checks for the utility trace.
//!
//! The optimization loop only executes strictly improving moves, so a
//! utility history that goes down or turns non-finite means a broken
//! invariant. The guard runs after every executed move and stops the run
//! with an error instead of letting the defect propagate.

use serde::{Deserialize, Serialize};

use crate::error::{SeatError, SeatResult};

/// Guard configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityGuard {
    /// Allowed downward drift between consecutive history entries.
    pub regression_tolerance: f64,
}

impl Default for UtilityGuard {
    fn default() -> Self {
        Self {
            regression_tolerance: 1e-9,
        }
    }
}

impl UtilityGuard {
    /// Reject NaN and infinite values.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteUtility` naming `location`.
    pub fn check_finite(&self, location: &str, value: f64) -> SeatResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(SeatError::NonFiniteUtility {
                location: location.to_string(),
            })
        }
    }

    /// Check one history step: `current` finite and not below `previous`.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteUtility` or `UtilityRegression`.
    pub fn check_step(&self, iteration: usize, previous: f64, current: f64) -> SeatResult<()> {
        self.check_finite(&format!("iteration {iteration}"), current)?;
        if current < previous - self.regression_tolerance {
            return Err(SeatError::UtilityRegression { previous, current });
        }
        Ok(())
    }

    /// Check a whole history.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_history(&self, history: &[f64]) -> SeatResult<()> {
        if let Some(&first) = history.first() {
            self.check_finite("initial utility", first)?;
        }
        for (i, pair) in history.windows(2).enumerate() {
            self.check_step(i + 1, pair[0], pair[1])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_values_pass() {
        let guard = UtilityGuard::default();
        assert!(guard.check_finite("x", 0.0).is_ok());
        assert!(guard.check_finite("x", 12.5).is_ok());
    }

    #[test]
    fn test_nan_and_inf_stop() {
        let guard = UtilityGuard::default();
        let err = guard.check_finite("agent 2", f64::NAN).expect_err("NaN");
        assert!(err.is_guard_violation());
        assert!(err.to_string().contains("agent 2"));
        assert!(guard.check_finite("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_step_regression() {
        let guard = UtilityGuard::default();
        assert!(guard.check_step(1, 1.0, 1.5).is_ok());
        assert!(guard.check_step(1, 1.0, 1.0).is_ok());
        assert!(matches!(
            guard.check_step(2, 1.0, 0.9),
            Err(SeatError::UtilityRegression { .. })
        ));
    }

    #[test]
    fn test_step_tolerance() {
        let guard = UtilityGuard {
            regression_tolerance: 0.01,
        };
        assert!(guard.check_step(1, 1.0, 0.995).is_ok());
        assert!(guard.check_step(1, 1.0, 0.98).is_err());
    }

    #[test]
    fn test_history() {
        let guard = UtilityGuard::default();
        assert!(guard.check_history(&[]).is_ok());
        assert!(guard.check_history(&[1.0, 1.2, 1.5]).is_ok());
        assert!(guard.check_history(&[1.0, 1.2, 1.1]).is_err());
        assert!(guard.check_history(&[f64::NAN]).is_err());
    }
}
