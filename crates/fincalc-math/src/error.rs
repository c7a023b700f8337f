//! Error types for numerical routines.

use thiserror::Error;

/// A specialized Result type for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during numerical routines.
///
/// Note that running out of iterations is *not* an error for the solvers in
/// this crate: it is reported through [`crate::solvers::Termination`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// A payoff simulation ended with a balance outstanding, either at its
    /// period ceiling or earlier because payments no longer reduce the
    /// balance.
    #[error("Balance not paid off within the {periods}-period ceiling ({remaining_balance:.2} remaining)")]
    PayoffNotAchieved {
        /// The period ceiling the simulation ran under, not the number of
        /// periods simulated.
        periods: u32,
        /// Balance left when the loop stopped.
        remaining_balance: f64,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a payoff-not-achieved error.
    #[must_use]
    pub fn payoff_not_achieved(periods: u32, remaining_balance: f64) -> Self {
        Self::PayoffNotAchieved {
            periods,
            remaining_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::payoff_not_achieved(600, 1234.5);
        assert!(err.to_string().contains("600-period ceiling"));
        assert!(err.to_string().contains("1234.50"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = MathError::invalid_input("market price must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input: market price must be positive"
        );
    }
}
