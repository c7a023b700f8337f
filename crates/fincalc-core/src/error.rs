//! Error types for the formula engine.
//!
//! Four families, by who is at fault and when they surface:
//!
//! - [`ContractError`]: a malformed contract or registry; raised while the
//!   catalog is built at startup.
//! - [`ValidationError`]: one bad field in an evaluation request; collected,
//!   never fail-fast.
//! - [`CalculationError`]: returned by a formula's calculate function.
//! - [`EvaluationError`]: what the dispatcher reports for a request that
//!   could not produce a result.

use serde::Serialize;
use thiserror::Error;

use fincalc_math::MathError;

/// Result type for contract and registry construction.
pub type ContractResult<T> = Result<T, ContractError>;

/// Result type for calculate functions.
pub type CalcResult<T> = Result<T, CalculationError>;

/// A malformed formula contract or registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    /// A variable was declared with an empty key.
    #[error("Variable declared with an empty key")]
    EmptyKey,

    /// Two variables share a key.
    #[error("Duplicate variable '{key}'")]
    DuplicateVariable {
        /// The repeated key.
        key: String,
    },

    /// `min` is greater than `max`.
    #[error("Variable '{key}' has min {min} greater than max {max}")]
    InvalidBounds {
        /// Variable key.
        key: String,
        /// Declared minimum.
        min: f64,
        /// Declared maximum.
        max: f64,
    },

    /// The default lies outside the declared bounds.
    #[error("Variable '{key}' default {default} is outside its bounds")]
    DefaultOutOfRange {
        /// Variable key.
        key: String,
        /// Declared default.
        default: f64,
    },

    /// The default does not fit the variable kind.
    #[error("Variable '{key}' has an invalid default: {reason}")]
    InvalidDefault {
        /// Variable key.
        key: String,
        /// Why the default is invalid.
        reason: String,
    },

    /// An enum variable without options.
    #[error("Enum variable '{key}' has no options")]
    EmptyOptions {
        /// Variable key.
        key: String,
    },

    /// A gate names a key that is not declared, or the variable itself.
    #[error("Variable '{key}' depends on unknown variable '{depends_on}'")]
    UnknownGate {
        /// Gated variable.
        key: String,
        /// Gate key that could not be resolved.
        depends_on: String,
    },

    /// Gating relations loop back on themselves.
    #[error("Gating cycle detected at variable '{key}'")]
    GatingCycle {
        /// A variable on the cycle.
        key: String,
    },

    /// The builder was finished without a calculate function.
    #[error("Formula '{formula}' has no calculate function")]
    MissingCalculation {
        /// Formula name.
        formula: String,
    },

    /// A registry path is not of the form `category/name`.
    #[error("Invalid formula path '{path}': expected lowercase 'category/name' segments")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// A path was registered twice.
    #[error("Formula path '{path}' is already registered")]
    DuplicateFormula {
        /// The repeated path.
        path: String,
    },

    /// A date-bounded formula was built without a reference year.
    #[error("Formula '{formula}' needs a reference year; pin current_year first")]
    MissingReferenceYear {
        /// Formula path.
        formula: String,
    },
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{label}: {kind}")]
pub struct ValidationError {
    /// Variable key.
    pub key: String,
    /// Display label of the variable.
    pub label: String,
    /// What was wrong.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }
}

/// The reason a field was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The raw value is not a finite number.
    #[error("'{raw}' is not a number")]
    NotANumber {
        /// The raw value as entered.
        raw: String,
    },

    /// A count was not a whole number.
    #[error("{value} is not a whole number")]
    NotAnInteger {
        /// Offending value.
        value: f64,
    },

    /// A boolean was not 0 or 1.
    #[error("{value} is not yes (1) or no (0)")]
    NotABoolean {
        /// Offending value.
        value: f64,
    },

    /// An enum value is not one of the options.
    #[error("{value} is not one of the available options")]
    UnknownOption {
        /// Offending value.
        value: f64,
    },

    /// Below the inclusive minimum.
    #[error("must be at least {min}")]
    BelowMinimum {
        /// The violated bound.
        min: f64,
        /// Offending value.
        value: f64,
    },

    /// Above the inclusive maximum.
    #[error("must be at most {max}")]
    AboveMaximum {
        /// The violated bound.
        max: f64,
        /// Offending value.
        value: f64,
    },

    /// Rejected by the variable's cross-field validator.
    #[error("{message}")]
    Custom {
        /// Domain-specific message.
        message: String,
    },
}

/// An error returned by a formula's calculate function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// The inputs are valid but the formula cannot produce a result.
    #[error("{0}")]
    Failed(String),

    /// A required input was not in the normalized set.
    #[error("Missing input '{0}'")]
    MissingInput(String),

    /// A payoff loop ended with a balance outstanding.
    #[error("Balance not paid off within the {periods}-period ceiling ({remaining_balance:.2} remaining)")]
    PayoffNotAchieved {
        /// Period ceiling, not the number of periods simulated.
        periods: u32,
        /// Balance left when the loop stopped.
        remaining_balance: f64,
    },
}

impl CalculationError {
    /// Creates a [`CalculationError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<MathError> for CalculationError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::PayoffNotAchieved {
                periods,
                remaining_balance,
            } => Self::PayoffNotAchieved {
                periods,
                remaining_balance,
            },
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Why an evaluation produced no result (other than field validation).
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationError {
    /// The path is not registered.
    #[error("Unknown formula: {path}")]
    UnknownFormula {
        /// Requested path.
        path: String,
    },

    /// The calculate function reported a failure.
    #[error("Calculation failed for '{path}': {message}")]
    CalculationFailed {
        /// Formula path.
        path: String,
        /// Failure message.
        message: String,
    },

    /// A payoff did not complete within its ceiling.
    #[error("Payoff not achieved for '{path}' within the {periods}-period ceiling ({remaining_balance:.2} remaining)")]
    PayoffNotAchieved {
        /// Formula path.
        path: String,
        /// Period ceiling.
        periods: u32,
        /// Balance left when the loop stopped.
        remaining_balance: f64,
    },
}

impl EvaluationError {
    /// Wraps a calculation error with the formula path.
    pub fn from_calculation(path: &str, err: CalculationError) -> Self {
        match err {
            CalculationError::PayoffNotAchieved {
                periods,
                remaining_balance,
            } => Self::PayoffNotAchieved {
                path: path.to_string(),
                periods,
                remaining_balance,
            },
            other => Self::CalculationFailed {
                path: path.to_string(),
                message: other.to_string(),
            },
        }
    }
}
