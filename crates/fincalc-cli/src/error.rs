//! CLI error types.

use fincalc_core::EvaluationError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A `--input` argument was not `key=value`.
    #[error("Invalid input '{0}'. Use key=value.")]
    InvalidInput(String),

    /// No formula is registered at the path.
    #[error("Unknown formula: {0}. Run `fincalc list` to see available formulas.")]
    UnknownFormula(String),

    /// One or more inputs failed validation.
    #[error("{count} input(s) rejected for '{path}'")]
    Rejected {
        /// Formula path.
        path: String,
        /// Number of rejected fields.
        count: usize,
    },

    /// The formula could not produce a result.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
