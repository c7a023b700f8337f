//! The evaluation dispatcher.
//!
//! Resolves a formula path, validates raw inputs against the contract's
//! variables, and invokes the calculation. Every request yields exactly one
//! [`Outcome`]; there is no partial success.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EvaluationError, ValidationError};
use crate::input::RawInputs;
use crate::registry::FormulaRegistry;
use crate::result::FormulaResult;

/// The outcome of one evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    /// Inputs were valid and the calculation succeeded.
    Accepted(FormulaResult),
    /// One or more inputs were invalid.
    Rejected(Vec<ValidationError>),
    /// The formula could not produce a result.
    Failed(EvaluationError),
}

impl Outcome {
    /// True for [`Outcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// The result of an accepted outcome.
    pub fn result(&self) -> Option<&FormulaResult> {
        match self {
            Outcome::Accepted(result) => Some(result),
            _ => None,
        }
    }

    /// Field errors of a rejected outcome; empty otherwise.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Outcome::Rejected(errors) => errors,
            _ => &[],
        }
    }

    /// The failure of a failed outcome.
    pub fn failure(&self) -> Option<&EvaluationError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the result if accepted.
    pub fn into_result(self) -> Option<FormulaResult> {
        match self {
            Outcome::Accepted(result) => Some(result),
            _ => None,
        }
    }
}

/// Evaluates requests against a borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a FormulaRegistry,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `registry`.
    pub fn new(registry: &'a FormulaRegistry) -> Self {
        Self { registry }
    }

    /// The registry being evaluated against.
    pub fn registry(&self) -> &'a FormulaRegistry {
        self.registry
    }

    /// Evaluates `raw` against the formula at `path`.
    pub fn evaluate(&self, path: &str, raw: &RawInputs) -> Outcome {
        let Some(contract) = self.registry.get(path) else {
            debug!(path, "unknown formula");
            return Outcome::Failed(EvaluationError::UnknownFormula {
                path: path.to_string(),
            });
        };

        let inputs = match contract.validate(raw) {
            Ok(inputs) => inputs,
            Err(errors) => {
                debug!(path, errors = errors.len(), "inputs rejected");
                return Outcome::Rejected(errors);
            }
        };

        let result = match contract.calculate(&inputs) {
            Ok(result) => result,
            Err(err) => {
                let err = EvaluationError::from_calculation(path, err);
                warn!(path, error = %err, "calculation failed");
                return Outcome::Failed(err);
            }
        };

        if let Some(key) = result.non_finite_key() {
            warn!(path, key, "calculation produced a non-finite value");
            return Outcome::Failed(EvaluationError::CalculationFailed {
                path: path.to_string(),
                message: format!("Result '{key}' is not a finite number"),
            });
        }

        for diagnostic in result.diagnostics() {
            warn!(path, %diagnostic, "result carries a diagnostic");
        }
        debug!(path, inputs = inputs.len(), values = result.len(), "evaluation accepted");
        Outcome::Accepted(result)
    }

    /// Renders a result with the formatter of the formula at `path`.
    pub fn render(&self, path: &str, result: &FormulaResult) -> Option<String> {
        self.registry.get(path).map(|c| c.format_result(result))
    }
}

/// Evaluates `raw` against the formula at `path` in `registry`.
pub fn evaluate(registry: &FormulaRegistry, path: &str, raw: &RawInputs) -> Outcome {
    Evaluator::new(registry).evaluate(path, raw)
}
