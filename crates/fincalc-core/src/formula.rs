//! Formula contracts.
//!
//! A [`FormulaContract`] binds an ordered variable set to a pure calculate
//! function and a result formatter. Contracts are immutable once built and
//! shareable across threads.

use std::fmt;
use std::sync::Arc;

use crate::error::{CalcResult, ContractError, ContractResult, ValidationError};
use crate::input::{Inputs, RawInputs};
use crate::result::{FormulaResult, ResultValue};
use crate::schema::{VariableSchema, VariableSet};
use crate::validation;

/// A pure calculation over validated inputs.
pub type CalculateFn = Arc<dyn Fn(&Inputs) -> CalcResult<FormulaResult> + Send + Sync>;

/// Renders a result as multi-line text.
pub type FormatFn = Arc<dyn Fn(&FormulaResult) -> String + Send + Sync>;

/// One calculator: variables, calculation and formatter.
#[derive(Clone)]
pub struct FormulaContract {
    name: String,
    description: String,
    category: Option<String>,
    variables: VariableSet,
    calculate: CalculateFn,
    format: Option<FormatFn>,
}

impl FormulaContract {
    /// Starts building a contract.
    pub fn builder(name: impl Into<String>) -> FormulaBuilder {
        FormulaBuilder::new(name)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Optional display category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The declared variables, in display order.
    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// Validates raw inputs against the variable set.
    ///
    /// # Errors
    ///
    /// Returns every field error if any variable is invalid.
    pub fn validate(&self, raw: &RawInputs) -> Result<Inputs, Vec<ValidationError>> {
        validation::validate_inputs(&self.variables, raw)
    }

    /// Runs the calculation.
    ///
    /// # Errors
    ///
    /// Returns the calculate function's [`CalculationError`](crate::CalculationError).
    pub fn calculate(&self, inputs: &Inputs) -> CalcResult<FormulaResult> {
        (self.calculate)(inputs)
    }

    /// Renders a result with the contract's formatter, or the generic one.
    pub fn format_result(&self, result: &FormulaResult) -> String {
        match &self.format {
            Some(format) => format(result),
            None => generic_format(result),
        }
    }
}

impl fmt::Debug for FormulaContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaContract")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("variables", &self.variables)
            .field("custom_format", &self.format.is_some())
            .finish_non_exhaustive()
    }
}

/// Renders one `key: value` line per output, then any diagnostics.
pub fn generic_format(result: &FormulaResult) -> String {
    let mut lines: Vec<String> = result
        .iter()
        .map(|(key, value)| match value {
            ResultValue::Number(n) => format!("{key}: {n:.2}"),
            ResultValue::Text(s) => format!("{key}: {s}"),
        })
        .collect();
    lines.extend(result.diagnostics().iter().map(|d| format!("Note: {d}")));
    lines.join("\n")
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for [`FormulaContract`].
pub struct FormulaBuilder {
    name: String,
    description: String,
    category: Option<String>,
    variables: Vec<VariableSchema>,
    calculate: Option<CalculateFn>,
    format: Option<FormatFn>,
}

impl FormulaBuilder {
    /// Creates a builder for a formula named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: None,
            variables: Vec::new(),
            calculate: None,
            format: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Appends a variable.
    #[must_use]
    pub fn variable(mut self, variable: VariableSchema) -> Self {
        self.variables.push(variable);
        self
    }

    /// Appends several variables.
    #[must_use]
    pub fn variables(mut self, variables: impl IntoIterator<Item = VariableSchema>) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Sets the calculate function.
    #[must_use]
    pub fn calculate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Inputs) -> CalcResult<FormulaResult> + Send + Sync + 'static,
    {
        self.calculate = Some(Arc::new(f));
        self
    }

    /// Sets the result formatter.
    #[must_use]
    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&FormulaResult) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(f));
        self
    }

    /// Checks the variables and finishes the contract.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::MissingCalculation`] without a calculate
    /// function, or the first variable-set error.
    pub fn build(self) -> ContractResult<FormulaContract> {
        let calculate = self.calculate.ok_or_else(|| ContractError::MissingCalculation {
            formula: self.name.clone(),
        })?;
        let variables = VariableSet::new(self.variables)?;

        Ok(FormulaContract {
            name: self.name,
            description: self.description,
            category: self.category,
            variables,
            calculate,
            format: self.format,
        })
    }
}
