//! # fincalc Core
//!
//! The formula evaluation engine shared by every calculator in the catalog.
//!
//! This crate provides:
//!
//! - **Variable schemas**: typed, bounded, optionally gated input fields
//! - **Validation**: coercion of raw user input against a schema, collecting
//!   every field error at once
//! - **Formula contracts**: variables bound to a pure calculation and a
//!   result formatter
//! - **Registry**: an immutable path → contract map built once at startup
//! - **Dispatch**: the single `evaluate(path, inputs)` entry point
//!
//! # Example
//!
//! ```rust
//! use fincalc_core::prelude::*;
//!
//! let contract = FormulaContract::builder("Profit")
//!     .variable(VariableSchema::currency("cost", 100.0).min(0.0))
//!     .variable(VariableSchema::currency("revenue", 150.0).min(0.0))
//!     .calculate(|inputs| {
//!         let profit = inputs.require("revenue")? - inputs.require("cost")?;
//!         Ok(FormulaResult::new().with("profit", profit))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut registry = FormulaRegistry::new();
//! registry.register("business/profit", contract).unwrap();
//!
//! let outcome = evaluate(&registry, "business/profit", &RawInputs::new().with("revenue", 400.0));
//! assert_eq!(outcome.result().unwrap().number("profit"), Some(300.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod dispatcher;
pub mod error;
pub mod formula;
pub mod input;
pub mod registry;
pub mod result;
pub mod schema;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::dispatcher::{evaluate, Evaluator, Outcome};
    pub use crate::error::{
        CalcResult, CalculationError, ContractError, ContractResult, EvaluationError,
        ValidationError, ValidationErrorKind,
    };
    pub use crate::formula::{FormulaBuilder, FormulaContract};
    pub use crate::input::{Inputs, RawInputs, RawValue};
    pub use crate::registry::FormulaRegistry;
    pub use crate::result::{Diagnostic, FormulaResult, ResultValue};
    pub use crate::schema::{EnumOption, Gate, GateCondition, VariableKind, VariableSchema, VariableSet};
}

pub use dispatcher::{evaluate, Evaluator, Outcome};
pub use error::{
    CalcResult, CalculationError, ContractError, ContractResult, EvaluationError, ValidationError,
    ValidationErrorKind,
};
pub use formula::{FormulaBuilder, FormulaContract};
pub use input::{Inputs, RawInputs, RawValue};
pub use registry::FormulaRegistry;
pub use result::{Diagnostic, FormulaResult, ResultValue};
pub use schema::{EnumOption, Gate, GateCondition, VariableKind, VariableSchema, VariableSet};
