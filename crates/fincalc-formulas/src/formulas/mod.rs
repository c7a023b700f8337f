//! Calculator contracts and the standard registry.
//!
//! Each submodule exposes a `PATH` and a `contract` constructor. Percentage
//! variables are entered in percent units and divided by 100 before use.

pub mod bond;
pub mod credit_card;
pub mod debt;
pub mod loan;
pub mod mortgage;
pub mod retirement;
pub mod risk;
pub mod roi;
pub mod savings;
pub mod tax;

use fincalc_config::EngineConfig;
use fincalc_core::{
    CalcResult, ContractError, ContractResult, FormulaRegistry, FormulaResult, Inputs,
};
use tracing::info;

/// Builds the registry of every standard calculator.
///
/// # Errors
///
/// Returns [`ContractError::MissingReferenceYear`] when `config` has no
/// pinned `current_year`, or another [`ContractError`] if a contract is
/// malformed.
pub fn standard_registry(config: &EngineConfig) -> ContractResult<FormulaRegistry> {
    let current_year = config
        .current_year()
        .ok_or_else(|| ContractError::MissingReferenceYear {
            formula: retirement::PATH.to_string(),
        })?;
    let mut registry = FormulaRegistry::new();

    registry.register(roi::PATH, roi::contract()?)?;
    registry.register(savings::PATH, savings::contract()?)?;
    registry.register(mortgage::PATH, mortgage::contract()?)?;
    registry.register(loan::PATH, loan::contract()?)?;
    registry.register(debt::PATH, debt::contract(config.payoff.debt_max_years)?)?;
    registry.register(
        credit_card::PATH,
        credit_card::contract(config.payoff.credit_card_max_years)?,
    )?;
    registry.register(bond::PATH, bond::contract(config.solver.yield_solver())?)?;
    registry.register(retirement::PATH, retirement::contract(current_year)?)?;
    registry.register(tax::PATH, tax::contract()?)?;
    registry.register(risk::PATH, risk::contract()?)?;

    info!(
        formulas = registry.len(),
        categories = registry.categories().len(),
        "standard formula registry built"
    );
    Ok(registry)
}

/// Reads a percentage input as a decimal fraction.
pub(crate) fn fraction(inputs: &Inputs, key: &str) -> CalcResult<f64> {
    Ok(inputs.require(key)? / 100.0)
}

/// Reads a count or enum input as an unsigned integer.
pub(crate) fn whole(inputs: &Inputs, key: &str) -> CalcResult<u32> {
    Ok(inputs.require(key)?.round().max(0.0) as u32)
}

/// One aligned `label  value` line of formatted output.
pub(crate) fn line(label: &str, value: impl std::fmt::Display) -> String {
    format!("{label:<26}{value}")
}

/// Joins formatted lines and appends any result diagnostics as notes.
pub(crate) fn render(mut lines: Vec<String>, result: &FormulaResult) -> String {
    lines.extend(result.diagnostics().iter().map(|d| format!("Note: {d}")));
    lines.join("\n")
}
