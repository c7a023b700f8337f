//! Return on investment.

use fincalc_core::result::{format_currency, format_percent};
use fincalc_core::{CalculationError, ContractResult, FormulaContract, FormulaResult, VariableSchema};

use super::{line, render};

/// Registry path.
pub const PATH: &str = "roi/general";

/// Builds the ROI contract.
pub fn contract() -> ContractResult<FormulaContract> {
    FormulaContract::builder("Return on Investment")
        .description("Profit and percentage return of an investment, optionally annualized")
        .category("Investing")
        .variable(
            VariableSchema::currency("initial_investment", 10_000.0)
                .label("Initial Investment")
                .range(0.0, 1_000_000_000.0)
                .step(100.0),
        )
        .variable(
            VariableSchema::currency("final_value", 15_000.0)
                .label("Final Value")
                .range(0.0, 1_000_000_000.0)
                .step(100.0),
        )
        .variable(
            VariableSchema::boolean("include_holding_period", false)
                .label("Annualize Return")
                .help("Compute the compound annual growth rate over the holding period"),
        )
        .variable(
            VariableSchema::count("holding_years", 5)
                .label("Holding Period (years)")
                .range(1.0, 100.0)
                .depends_on("include_holding_period"),
        )
        .calculate(|inputs| {
            let initial = inputs.require("initial_investment")?;
            let final_value = inputs.require("final_value")?;
            if initial == 0.0 {
                return Err(CalculationError::failed("Initial investment cannot be zero"));
            }

            let profit = final_value - initial;
            let mut result = FormulaResult::new()
                .with("profit", profit)
                .with("roi_percent", profit / initial * 100.0);

            if let Some(years) = inputs.get("holding_years") {
                let growth = (final_value / initial).powf(1.0 / years) - 1.0;
                result.insert("annualized_roi_percent", growth * 100.0);
            }
            Ok(result)
        })
        .format(|r| {
            let mut lines = vec![
                line("Profit:", format_currency(r.number("profit").unwrap_or_default())),
                line("ROI:", format_percent(r.number("roi_percent").unwrap_or_default())),
            ];
            if let Some(annual) = r.number("annualized_roi_percent") {
                lines.push(line("Annualized ROI:", format_percent(annual)));
            }
            render(lines, r)
        })
        .build()
}
