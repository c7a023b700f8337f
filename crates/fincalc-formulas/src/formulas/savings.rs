//! Compound interest with monthly contributions.

use fincalc_core::result::format_currency;
use fincalc_core::{ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema};

use super::{fraction, line, render, whole};

/// Registry path.
pub const PATH: &str = "savings/compound-interest";

/// Builds the compound interest contract.
pub fn contract() -> ContractResult<FormulaContract> {
    FormulaContract::builder("Compound Interest")
        .description("Future value of a deposit with monthly contributions")
        .category("Savings")
        .variable(
            VariableSchema::currency("principal", 10_000.0)
                .label("Initial Deposit")
                .range(0.0, 1_000_000_000.0)
                .step(100.0),
        )
        .variable(
            VariableSchema::currency("monthly_contribution", 100.0)
                .label("Monthly Contribution")
                .range(0.0, 10_000_000.0)
                .step(10.0),
        )
        .variable(
            VariableSchema::percentage("annual_rate", 5.0)
                .label("Annual Interest Rate")
                .range(0.0, 50.0)
                .step(0.1),
        )
        .variable(
            VariableSchema::count("years", 10)
                .label("Years")
                .range(1.0, 100.0),
        )
        .variable(
            VariableSchema::choice(
                "compounding",
                vec![
                    EnumOption::new(1.0, "Annually"),
                    EnumOption::new(4.0, "Quarterly"),
                    EnumOption::new(12.0, "Monthly"),
                    EnumOption::new(365.0, "Daily"),
                ],
                12.0,
            )
            .label("Compounding"),
        )
        .calculate(|inputs| {
            let principal = inputs.require("principal")?;
            let contribution = inputs.require("monthly_contribution")?;
            let rate = fraction(inputs, "annual_rate")?;
            let years = inputs.require("years")?;
            let n = f64::from(whole(inputs, "compounding")?);

            let deposit_value = principal * (1.0 + rate / n).powf(n * years);

            // Contributions land at month end; convert the nominal rate to
            // its equivalent monthly rate under the chosen compounding.
            let months = 12.0 * years;
            let monthly_rate = (1.0 + rate / n).powf(n / 12.0) - 1.0;
            let contribution_value = if monthly_rate.abs() < 1e-12 {
                contribution * months
            } else {
                contribution * ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate
            };

            let future_value = deposit_value + contribution_value;
            let total_contributions = principal + contribution * months;
            Ok(FormulaResult::new()
                .with("future_value", future_value)
                .with("total_contributions", total_contributions)
                .with("interest_earned", future_value - total_contributions))
        })
        .format(|r| {
            render(
                vec![
                    line("Future Value:", format_currency(r.number("future_value").unwrap_or_default())),
                    line(
                        "Total Contributions:",
                        format_currency(r.number("total_contributions").unwrap_or_default()),
                    ),
                    line("Interest Earned:", format_currency(r.number("interest_earned").unwrap_or_default())),
                ],
                r,
            )
        })
        .build()
}
