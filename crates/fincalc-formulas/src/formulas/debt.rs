//! Debt payoff with an optional extra payment.
//!
//! Two independent simulations run over the same balance: the scheduled
//! payment alone, and the scheduled payment plus the extra amount. The
//! accelerated run must pay off within the ceiling; a baseline that does not
//! is reported as a diagnostic and leaves the savings fields out.

use fincalc_core::result::{format_count, format_currency};
use fincalc_core::{ContractResult, Diagnostic, FormulaContract, FormulaResult, VariableSchema};
use fincalc_math::{compare_payoff, PaymentPolicy, PayoffParams};

use super::{fraction, line, render};

/// Registry path.
pub const PATH: &str = "debt/payoff";

/// Builds the debt payoff contract with a ceiling of `max_years`.
pub fn contract(max_years: u32) -> ContractResult<FormulaContract> {
    FormulaContract::builder("Debt Payoff")
        .description("Months and interest to pay off a balance, with and without an extra payment")
        .category("Debt")
        .variable(
            VariableSchema::currency("balance", 10_000.0)
                .label("Current Balance")
                .range(1.0, 10_000_000.0)
                .step(100.0),
        )
        .variable(
            VariableSchema::percentage("annual_rate", 18.0)
                .label("Interest Rate (APR)")
                .range(0.0, 100.0)
                .step(0.1),
        )
        .variable(
            VariableSchema::currency("monthly_payment", 300.0)
                .label("Monthly Payment")
                .range(1.0, 10_000_000.0)
                .step(10.0),
        )
        .variable(
            VariableSchema::currency("extra_payment", 100.0)
                .label("Extra Monthly Payment")
                .range(0.0, 10_000_000.0)
                .step(10.0),
        )
        .calculate(move |inputs| {
            let params = PayoffParams::new(
                inputs.require("balance")?,
                fraction(inputs, "annual_rate")?,
                PaymentPolicy::Fixed(inputs.require("monthly_payment")?),
            )
            .with_extra_payment(inputs.require("extra_payment")?)
            .with_max_years(max_years);

            let comparison = compare_payoff(&params)?;
            let accelerated = comparison.accelerated.clone().require_paid_off()?;
            let months = accelerated.periods();

            let mut result = FormulaResult::new()
                .with("months_to_payoff", months)
                .with("years_to_payoff", f64::from(months) / 12.0)
                .with("total_interest", accelerated.total_interest)
                .with("total_paid", accelerated.total_paid);

            match (comparison.periods_saved(), comparison.interest_saved()) {
                (Some(months_saved), Some(interest_saved)) => {
                    result.insert("baseline_months", comparison.baseline.periods());
                    result.insert("baseline_interest", comparison.baseline.total_interest);
                    result.insert("months_saved", months_saved);
                    result.insert("interest_saved", interest_saved);
                }
                _ => result.push_diagnostic(Diagnostic::BaselineNotPaidOff {
                    periods: comparison.baseline.max_periods,
                }),
            }
            Ok(result)
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            let mut lines = vec![
                line("Months to Payoff:", format_count(num("months_to_payoff"))),
                line("Total Interest:", format_currency(num("total_interest"))),
                line("Total Paid:", format_currency(num("total_paid"))),
            ];
            if let Some(saved) = r.number("months_saved") {
                lines.push(line("Months Saved:", format_count(saved)));
                lines.push(line("Interest Saved:", format_currency(num("interest_saved"))));
            }
            render(lines, r)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_core::{CalculationError, RawInputs};

    #[test]
    fn test_extra_payment_saves() {
        let contract = contract(50).unwrap();
        let inputs = contract.validate(&RawInputs::new()).unwrap();
        let result = contract.calculate(&inputs).unwrap();

        assert!(result.number("months_saved").unwrap() > 0.0);
        assert!(result.number("interest_saved").unwrap() > 0.0);
        assert!(result.number("months_to_payoff").unwrap() < result.number("baseline_months").unwrap());
        assert!(result.diagnostics().is_empty());
    }

    #[test]
    fn test_payment_below_interest_fails() {
        let contract = contract(50).unwrap();
        let raw = RawInputs::new()
            .with("balance", 10_000.0)
            .with("annual_rate", 24.0)
            .with("monthly_payment", 150.0)
            .with("extra_payment", 0.0);
        let err = contract.calculate(&contract.validate(&raw).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::PayoffNotAchieved { periods: 600, .. }
        ));
    }

    #[test]
    fn test_baseline_not_paid_off_is_diagnostic() {
        let contract = contract(50).unwrap();
        let raw = RawInputs::new()
            .with("balance", 10_000.0)
            .with("annual_rate", 24.0)
            .with("monthly_payment", 150.0)
            .with("extra_payment", 200.0);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();

        assert!(result.get("months_saved").is_none());
        assert_eq!(
            result.diagnostics(),
            &[Diagnostic::BaselineNotPaidOff { periods: 600 }]
        );
    }
}
