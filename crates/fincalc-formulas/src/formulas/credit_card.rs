//! Credit card payoff.

use fincalc_core::result::{format_count, format_currency};
use fincalc_core::{
    CalculationError, ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema,
};
use fincalc_math::{simulate_payoff, PaymentPolicy, PayoffParams};

use super::{fraction, line, render, whole};

/// Registry path.
pub const PATH: &str = "credit-card/payoff";

const FIXED_PAYMENT: f64 = 1.0;
const PERCENT_OF_BALANCE: f64 = 2.0;

/// Builds the credit card payoff contract with a ceiling of `max_years`.
pub fn contract(max_years: u32) -> ContractResult<FormulaContract> {
    FormulaContract::builder("Credit Card Payoff")
        .description("Time and interest to clear a card balance with a fixed or minimum payment")
        .category("Debt")
        .variable(
            VariableSchema::currency("balance", 5_000.0)
                .label("Card Balance")
                .range(1.0, 1_000_000.0)
                .step(50.0),
        )
        .variable(
            VariableSchema::percentage("apr", 22.0)
                .label("APR")
                .range(0.0, 100.0)
                .step(0.1),
        )
        .variable(
            VariableSchema::choice(
                "strategy",
                vec![
                    EnumOption::new(FIXED_PAYMENT, "Fixed monthly payment"),
                    EnumOption::new(PERCENT_OF_BALANCE, "Minimum payment (percent of balance)"),
                ],
                FIXED_PAYMENT,
            )
            .label("Payment Strategy"),
        )
        .variable(
            VariableSchema::currency("fixed_payment", 200.0)
                .label("Monthly Payment")
                .range(1.0, 1_000_000.0)
                .depends_on_value("strategy", FIXED_PAYMENT),
        )
        .variable(
            VariableSchema::percentage("minimum_percent", 2.0)
                .label("Minimum Payment (% of balance)")
                .range(0.5, 100.0)
                .step(0.5)
                .depends_on_value("strategy", PERCENT_OF_BALANCE),
        )
        .variable(
            VariableSchema::currency("minimum_floor", 25.0)
                .label("Minimum Payment Floor")
                .range(1.0, 10_000.0)
                .depends_on_value("strategy", PERCENT_OF_BALANCE),
        )
        .calculate(move |inputs| {
            let policy = match whole(inputs, "strategy")? {
                1 => PaymentPolicy::Fixed(inputs.require("fixed_payment")?),
                2 => PaymentPolicy::PercentOfBalance {
                    percent: fraction(inputs, "minimum_percent")?,
                    floor: inputs.require("minimum_floor")?,
                },
                other => return Err(CalculationError::failed(format!("Unknown strategy {other}"))),
            };

            let params = PayoffParams::new(inputs.require("balance")?, fraction(inputs, "apr")?, policy)
                .with_max_years(max_years);
            let schedule = simulate_payoff(&params)?.require_paid_off()?;
            let months = schedule.periods();

            Ok(FormulaResult::new()
                .with("months_to_payoff", months)
                .with("years_to_payoff", f64::from(months) / 12.0)
                .with("first_payment", schedule.first_payment().unwrap_or_default())
                .with("total_interest", schedule.total_interest)
                .with("total_paid", schedule.total_paid))
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line("Months to Payoff:", format_count(num("months_to_payoff"))),
                    line("First Payment:", format_currency(num("first_payment"))),
                    line("Total Interest:", format_currency(num("total_interest"))),
                    line("Total Paid:", format_currency(num("total_paid"))),
                ],
                r,
            )
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fincalc_core::RawInputs;

    #[test]
    fn test_fixed_payment() {
        let contract = contract(30).unwrap();
        let raw = RawInputs::new()
            .with("balance", 1_200.0)
            .with("apr", 0.0)
            .with("fixed_payment", 100.0);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();

        assert_eq!(result.number("months_to_payoff"), Some(12.0));
        assert_relative_eq!(result.number("total_interest").unwrap(), 0.0);
    }

    #[test]
    fn test_percent_strategy_gates_inputs() {
        let contract = contract(30).unwrap();
        let raw = RawInputs::new()
            .with("strategy", 2.0)
            .with("minimum_percent", 4.0)
            .with("fixed_payment", -5.0);
        let inputs = contract.validate(&raw).unwrap();

        assert!(!inputs.contains("fixed_payment"));
        assert_eq!(inputs.get("minimum_percent"), Some(4.0));
        assert_eq!(inputs.get("minimum_floor"), Some(25.0));

        let result = contract.calculate(&inputs).unwrap();
        assert_relative_eq!(result.number("first_payment").unwrap(), 200.0, epsilon = 1e-9);
        assert!(result.number("months_to_payoff").unwrap() > 60.0);
    }

    #[test]
    fn test_ceiling() {
        let contract = contract(1).unwrap();
        let raw = RawInputs::new().with("balance", 5_000.0).with("fixed_payment", 200.0);
        let err = contract.calculate(&contract.validate(&raw).unwrap()).unwrap_err();
        assert!(matches!(err, CalculationError::PayoffNotAchieved { periods: 12, .. }));
    }
}
