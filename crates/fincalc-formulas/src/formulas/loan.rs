//! Loan amortization schedule.

use fincalc_core::result::{format_count, format_currency};
use fincalc_core::{ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema};
use fincalc_math::amortize;

use super::{fraction, line, render, whole};

/// Registry path.
pub const PATH: &str = "loan/amortization";

/// Builds the loan amortization contract.
pub fn contract() -> ContractResult<FormulaContract> {
    FormulaContract::builder("Loan Amortization")
        .description("Level payment, total interest and first/last period split of a fixed-rate loan")
        .category("Loans")
        .variable(
            VariableSchema::currency("loan_amount", 25_000.0)
                .label("Loan Amount")
                .range(100.0, 100_000_000.0)
                .step(100.0),
        )
        .variable(
            VariableSchema::percentage("annual_rate", 7.0)
                .label("Interest Rate")
                .range(0.0, 50.0)
                .step(0.1),
        )
        .variable(
            VariableSchema::count("term_years", 5)
                .label("Loan Term (years)")
                .range(1.0, 50.0),
        )
        .variable(
            VariableSchema::choice(
                "payments_per_year",
                vec![
                    EnumOption::new(1.0, "Annual"),
                    EnumOption::new(4.0, "Quarterly"),
                    EnumOption::new(12.0, "Monthly"),
                    EnumOption::new(26.0, "Biweekly"),
                    EnumOption::new(52.0, "Weekly"),
                ],
                12.0,
            )
            .label("Payment Frequency"),
        )
        .calculate(|inputs| {
            let amount = inputs.require("loan_amount")?;
            let rate = fraction(inputs, "annual_rate")?;
            let per_year = whole(inputs, "payments_per_year")?;
            let periods = whole(inputs, "term_years")? * per_year;

            let schedule = amortize(amount, rate, per_year, periods)?;
            let mut result = FormulaResult::new()
                .with("number_of_payments", schedule.periods())
                .with("total_interest", schedule.total_interest)
                .with("total_paid", schedule.total_paid);

            if let (Some(first), Some(last)) = (schedule.rows.first(), schedule.rows.last()) {
                result.insert("payment", first.payment);
                result.insert("first_payment_interest", first.interest);
                result.insert("first_payment_principal", first.principal);
                result.insert("last_payment", last.payment);
            }
            if let Some(midpoint) = schedule.rows.get(schedule.rows.len() / 2) {
                result.insert("midpoint_balance", midpoint.balance);
            }
            Ok(result)
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line("Payment:", format_currency(num("payment"))),
                    line("Number of Payments:", format_count(num("number_of_payments"))),
                    line("Total Interest:", format_currency(num("total_interest"))),
                    line("Total Paid:", format_currency(num("total_paid"))),
                    line(
                        "First Payment Split:",
                        format!(
                            "{} principal / {} interest",
                            format_currency(num("first_payment_principal")),
                            format_currency(num("first_payment_interest"))
                        ),
                    ),
                    line("Final Payment:", format_currency(num("last_payment"))),
                ],
                r,
            )
        })
        .build()
}
