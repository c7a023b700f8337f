//! Basic mortgage payment.

use fincalc_core::result::{format_currency, format_percent};
use fincalc_core::{ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema};
use fincalc_math::level_payment;

use super::{fraction, line, render, whole};

/// Registry path.
pub const PATH: &str = "mortgage/basic";

/// Down payment share at or above which PMI is not charged.
const PMI_THRESHOLD: f64 = 0.20;

/// Builds the mortgage contract.
pub fn contract() -> ContractResult<FormulaContract> {
    FormulaContract::builder("Mortgage Payment")
        .description("Monthly mortgage payment including property tax, insurance and PMI")
        .category("Mortgage")
        .variable(
            VariableSchema::currency("home_price", 400_000.0)
                .label("Home Price")
                .range(10_000.0, 100_000_000.0)
                .step(1_000.0),
        )
        .variable(
            VariableSchema::currency("down_payment", 80_000.0)
                .label("Down Payment")
                .min(0.0)
                .step(1_000.0)
                .validator(|value, all| match all.get("home_price") {
                    Some(price) if value > price => {
                        Err("Down payment cannot exceed the home price".to_string())
                    }
                    _ => Ok(value),
                }),
        )
        .variable(
            VariableSchema::percentage("annual_rate", 6.5)
                .label("Interest Rate")
                .range(0.0, 30.0)
                .step(0.125),
        )
        .variable(
            VariableSchema::choice(
                "term_years",
                vec![
                    EnumOption::new(10.0, "10 years"),
                    EnumOption::new(15.0, "15 years"),
                    EnumOption::new(20.0, "20 years"),
                    EnumOption::new(30.0, "30 years"),
                ],
                30.0,
            )
            .label("Loan Term"),
        )
        .variable(
            VariableSchema::percentage("property_tax_rate", 1.2)
                .label("Property Tax Rate")
                .range(0.0, 10.0)
                .step(0.05),
        )
        .variable(
            VariableSchema::currency("annual_insurance", 1_500.0)
                .label("Annual Home Insurance")
                .range(0.0, 1_000_000.0),
        )
        .variable(
            VariableSchema::boolean("include_pmi", true)
                .label("Include PMI")
                .help("Private mortgage insurance applies when the down payment is under 20%"),
        )
        .variable(
            VariableSchema::percentage("pmi_rate", 0.5)
                .label("PMI Rate")
                .range(0.0, 5.0)
                .step(0.05)
                .depends_on("include_pmi"),
        )
        .calculate(|inputs| {
            let price = inputs.require("home_price")?;
            let down = inputs.require("down_payment")?;
            let rate = fraction(inputs, "annual_rate")?;
            let months = whole(inputs, "term_years")? * 12;

            let loan = price - down;
            let principal_interest = level_payment(loan, rate / 12.0, months)?;
            let tax = price * fraction(inputs, "property_tax_rate")? / 12.0;
            let insurance = inputs.require("annual_insurance")? / 12.0;

            let down_share = down / price;
            let pmi = match inputs.get("pmi_rate") {
                Some(pmi_rate) if down_share < PMI_THRESHOLD => loan * pmi_rate / 100.0 / 12.0,
                _ => 0.0,
            };

            Ok(FormulaResult::new()
                .with("loan_amount", loan)
                .with("down_payment_percent", down_share * 100.0)
                .with("monthly_principal_interest", principal_interest)
                .with("monthly_property_tax", tax)
                .with("monthly_insurance", insurance)
                .with("monthly_pmi", pmi)
                .with("total_monthly_payment", principal_interest + tax + insurance + pmi)
                .with("total_interest", principal_interest * f64::from(months) - loan))
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line("Loan Amount:", format_currency(num("loan_amount"))),
                    line("Down Payment:", format_percent(num("down_payment_percent"))),
                    line("Principal & Interest:", format_currency(num("monthly_principal_interest"))),
                    line("Property Tax:", format_currency(num("monthly_property_tax"))),
                    line("Insurance:", format_currency(num("monthly_insurance"))),
                    line("PMI:", format_currency(num("monthly_pmi"))),
                    line("Total Monthly Payment:", format_currency(num("total_monthly_payment"))),
                    line("Total Interest:", format_currency(num("total_interest"))),
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
    use fincalc_core::{RawInputs, ValidationErrorKind};

    #[test]
    fn test_standard_mortgage() {
        let contract = contract().unwrap();
        let raw = RawInputs::new()
            .with("home_price", 250_000.0)
            .with("down_payment", 50_000.0)
            .with("annual_rate", 6.0)
            .with("term_years", 30.0)
            .with("property_tax_rate", 1.2)
            .with("annual_insurance", 1_200.0);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();

        assert_relative_eq!(result.number("loan_amount").unwrap(), 200_000.0);
        assert_relative_eq!(result.number("monthly_principal_interest").unwrap(), 1_199.10, epsilon = 0.01);
        assert_relative_eq!(result.number("monthly_property_tax").unwrap(), 250.0, epsilon = 1e-9);
        assert_relative_eq!(result.number("monthly_insurance").unwrap(), 100.0, epsilon = 1e-9);
        // Exactly 20% down: no PMI
        assert_relative_eq!(result.number("monthly_pmi").unwrap(), 0.0);
    }

    #[test]
    fn test_pmi_below_threshold() {
        let contract = contract().unwrap();
        let raw = RawInputs::new()
            .with("home_price", 300_000.0)
            .with("down_payment", 30_000.0)
            .with("pmi_rate", 1.2);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();
        assert_relative_eq!(result.number("monthly_pmi").unwrap(), 270.0, epsilon = 1e-9);

        let raw = raw.with("include_pmi", false);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();
        assert_relative_eq!(result.number("monthly_pmi").unwrap(), 0.0);
    }

    #[test]
    fn test_down_payment_above_price() {
        let contract = contract().unwrap();
        let raw = RawInputs::new()
            .with("home_price", 100_000.0)
            .with("down_payment", 150_000.0);
        let errors = contract.validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "down_payment");
        assert!(matches!(errors[0].kind, ValidationErrorKind::Custom { .. }));
    }
}
