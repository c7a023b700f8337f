//! 401(k) projection.
//!
//! Bounds on the birth year and the retirement age depend on the reference
//! year, which is fixed when the contract is built.

use fincalc_core::result::{format_count, format_currency};
use fincalc_core::{ContractResult, FormulaContract, FormulaResult, VariableKind, VariableSchema};

use super::{fraction, line, render};

/// Registry path.
pub const PATH: &str = "retirement/401k";

/// Share of income that may be contributed.
const MAX_CONTRIBUTION_SHARE: f64 = 0.90;

const DEFAULT_AGE: i32 = 35;
const MIN_AGE: i32 = 16;
const MAX_AGE: i32 = 100;

/// Builds the 401(k) contract for the reference year `current_year`.
pub fn contract(current_year: i32) -> ContractResult<FormulaContract> {
    let year = f64::from(current_year);
    let default_birth_year = year - f64::from(DEFAULT_AGE);

    FormulaContract::builder("401(k) Retirement")
        .description("Projected 401(k) balance at retirement with employer match and salary growth")
        .category("Retirement")
        .variable(
            VariableSchema::new("birth_year", VariableKind::Count, default_birth_year)
                .label("Birth Year")
                .range(year - f64::from(MAX_AGE), year - f64::from(MIN_AGE)),
        )
        .variable(
            VariableSchema::count("retirement_age", 67)
                .label("Retirement Age")
                .range(50.0, 80.0)
                .validator(move |value, all| {
                    let age = year - all.get("birth_year").unwrap_or(default_birth_year);
                    if value <= age {
                        Err(format!("Retirement age must be greater than your current age ({age:.0})"))
                    } else {
                        Ok(value)
                    }
                }),
        )
        .variable(
            VariableSchema::currency("annual_income", 75_000.0)
                .label("Annual Income")
                .range(1.0, 100_000_000.0)
                .step(1_000.0),
        )
        .variable(
            VariableSchema::currency("annual_contribution", 7_500.0)
                .label("Annual Contribution")
                .min(0.0)
                .step(100.0)
                .help("Limited to 90% of income")
                .validator(|value, all| {
                    let limit = all.get("annual_income").unwrap_or(0.0) * MAX_CONTRIBUTION_SHARE;
                    if value > limit {
                        Err(format!(
                            "Contribution cannot exceed 90% of income ({})",
                            format_currency(limit)
                        ))
                    } else {
                        Ok(value)
                    }
                }),
        )
        .variable(
            VariableSchema::currency("current_balance", 50_000.0)
                .label("Current 401(k) Balance")
                .range(0.0, 1_000_000_000.0),
        )
        .variable(
            VariableSchema::percentage("employer_match", 50.0)
                .label("Employer Match (% of contribution)")
                .range(0.0, 200.0),
        )
        .variable(
            VariableSchema::percentage("match_limit", 6.0)
                .label("Match Limit (% of income)")
                .range(0.0, 100.0),
        )
        .variable(
            VariableSchema::percentage("expected_return", 7.0)
                .label("Expected Annual Return")
                .range(0.0, 20.0)
                .step(0.1),
        )
        .variable(
            VariableSchema::percentage("salary_growth", 2.0)
                .label("Annual Salary Growth")
                .range(0.0, 10.0)
                .step(0.1),
        )
        .calculate(move |inputs| {
            let current_age = year - inputs.require("birth_year")?;
            let years = (inputs.require("retirement_age")? - current_age).max(0.0) as u32;
            let mut income = inputs.require("annual_income")?;
            let contribution_rate = inputs.require("annual_contribution")? / income;
            let match_rate = fraction(inputs, "employer_match")?;
            let match_limit = fraction(inputs, "match_limit")?;
            let growth = fraction(inputs, "expected_return")?;
            let raise = fraction(inputs, "salary_growth")?;

            let starting_balance = inputs.require("current_balance")?;
            let mut balance = starting_balance;
            let mut contributions = 0.0;
            let mut employer = 0.0;

            for _ in 0..years {
                let contribution = income * contribution_rate;
                let matched = contribution.min(income * match_limit) * match_rate;
                balance = balance * (1.0 + growth) + contribution + matched;
                contributions += contribution;
                employer += matched;
                income *= 1.0 + raise;
            }

            Ok(FormulaResult::new()
                .with("current_age", current_age)
                .with("years_to_retirement", years)
                .with("balance_at_retirement", balance)
                .with("total_contributions", contributions)
                .with("total_employer_match", employer)
                .with("investment_growth", balance - starting_balance - contributions - employer))
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line("Years to Retirement:", format_count(num("years_to_retirement"))),
                    line("Balance at Retirement:", format_currency(num("balance_at_retirement"))),
                    line("Your Contributions:", format_currency(num("total_contributions"))),
                    line("Employer Match:", format_currency(num("total_employer_match"))),
                    line("Investment Growth:", format_currency(num("investment_growth"))),
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
    fn test_defaults_follow_reference_year() {
        let contract = contract(2030).unwrap();
        let birth = contract.variables().get("birth_year").unwrap();
        assert_eq!(birth.default, 1995.0);
        assert_eq!(birth.max, Some(2014.0));
        assert_eq!(birth.min, Some(1930.0));
    }

    #[test]
    fn test_projection_without_growth() {
        let contract = contract(2025).unwrap();
        let raw = RawInputs::new()
            .with("birth_year", 1985)
            .with("retirement_age", 65)
            .with("annual_income", 100_000.0)
            .with("annual_contribution", 10_000.0)
            .with("current_balance", 0.0)
            .with("employer_match", 50.0)
            .with("match_limit", 6.0)
            .with("expected_return", 0.0)
            .with("salary_growth", 0.0);
        let result = contract.calculate(&contract.validate(&raw).unwrap()).unwrap();

        assert_eq!(result.number("years_to_retirement"), Some(25.0));
        assert_relative_eq!(result.number("total_contributions").unwrap(), 250_000.0, epsilon = 1e-6);
        // Match: 50% of contributions up to 6% of salary
        assert_relative_eq!(result.number("total_employer_match").unwrap(), 75_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.number("balance_at_retirement").unwrap(), 325_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.number("investment_growth").unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_contribution_capped_by_income() {
        let contract = contract(2025).unwrap();
        let raw = RawInputs::new()
            .with("annual_income", 50_000.0)
            .with("annual_contribution", 46_000.0);
        let errors = contract.validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "annual_contribution");
        assert!(matches!(errors[0].kind, ValidationErrorKind::Custom { .. }));

        let raw = raw.with("annual_contribution", 45_000.0);
        assert!(contract.validate(&raw).is_ok());
    }

    #[test]
    fn test_retirement_age_after_current_age() {
        let contract = contract(2025).unwrap();
        let raw = RawInputs::new().with("birth_year", 1955).with("retirement_age", 65);
        let errors = contract.validate(&raw).unwrap_err();
        assert_eq!(errors[0].key, "retirement_age");
        assert_eq!(
            errors[0].kind,
            ValidationErrorKind::Custom {
                message: "Retirement age must be greater than your current age (70)".into()
            }
        );
    }
}
