//! Bond yield to maturity.

use fincalc_core::result::{format_currency, format_percent};
use fincalc_core::{ContractResult, Diagnostic, EnumOption, FormulaContract, FormulaResult, VariableSchema};
use fincalc_math::{BondSpec, YieldSolver};

use super::{fraction, line, render, whole};

/// Registry path.
pub const PATH: &str = "bond/yield-to-maturity";

/// Relative price difference below which a bond is quoted at par.
const PAR_TOLERANCE: f64 = 1e-6;

/// Builds the yield-to-maturity contract around `solver`.
pub fn contract(solver: YieldSolver) -> ContractResult<FormulaContract> {
    FormulaContract::builder("Bond Yield to Maturity")
        .description("Annual yield that discounts a bond's remaining cash flows to its market price")
        .category("Investing")
        .variable(
            VariableSchema::currency("face_value", 1_000.0)
                .label("Face Value")
                .range(1.0, 1_000_000_000.0),
        )
        .variable(
            VariableSchema::percentage("coupon_rate", 5.0)
                .label("Annual Coupon Rate")
                .range(0.0, 50.0)
                .step(0.125),
        )
        .variable(
            VariableSchema::currency("market_price", 1_000.0)
                .label("Market Price")
                .range(0.01, 1_000_000_000.0),
        )
        .variable(
            VariableSchema::count("years_to_maturity", 10)
                .label("Years to Maturity")
                .range(1.0, 100.0),
        )
        .variable(
            VariableSchema::choice(
                "frequency",
                vec![
                    EnumOption::new(1.0, "Annual"),
                    EnumOption::new(2.0, "Semiannual"),
                    EnumOption::new(4.0, "Quarterly"),
                    EnumOption::new(12.0, "Monthly"),
                ],
                2.0,
            )
            .label("Coupon Frequency"),
        )
        .calculate(move |inputs| {
            let frequency = whole(inputs, "frequency")?;
            let bond = BondSpec::new(
                inputs.require("face_value")?,
                fraction(inputs, "coupon_rate")?,
                inputs.require("market_price")?,
                inputs.require("years_to_maturity")?,
                frequency,
            );
            let ytm = solver.solve(&bond)?;

            let premium = (bond.market_price - bond.face_value) / bond.face_value;
            let price_status = if premium.abs() < PAR_TOLERANCE {
                "Par"
            } else if premium > 0.0 {
                "Premium"
            } else {
                "Discount"
            };

            let mut result = FormulaResult::new()
                .with("ytm_percent", ytm.annual_yield * 100.0)
                .with("effective_annual_yield_percent", ytm.effective_annual_yield(frequency) * 100.0)
                .with("current_yield_percent", bond.current_yield() * 100.0)
                .with("annual_coupon", bond.annual_coupon())
                .with("price_status", price_status)
                .with("converged", ytm.converged())
                .with("iterations", ytm.iterations);

            if !ytm.converged() {
                result.push_diagnostic(Diagnostic::SolverNonConvergence {
                    iterations: ytm.iterations,
                    residual: ytm.residual,
                });
            }
            Ok(result)
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            let ytm = format_percent(num("ytm_percent"));
            let ytm = if num("converged") == 0.0 {
                format!("{ytm} (estimate)")
            } else {
                ytm
            };
            render(
                vec![
                    line("Yield to Maturity:", ytm),
                    line("Effective Annual Yield:", format_percent(num("effective_annual_yield_percent"))),
                    line("Current Yield:", format_percent(num("current_yield_percent"))),
                    line("Annual Coupon:", format_currency(num("annual_coupon"))),
                    line("Price Status:", r.text("price_status").unwrap_or("-")),
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

    fn run(raw: RawInputs) -> FormulaResult {
        let contract = contract(YieldSolver::new()).unwrap();
        contract.calculate(&contract.validate(&raw).unwrap()).unwrap()
    }

    #[test]
    fn test_par_bond() {
        let result = run(RawInputs::new());
        assert_relative_eq!(result.number("ytm_percent").unwrap(), 5.0, epsilon = 1e-6);
        assert_eq!(result.text("price_status"), Some("Par"));
        assert_eq!(result.number("converged"), Some(1.0));
        assert!(result.diagnostics().is_empty());
    }

    #[test]
    fn test_discount_bond_yields_more() {
        let result = run(RawInputs::new().with("market_price", 900.0));
        assert!(result.number("ytm_percent").unwrap() > result.number("current_yield_percent").unwrap());
        assert_eq!(result.text("price_status"), Some("Discount"));
    }

    #[test]
    fn test_non_convergence_is_flagged() {
        let result = run(RawInputs::new()
            .with("coupon_rate", 0.0)
            .with("market_price", 5_000.0));

        assert_eq!(result.number("converged"), Some(0.0));
        assert_eq!(result.text("price_status"), Some("Premium"));
        assert!(matches!(
            result.diagnostics(),
            [Diagnostic::SolverNonConvergence { .. }]
        ));
    }
}
