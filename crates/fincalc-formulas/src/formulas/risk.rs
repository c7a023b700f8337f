//! Investment risk assessment questionnaire.

use fincalc_core::result::{format_count, format_percent};
use fincalc_core::{ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema};

use super::{line, render, whole};

/// Registry path.
pub const PATH: &str = "investment/risk-assessment";

/// Lowest possible questionnaire score.
pub const MIN_SCORE: u32 = 5;
/// Highest possible questionnaire score.
pub const MAX_SCORE: u32 = 23;

/// A risk profile and its suggested allocation, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskProfile {
    /// Profile name.
    pub label: &'static str,
    /// Stock allocation.
    pub stocks: f64,
    /// Bond allocation.
    pub bonds: f64,
    /// Cash allocation.
    pub cash: f64,
}

const PROFILES: [RiskProfile; 5] = [
    RiskProfile { label: "Conservative", stocks: 20.0, bonds: 60.0, cash: 20.0 },
    RiskProfile { label: "Moderately Conservative", stocks: 40.0, bonds: 50.0, cash: 10.0 },
    RiskProfile { label: "Moderate", stocks: 60.0, bonds: 35.0, cash: 5.0 },
    RiskProfile { label: "Moderately Aggressive", stocks: 75.0, bonds: 20.0, cash: 5.0 },
    RiskProfile { label: "Aggressive", stocks: 90.0, bonds: 10.0, cash: 0.0 },
];

/// Points awarded for age: younger investors can absorb more risk.
fn age_points(age: u32) -> u32 {
    match age {
        0..=29 => 4,
        30..=44 => 3,
        45..=59 => 2,
        _ => 1,
    }
}

/// The profile for a score in `MIN_SCORE..=MAX_SCORE`.
pub fn profile_for(score: u32) -> RiskProfile {
    let span = f64::from(MAX_SCORE - MIN_SCORE);
    let normalized = f64::from(score.clamp(MIN_SCORE, MAX_SCORE) - MIN_SCORE) / span;
    let index = ((normalized * 5.0) as usize).min(PROFILES.len() - 1);
    PROFILES[index]
}

fn options(labels: &[&str]) -> Vec<EnumOption> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| EnumOption::new(i as f64 + 1.0, *label))
        .collect()
}

/// Builds the risk assessment contract.
pub fn contract() -> ContractResult<FormulaContract> {
    FormulaContract::builder("Investment Risk Assessment")
        .description("Risk profile and suggested allocation from a short questionnaire")
        .category("Investing")
        .variable(VariableSchema::count("age", 40).label("Age").range(18.0, 100.0))
        .variable(
            VariableSchema::choice(
                "time_horizon",
                options(&["Under 3 years", "3 to 5 years", "6 to 10 years", "Over 10 years"]),
                3.0,
            )
            .label("Investment Time Horizon"),
        )
        .variable(
            VariableSchema::choice(
                "risk_tolerance",
                options(&["Very low", "Low", "Medium", "High", "Very high"]),
                3.0,
            )
            .label("Risk Tolerance"),
        )
        .variable(
            VariableSchema::choice(
                "loss_reaction",
                options(&["Sell everything", "Sell some", "Hold", "Buy more"]),
                3.0,
            )
            .label("If your portfolio fell 20%, you would"),
        )
        .variable(
            VariableSchema::choice(
                "income_stability",
                options(&["Unstable", "Somewhat stable", "Stable", "Very stable"]),
                3.0,
            )
            .label("Income Stability"),
        )
        .variable(VariableSchema::boolean("emergency_fund", true).label("Emergency Fund in Place"))
        .calculate(|inputs| {
            let score = age_points(whole(inputs, "age")?)
                + whole(inputs, "time_horizon")?
                + whole(inputs, "risk_tolerance")?
                + whole(inputs, "loss_reaction")?
                + whole(inputs, "income_stability")?
                + if inputs.flag("emergency_fund") { 2 } else { 0 };
            let profile = profile_for(score);

            Ok(FormulaResult::new()
                .with("score", score)
                .with("max_score", MAX_SCORE)
                .with("risk_profile", profile.label)
                .with("stock_allocation_percent", profile.stocks)
                .with("bond_allocation_percent", profile.bonds)
                .with("cash_allocation_percent", profile.cash))
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line(
                        "Score:",
                        format!("{} of {}", format_count(num("score")), format_count(num("max_score"))),
                    ),
                    line("Risk Profile:", r.text("risk_profile").unwrap_or("-")),
                    line("Stocks:", format_percent(num("stock_allocation_percent"))),
                    line("Bonds:", format_percent(num("bond_allocation_percent"))),
                    line("Cash:", format_percent(num("cash_allocation_percent"))),
                ],
                r,
            )
        })
        .build()
}
