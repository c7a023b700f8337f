//! Inheritance tax by relationship class.

use fincalc_core::result::{format_currency, format_percent};
use fincalc_core::{CalculationError, ContractResult, EnumOption, FormulaContract, FormulaResult, VariableSchema};

use super::{line, render, whole};

/// Registry path.
pub const PATH: &str = "tax/inheritance";

/// Tax treatment of one relationship class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxClass {
    /// Relationship option value.
    pub relationship: u32,
    /// Relationship label.
    pub relationship_label: &'static str,
    /// Class label reported with the result.
    pub class_label: &'static str,
    /// Amount exempt from tax; `None` means fully exempt.
    pub exemption: Option<f64>,
    /// Rate on the taxable amount.
    pub rate: f64,
}

/// Simplified class schedule.
pub const TAX_CLASSES: [TaxClass; 5] = [
    TaxClass {
        relationship: 1,
        relationship_label: "Spouse",
        class_label: "Exempt",
        exemption: None,
        rate: 0.0,
    },
    TaxClass {
        relationship: 2,
        relationship_label: "Child or grandchild",
        class_label: "Class A",
        exemption: Some(40_000.0),
        rate: 0.045,
    },
    TaxClass {
        relationship: 3,
        relationship_label: "Sibling",
        class_label: "Class B",
        exemption: Some(25_000.0),
        rate: 0.12,
    },
    TaxClass {
        relationship: 4,
        relationship_label: "Other relative",
        class_label: "Class C",
        exemption: Some(10_000.0),
        rate: 0.13,
    },
    TaxClass {
        relationship: 5,
        relationship_label: "Unrelated",
        class_label: "Class D",
        exemption: Some(0.0),
        rate: 0.15,
    },
];

/// The tax class of a relationship option value.
pub fn tax_class(relationship: u32) -> Option<&'static TaxClass> {
    TAX_CLASSES.iter().find(|c| c.relationship == relationship)
}

/// Builds the inheritance tax contract.
pub fn contract() -> ContractResult<FormulaContract> {
    let options = TAX_CLASSES
        .iter()
        .map(|c| EnumOption::new(f64::from(c.relationship), c.relationship_label))
        .collect();

    FormulaContract::builder("Inheritance Tax")
        .description("Tax owed on an inheritance under a class schedule by relationship to the deceased")
        .category("Tax")
        .variable(
            VariableSchema::currency("inheritance_amount", 250_000.0)
                .label("Inheritance Amount")
                .range(0.0, 10_000_000_000.0)
                .step(1_000.0),
        )
        .variable(VariableSchema::choice("relationship", options, 2.0).label("Relationship to Deceased"))
        .calculate(|inputs| {
            let amount = inputs.require("inheritance_amount")?;
            let relationship = whole(inputs, "relationship")?;
            let class = tax_class(relationship)
                .ok_or_else(|| CalculationError::failed(format!("Unknown relationship {relationship}")))?;

            let taxable = match class.exemption {
                Some(exemption) => (amount - exemption).max(0.0),
                None => 0.0,
            };
            let tax = taxable * class.rate;
            let effective_rate = if amount > 0.0 { tax / amount * 100.0 } else { 0.0 };

            Ok(FormulaResult::new()
                .with("taxable_amount", taxable)
                .with("tax_owed", tax)
                .with("effective_rate_percent", effective_rate)
                .with("net_inheritance", amount - tax)
                .with("relationship", class.relationship_label)
                .with("tax_class", class.class_label))
        })
        .format(|r| {
            let num = |key| r.number(key).unwrap_or_default();
            render(
                vec![
                    line("Relationship:", r.text("relationship").unwrap_or("-")),
                    line("Tax Class:", r.text("tax_class").unwrap_or("-")),
                    line("Taxable Amount:", format_currency(num("taxable_amount"))),
                    line("Tax Owed:", format_currency(num("tax_owed"))),
                    line("Effective Rate:", format_percent(num("effective_rate_percent"))),
                    line("Net Inheritance:", format_currency(num("net_inheritance"))),
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

    fn run(amount: f64, relationship: f64) -> FormulaResult {
        let contract = contract().unwrap();
        let raw = RawInputs::new()
            .with("inheritance_amount", amount)
            .with("relationship", relationship);
        contract.calculate(&contract.validate(&raw).unwrap()).unwrap()
    }

    #[test]
    fn test_spouse_exempt() {
        let result = run(1_000_000.0, 1.0);
        assert_relative_eq!(result.number("tax_owed").unwrap(), 0.0);
        assert_eq!(result.text("tax_class"), Some("Exempt"));
    }

    #[test]
    fn test_sibling() {
        let result = run(125_000.0, 3.0);
        assert_relative_eq!(result.number("taxable_amount").unwrap(), 100_000.0);
        assert_relative_eq!(result.number("tax_owed").unwrap(), 12_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.number("net_inheritance").unwrap(), 113_000.0, epsilon = 1e-9);
        assert_eq!(result.text("relationship"), Some("Sibling"));
    }

    #[test]
    fn test_below_exemption() {
        let result = run(30_000.0, 2.0);
        assert_relative_eq!(result.number("tax_owed").unwrap(), 0.0);
        assert_relative_eq!(result.number("effective_rate_percent").unwrap(), 0.0);
    }

    #[test]
    fn test_zero_amount() {
        let result = run(0.0, 5.0);
        assert_relative_eq!(result.number("effective_rate_percent").unwrap(), 0.0);
    }
}
