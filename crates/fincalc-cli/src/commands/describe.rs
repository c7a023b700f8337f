//! Describe command implementation.
//!
//! Shows the variables a formula accepts, with defaults, bounds and gating.

use anyhow::Result;
use clap::Args;
use fincalc_core::{FormulaRegistry, GateCondition, VariableKind, VariableSchema};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{format_number, print_header, print_info, print_json_value, print_output};

/// Arguments for the describe command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Formula path, e.g. mortgage/basic
    pub path: String,
}

/// One variable, flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct VariableRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Default")]
    pub default: String,
    #[tabled(rename = "Range")]
    pub range: String,
    #[tabled(rename = "Active When")]
    pub active_when: String,
}

impl From<&VariableSchema> for VariableRow {
    fn from(schema: &VariableSchema) -> Self {
        let range = match &schema.kind {
            VariableKind::Enum { options } => options
                .iter()
                .map(|o| format!("{}={}", format_number(o.value), o.label))
                .collect::<Vec<_>>()
                .join(", "),
            VariableKind::Boolean => "true, false".to_string(),
            _ => match (schema.min, schema.max) {
                (Some(min), Some(max)) => format!("{} to {}", format_number(min), format_number(max)),
                (Some(min), None) => format!(">= {}", format_number(min)),
                (None, Some(max)) => format!("<= {}", format_number(max)),
                (None, None) => "-".to_string(),
            },
        };

        let active_when = match &schema.depends_on {
            Some(gate) => match gate.condition {
                GateCondition::Truthy => gate.key.clone(),
                GateCondition::Equals(value) => format!("{}={}", gate.key, format_number(value)),
            },
            None => "always".to_string(),
        };

        Self {
            key: schema.key.clone(),
            label: schema.label.clone(),
            kind: schema.kind.to_string(),
            default: format_number(schema.default),
            range,
            active_when,
        }
    }
}

#[derive(Serialize)]
struct Description<'a> {
    path: &'a str,
    name: &'a str,
    description: &'a str,
    category: Option<&'a str>,
    variables: Vec<&'a VariableSchema>,
}

/// Execute the describe command.
pub fn execute(args: DescribeArgs, registry: &FormulaRegistry, format: OutputFormat) -> Result<()> {
    let contract = registry
        .get(&args.path)
        .ok_or_else(|| CliError::UnknownFormula(args.path.clone()))?;

    match format {
        OutputFormat::Json => print_json_value(&Description {
            path: &args.path,
            name: contract.name(),
            description: contract.description(),
            category: contract.category(),
            variables: contract.variables().iter().collect(),
        }),
        OutputFormat::Table => {
            print_header(contract.name());
            if !contract.description().is_empty() {
                print_info(contract.description());
            }
            let rows: Vec<VariableRow> = contract.variables().iter().map(VariableRow::from).collect();
            print_output(&rows, format)
        }
        OutputFormat::Csv | OutputFormat::Minimal => {
            let rows: Vec<VariableRow> = contract.variables().iter().map(VariableRow::from).collect();
            print_output(&rows, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_for_gated_variable() {
        let schema = VariableSchema::percentage("pmi_rate", 0.5)
            .label("PMI Rate")
            .range(0.0, 5.0)
            .depends_on("include_pmi");
        let row = VariableRow::from(&schema);
        assert_eq!(row.range, "0 to 5");
        assert_eq!(row.active_when, "include_pmi");
        assert_eq!(row.default, "0.5");
    }

    #[test]
    fn test_row_for_enum() {
        let schema = VariableSchema::choice(
            "strategy",
            vec![
                fincalc_core::EnumOption::new(1.0, "Fixed"),
                fincalc_core::EnumOption::new(2.0, "Percent"),
            ],
            1.0,
        );
        let row = VariableRow::from(&schema);
        assert_eq!(row.range, "1=Fixed, 2=Percent");
        assert_eq!(row.kind, "enum");
    }
}
