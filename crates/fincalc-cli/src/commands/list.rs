//! List command implementation.

use anyhow::Result;
use clap::Args;
use fincalc_core::{FormulaContract, FormulaRegistry};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::output::{print_header, print_output};

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list formulas in this category
    #[arg(long)]
    pub category: Option<String>,
}

/// One registered formula.
#[derive(Debug, Serialize, Tabled)]
pub struct FormulaRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Inputs")]
    pub inputs: usize,
}

impl FormulaRow {
    fn new(path: &str, contract: &FormulaContract) -> Self {
        Self {
            path: path.to_string(),
            name: contract.name().to_string(),
            category: contract.category().unwrap_or("-").to_string(),
            inputs: contract.variables().len(),
        }
    }
}

/// Execute the list command.
pub fn execute(args: ListArgs, registry: &FormulaRegistry, format: OutputFormat) -> Result<()> {
    let rows: Vec<FormulaRow> = match &args.category {
        Some(category) => registry
            .in_category(category)
            .map(|(path, contract)| FormulaRow::new(path, contract))
            .collect(),
        None => registry
            .iter()
            .map(|(path, contract)| FormulaRow::new(path, contract))
            .collect(),
    };

    if format == OutputFormat::Table {
        match &args.category {
            Some(category) => print_header(&format!("Formulas in {category}")),
            None => print_header("Formulas"),
        }
    }
    print_output(&rows, format)
}
