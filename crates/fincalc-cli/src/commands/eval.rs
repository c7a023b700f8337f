//! Eval command implementation.
//!
//! Runs one evaluation request through the dispatcher and prints the outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fincalc_core::{Evaluator, FormulaRegistry, Outcome, RawInputs};

use crate::cli::OutputFormat;
use crate::commands::parse_input;
use crate::error::CliError;
use crate::output::{
    print_error, print_header, print_json_value, print_output, print_warning, KeyValue,
};

/// Arguments for the eval command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Formula path, e.g. roi/general
    pub path: String,

    /// Input value as key=value (repeatable). Omitted inputs take their defaults.
    #[arg(short, long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// JSON file with an object of inputs; --input values override it
    #[arg(long, value_name = "FILE")]
    pub inputs_file: Option<PathBuf>,
}

fn collect_inputs(args: &EvalArgs) -> Result<RawInputs> {
    let mut raw = match &args.inputs_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse inputs in {}", path.display()))?
        }
        None => RawInputs::new(),
    };

    for input in &args.inputs {
        let (key, value) = parse_input(input)?;
        raw.insert(key, value);
    }
    Ok(raw)
}

/// Execute the eval command.
pub fn execute(args: EvalArgs, registry: &FormulaRegistry, format: OutputFormat) -> Result<()> {
    let raw = collect_inputs(&args)?;
    let evaluator = Evaluator::new(registry);
    let outcome = evaluator.evaluate(&args.path, &raw);

    if format == OutputFormat::Json {
        print_json_value(&outcome)?;
    }

    match outcome {
        Outcome::Accepted(result) => {
            match format {
                OutputFormat::Json => {}
                OutputFormat::Table => {
                    if let Some(contract) = registry.get(&args.path) {
                        print_header(contract.name());
                    }
                    if let Some(text) = evaluator.render(&args.path, &result) {
                        println!("{text}");
                    }
                }
                OutputFormat::Csv => {
                    let rows: Vec<KeyValue> =
                        result.iter().map(|(k, v)| KeyValue::from_result(k, v)).collect();
                    print_output(&rows, format)?;
                }
                OutputFormat::Minimal => {
                    for (key, value) in result.iter() {
                        println!("{}={}", key, KeyValue::from_result(key, value).value);
                    }
                    for diagnostic in result.diagnostics() {
                        print_warning(&diagnostic.to_string());
                    }
                }
            }
            Ok(())
        }
        Outcome::Rejected(errors) => {
            if format != OutputFormat::Json {
                for error in &errors {
                    print_error(&format!("{} ({})", error, error.key));
                }
            }
            Err(CliError::Rejected {
                path: args.path,
                count: errors.len(),
            }
            .into())
        }
        Outcome::Failed(error) => Err(CliError::from(error).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_core::RawValue;
    use std::io::Write;

    #[test]
    fn test_inputs_file_overridden_by_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"balance": 1000, "apr": "19.9%", "strategy": 1}}"#).unwrap();

        let args = EvalArgs {
            path: "credit-card/payoff".into(),
            inputs: vec!["balance=2500".into()],
            inputs_file: Some(file.path().to_path_buf()),
        };
        let raw = collect_inputs(&args).unwrap();

        assert_eq!(raw.get("balance"), Some(&RawValue::Number(2500.0)));
        assert_eq!(raw.get("apr"), Some(&RawValue::Text("19.9%".into())));
        assert_eq!(raw.len(), 3);
    }
}
