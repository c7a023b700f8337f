//! Config command implementation.
//!
//! Shows the effective engine configuration and where it is read from.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use fincalc_config::EngineConfig;

use crate::cli::OutputFormat;
use crate::commands::{default_config_path, load_config};
use crate::output::{
    print_header, print_info, print_json_value, print_output, print_success, print_warning,
    KeyValue,
};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Show configuration file location
    Path,

    /// Write a configuration file with default settings
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn settings(config: &EngineConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new(
            "current_year",
            config
                .current_year()
                .map_or_else(|| "unset".to_string(), |year| year.to_string()),
        ),
        KeyValue::new("solver.tolerance", config.solver.tolerance.to_string()),
        KeyValue::new("solver.max_iterations", config.solver.max_iterations.to_string()),
        KeyValue::new("solver.max_seed_retries", config.solver.max_seed_retries.to_string()),
        KeyValue::new(
            "solver.min_periodic_yield",
            config.solver.min_periodic_yield.to_string(),
        ),
        KeyValue::new(
            "solver.max_periodic_yield",
            config.solver.max_periodic_yield.to_string(),
        ),
        KeyValue::new("payoff.debt_max_years", config.payoff.debt_max_years.to_string()),
        KeyValue::new(
            "payoff.credit_card_max_years",
            config.payoff.credit_card_max_years.to_string(),
        ),
    ]
}

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, explicit: Option<&Path>, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(&load_config(explicit)?, format),
        ConfigCommand::Path => execute_path(explicit),
        ConfigCommand::Init(init_args) => execute_init(init_args, explicit),
    }
}

fn execute_show(config: &EngineConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_header("Engine Configuration");
            print_output(&settings(config), format)
        }
        OutputFormat::Json => print_json_value(config),
        OutputFormat::Csv => print_output(&settings(config), format),
        OutputFormat::Minimal => {
            for kv in settings(config) {
                println!("{}={}", kv.key, kv.value);
            }
            Ok(())
        }
    }
}

fn execute_path(explicit: Option<&Path>) -> Result<()> {
    let path = resolve_path(explicit)?;
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

fn execute_init(args: InitArgs, explicit: Option<&Path>) -> Result<()> {
    let path = resolve_path(explicit)?;
    if path.exists() && !args.force {
        print_warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, EngineConfig::default().to_toml_string()?)?;
    print_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}
