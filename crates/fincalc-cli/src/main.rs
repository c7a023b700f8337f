//! fincalc CLI - Command-line interface for the financial calculator engine.
//!
//! # Usage
//!
//! ```bash
//! # List the calculators
//! fincalc list
//!
//! # Show the inputs of one
//! fincalc describe mortgage/basic
//!
//! # Evaluate it
//! fincalc eval roi/general -i initial_investment=1000 -i final_value=1500
//!
//! # Machine-readable output
//! fincalc --format json eval bond/yield-to-maturity -i market_price=950
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use fincalc_core::FormulaRegistry;
use fincalc_formulas::standard_registry;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("fincalc_cli=debug,fincalc_core=debug,fincalc_formulas=debug,fincalc_math=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_registry(explicit: Option<&Path>) -> Result<FormulaRegistry> {
    let config = commands::load_config(explicit)?;
    Ok(standard_registry(&config)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format;
    let explicit = cli.config.as_deref();

    match cli.command {
        Commands::List(args) => commands::list::execute(args, &build_registry(explicit)?, format),
        Commands::Describe(args) => {
            commands::describe::execute(args, &build_registry(explicit)?, format)
        }
        Commands::Eval(args) => commands::eval::execute(args, &build_registry(explicit)?, format),
        Commands::Config(args) => commands::config::execute(args, explicit, format),
    }
}
