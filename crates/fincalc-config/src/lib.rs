//! # fincalc Configuration
//!
//! Engine-wide settings for the fincalc formula catalog.
//!
//! - **Solver settings**: yield-to-maturity tolerance, iteration ceiling,
//!   seed retries and yield domain
//! - **Payoff settings**: period ceilings for debt and credit card payoff
//! - **Reference year**: pinned, or resolved from the local clock once at
//!   startup
//!
//! Configurations load from TOML or JSON and are checked with the
//! [`Validate`] trait, which reports every problem at once.
//!
//! # Example
//!
//! ```rust
//! use fincalc_config::{EngineConfig, Validate};
//!
//! let config = EngineConfig::from_toml_str("current_year = 2025\n[solver]\nmax_iterations = 200\n").unwrap();
//! assert_eq!(config.solver.max_iterations, 200);
//! assert_eq!(config.payoff.debt_max_years, 50);
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;

pub use engine::{EngineConfig, PayoffSettings, SolverSettings};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
