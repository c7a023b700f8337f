//! # fincalc Formulas
//!
//! The standard calculator catalog, registered under `category/name` paths:
//!
//! | Path | Calculator |
//! |------|------------|
//! | `roi/general` | Return on investment, optionally annualized |
//! | `savings/compound-interest` | Future value with monthly contributions |
//! | `mortgage/basic` | Monthly payment with taxes, insurance and PMI |
//! | `loan/amortization` | Fully amortizing loan schedule |
//! | `debt/payoff` | Payoff time with and without an extra payment |
//! | `credit-card/payoff` | Fixed or percent-of-balance card payoff |
//! | `bond/yield-to-maturity` | Yield to maturity by Newton-Raphson |
//! | `retirement/401k` | 401(k) balance at retirement |
//! | `tax/inheritance` | Inheritance tax by relationship class |
//! | `investment/risk-assessment` | Questionnaire risk profile |
//!
//! # Example
//!
//! ```rust
//! use fincalc_config::EngineConfig;
//! use fincalc_core::{evaluate, RawInputs};
//! use fincalc_formulas::standard_registry;
//!
//! let registry = standard_registry(&EngineConfig::default().with_current_year(2025)).unwrap();
//! let raw = RawInputs::new()
//!     .with("initial_investment", 1_000.0)
//!     .with("final_value", 1_500.0);
//!
//! let outcome = evaluate(&registry, "roi/general", &raw);
//! assert_eq!(outcome.result().unwrap().number("roi_percent"), Some(50.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod formulas;

pub use formulas::standard_registry;
