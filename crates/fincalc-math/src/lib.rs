//! # fincalc Math
//!
//! Numerical routines used by the fincalc formula catalog.
//!
//! This crate provides:
//!
//! - **Solvers**: Root-finding algorithms (Newton-Raphson, Bisection) whose
//!   results always report how the iteration terminated
//! - **Bond**: Yield-to-maturity solver with seeded retries and a bracketing fallback
//! - **Amortization**: Level payments, amortization schedules and bounded
//!   payoff simulation
//!
//! ## Design Philosophy
//!
//! - **Explicit termination**: A capped iteration is never reported as a converged one
//! - **Bounded work**: Every loop has a hard ceiling
//! - **No engine dependencies**: Plain `f64` in, plain structs out

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod amortization;
pub mod bond;
pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::amortization::{
        amortize, compare_payoff, level_payment, simulate_payoff, PaymentPolicy, PayoffComparison,
        PayoffParams, PayoffSchedule, PayoffStatus, PeriodRow,
    };
    pub use crate::bond::{BondSpec, SolveMethod, YieldResult, YieldSolver};
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        bisection, newton_raphson, SolverConfig, SolverResult, Termination,
    };
}

pub use amortization::{
    amortize, compare_payoff, level_payment, simulate_payoff, PaymentPolicy, PayoffComparison,
    PayoffParams, PayoffSchedule, PayoffStatus, PeriodRow,
};
pub use bond::{BondSpec, SolveMethod, YieldResult, YieldSolver};
pub use error::{MathError, MathResult};
pub use solvers::{SolverConfig, SolverResult, Termination};
