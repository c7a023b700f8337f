//! Root-finding algorithms.
//!
//! This module provides the numerical solvers used by the formula catalog:
//!
//! - [`newton_raphson`]: Fast quadratic convergence when a derivative is available
//! - [`bisection`]: Simple and reliable bracketing method, used as a fallback
//!
//! Neither solver hides a capped iteration. Every [`SolverResult`] carries a
//! [`Termination`] telling the caller whether the tolerance was actually met.
//!
//! # Example
//!
//! The monthly rate of a 12-payment loan of 1,000 repaid at 90 a month:
//!
//! ```rust
//! use fincalc_math::solvers::{newton_raphson, SolverConfig};
//!
//! let pv = |r: f64| (1..=12).map(|t| 90.0 / (1.0 + r).powi(t)).sum::<f64>() - 1_000.0;
//! let dpv = |r: f64| {
//!     (1..=12)
//!         .map(|t| -f64::from(t) * 90.0 / (1.0 + r).powi(t + 1))
//!         .sum::<f64>()
//! };
//!
//! let result = newton_raphson(pv, dpv, 0.01, Some((0.0, 1.0)), &SolverConfig::default());
//! assert!(result.converged());
//! assert!(result.root > 0.01 && result.root < 0.02);
//! ```

mod bisection;
mod newton;

pub use bisection::bisection;
pub use newton::newton_raphson;

use serde::{Deserialize, Serialize};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Derivatives smaller than this in magnitude are treated as flat.
pub const MIN_DERIVATIVE: f64 = 1e-15;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence, measured on `|f(x)|`.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// How a solver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// `|f(root)|` is within tolerance.
    Converged,
    /// The iteration ceiling was reached before the tolerance was met.
    IterationLimit,
    /// The derivative vanished; the last estimate is returned.
    FlatDerivative,
    /// The iterate was pinned against a bound and could not move.
    OutOfBounds,
    /// The function or derivative produced NaN or infinity.
    NonFinite,
}

impl Termination {
    /// Returns true only for [`Termination::Converged`].
    #[must_use]
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }

    /// Short human-readable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::IterationLimit => "iteration limit reached",
            Self::FlatDerivative => "flat derivative",
            Self::OutOfBounds => "pinned at domain bound",
            Self::NonFinite => "non-finite value",
        }
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// Best estimate of the root.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
    /// Why the run stopped.
    pub termination: Termination,
}

impl SolverResult {
    /// Returns true when the residual met the tolerance.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.termination.is_converged()
    }
}
