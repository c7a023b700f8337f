//! Bracketing fallback for when Newton-Raphson cannot be trusted.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult, Termination};

/// A sign-changing interval `[lo, hi]` with the function value at `lo`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lo: f64,
    hi: f64,
    f_lo: f64,
}

impl Bracket {
    fn midpoint(&self) -> f64 {
        self.lo + (self.hi - self.lo) / 2.0
    }

    fn half_width(&self) -> f64 {
        (self.hi - self.lo) / 2.0
    }

    /// Keeps the half of the interval that still changes sign.
    fn narrow(&mut self, mid: f64, f_mid: f64) {
        if f_mid.signum() == self.f_lo.signum() {
            self.lo = mid;
            self.f_lo = f_mid;
        } else {
            self.hi = mid;
        }
    }
}

/// Finds a root of `f` in `[a, b]` by repeated halving.
///
/// The endpoints may be given in either order but must bracket a root
/// (`f(a)` and `f(b)` of opposite sign, or one of them zero). Converges only
/// when `|f(mid)|` drops below `config.tolerance`. An interval that collapses
/// to machine precision first, or a run out of iterations, is reported as
/// [`Termination::IterationLimit`] with the midpoint, not as an error.
///
/// # Errors
///
/// [`MathError::InvalidBracket`] when the endpoints do not bracket a root or
/// `f` is not finite at either of them.
///
/// # Example
///
/// ```rust
/// use fincalc_math::solvers::{bisection, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let (f_lo, f_hi) = (f(lo), f(hi));

    let bracketed = f_lo.is_finite() && f_hi.is_finite() && f_lo * f_hi <= 0.0;
    if !bracketed {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    let converged = |root: f64, residual: f64, iterations: u32| SolverResult {
        root,
        iterations,
        residual,
        termination: Termination::Converged,
    };

    if f_lo.abs() < config.tolerance {
        return Ok(converged(lo, f_lo, 0));
    }
    if f_hi.abs() < config.tolerance {
        return Ok(converged(hi, f_hi, 0));
    }

    let mut bracket = Bracket { lo, hi, f_lo };
    for iteration in 1..=config.max_iterations {
        let mid = bracket.midpoint();
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance {
            return Ok(converged(mid, f_mid, iteration));
        }
        if bracket.half_width() <= f64::EPSILON * mid.abs().max(1.0) {
            // No representable point left between the endpoints
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: f_mid,
                termination: Termination::IterationLimit,
            });
        }
        bracket.narrow(mid, f_mid);
    }

    let root = bracket.midpoint();
    Ok(SolverResult {
        root,
        iterations: config.max_iterations,
        residual: f(root),
        termination: Termination::IterationLimit,
    })
}
