//! Newton-Raphson root-finding algorithm.

use crate::solvers::{SolverConfig, SolverResult, Termination, MIN_DERIVATIVE};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// This method has quadratic convergence near the root but requires
/// the derivative of the function.
///
/// The run never fails: it always returns the best available estimate and a
/// [`Termination`] describing why it stopped. When `bounds` are given, every
/// iterate is clamped into `[lo, hi]`; an iterate that is pushed against the
/// bound it already sits on ends the run with [`Termination::OutOfBounds`].
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `bounds` - Optional domain `(lo, hi)` for the iterates
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use fincalc_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, None, &SolverConfig::default());
/// assert!(result.converged());
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> SolverResult
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let (lo, hi) = bounds.map_or((f64::NEG_INFINITY, f64::INFINITY), |(a, b)| {
        (a.min(b), a.max(b))
    });

    let finish = |root: f64, iterations: u32, residual: f64, termination: Termination| {
        SolverResult {
            root,
            iterations,
            residual,
            termination,
        }
    };

    if !initial_guess.is_finite() {
        return finish(initial_guess, 0, f64::NAN, Termination::NonFinite);
    }

    let mut x = initial_guess.clamp(lo, hi);

    for iteration in 0..config.max_iterations {
        let fx = f(x);

        if !fx.is_finite() {
            return finish(x, iteration, fx, Termination::NonFinite);
        }

        // Check for convergence
        if fx.abs() < config.tolerance {
            return finish(x, iteration, fx, Termination::Converged);
        }

        let dfx = df(x);

        if !dfx.is_finite() {
            return finish(x, iteration, fx, Termination::NonFinite);
        }

        // Flat derivative: keep the current estimate
        if dfx.abs() < MIN_DERIVATIVE {
            return finish(x, iteration, fx, Termination::FlatDerivative);
        }

        let next = x - fx / dfx;
        if !next.is_finite() {
            return finish(x, iteration, fx, Termination::NonFinite);
        }

        let clamped = next.clamp(lo, hi);
        if clamped != next && clamped == x {
            return finish(x, iteration + 1, fx, Termination::OutOfBounds);
        }
        x = clamped;
    }

    let fx = f(x);
    let termination = if fx.abs() < config.tolerance {
        Termination::Converged
    } else {
        Termination::IterationLimit
    };
    finish(x, config.max_iterations, fx, termination)
}
