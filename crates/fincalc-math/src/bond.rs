//! Yield-to-maturity solver for plain fixed-coupon bonds.
//!
//! Finds the periodic yield `r` such that the present value of the remaining
//! coupons plus the discounted face value equals the market price:
//!
//! ```text
//! price = Σ_{t=1..n} c / (1 + r)^t + F / (1 + r)^n
//! ```
//!
//! Newton-Raphson is seeded from the current yield. If it does not converge,
//! a bounded number of alternative seeds are tried, then bisection over the
//! solver domain. A result that never met the tolerance is still returned,
//! flagged through [`YieldResult::converged`].
//!
//! # Example
//!
//! ```rust
//! use fincalc_math::bond::{BondSpec, YieldSolver};
//!
//! let bond = BondSpec::new(1000.0, 0.05, 1000.0, 10.0, 2);
//! let result = YieldSolver::new().solve(&bond).unwrap();
//!
//! assert!(result.converged());
//! assert!((result.annual_yield - 0.05).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::solvers::{bisection, newton_raphson, SolverConfig, SolverResult, Termination};

/// Price tolerance for the yield solve (in price units).
pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.0001;

/// Default cap on Newton attempts with distinct seeds.
pub const DEFAULT_SEED_RETRIES: u32 = 3;

/// Seed used after the current yield and the coupon rate (annual).
const FALLBACK_ANNUAL_SEED: f64 = 0.05;

/// A plain fixed-coupon bond as entered in a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondSpec {
    /// Face (par) value.
    pub face_value: f64,
    /// Annual coupon rate as a decimal (0.05 = 5%).
    pub coupon_rate: f64,
    /// Market price.
    pub market_price: f64,
    /// Years remaining until maturity.
    pub years_to_maturity: f64,
    /// Coupon payments per year.
    pub frequency: u32,
}

impl BondSpec {
    /// Creates a new bond specification.
    #[must_use]
    pub fn new(
        face_value: f64,
        coupon_rate: f64,
        market_price: f64,
        years_to_maturity: f64,
        frequency: u32,
    ) -> Self {
        Self {
            face_value,
            coupon_rate,
            market_price,
            years_to_maturity,
            frequency,
        }
    }

    /// Number of remaining coupon periods.
    #[must_use]
    pub fn periods(&self) -> u32 {
        (self.years_to_maturity * f64::from(self.frequency)).round() as u32
    }

    /// Annual coupon amount.
    #[must_use]
    pub fn annual_coupon(&self) -> f64 {
        self.face_value * self.coupon_rate
    }

    /// Coupon paid each period.
    #[must_use]
    pub fn coupon_per_period(&self) -> f64 {
        self.annual_coupon() / f64::from(self.frequency)
    }

    /// Current yield: annual coupon over market price.
    #[must_use]
    pub fn current_yield(&self) -> f64 {
        self.annual_coupon() / self.market_price
    }

    /// Checks that the bond can be priced.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.face_value.is_finite() && self.face_value > 0.0) {
            return Err(MathError::invalid_input("face value must be positive"));
        }
        if !(self.market_price.is_finite() && self.market_price > 0.0) {
            return Err(MathError::invalid_input("market price must be positive"));
        }
        if !(self.coupon_rate.is_finite() && self.coupon_rate >= 0.0) {
            return Err(MathError::invalid_input("coupon rate cannot be negative"));
        }
        if self.frequency == 0 {
            return Err(MathError::invalid_input(
                "payment frequency must be at least one per year",
            ));
        }
        if !self.years_to_maturity.is_finite() || self.periods() == 0 {
            return Err(MathError::invalid_input(
                "bond must have at least one remaining coupon period",
            ));
        }
        Ok(())
    }

    /// Present value of the remaining cash flows at a periodic yield.
    #[must_use]
    pub fn price_at(&self, periodic_yield: f64) -> f64 {
        let coupon = self.coupon_per_period();
        let discount = 1.0 / (1.0 + periodic_yield);
        let mut factor = 1.0;
        let mut pv = 0.0;
        for _ in 0..self.periods() {
            factor *= discount;
            pv += coupon * factor;
        }
        pv + self.face_value * factor
    }

    /// Derivative of [`BondSpec::price_at`] with respect to the periodic yield.
    #[must_use]
    pub fn price_derivative_at(&self, periodic_yield: f64) -> f64 {
        let coupon = self.coupon_per_period();
        let discount = 1.0 / (1.0 + periodic_yield);
        let n = self.periods();
        let mut factor = discount;
        let mut dpv = 0.0;
        for t in 1..=n {
            factor *= discount;
            dpv -= f64::from(t) * coupon * factor;
        }
        dpv - f64::from(n) * self.face_value * factor
    }
}

/// Which algorithm produced the reported yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    /// Newton-Raphson from one of the seeds.
    Newton,
    /// Bisection over the solver domain.
    Bisection,
}

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldResult {
    /// Yield per coupon period.
    pub periodic_yield: f64,
    /// Nominal annual yield (periodic yield times frequency).
    pub annual_yield: f64,
    /// Iterations spent across all attempts.
    pub iterations: u32,
    /// Price residual at the reported yield.
    pub residual: f64,
    /// How the attempt that produced this yield ended.
    pub termination: Termination,
    /// Algorithm that produced this yield.
    pub method: SolveMethod,
}

impl YieldResult {
    /// Returns true when the price residual met the tolerance.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.termination.is_converged()
    }

    /// Effective annual yield, `(1 + r)^f - 1`.
    #[must_use]
    pub fn effective_annual_yield(&self, frequency: u32) -> f64 {
        (1.0 + self.periodic_yield).powi(frequency as i32) - 1.0
    }
}

/// Yield-to-maturity solver.
#[derive(Debug, Clone)]
pub struct YieldSolver {
    /// Solver configuration.
    config: SolverConfig,
    /// Maximum number of Newton attempts with distinct seeds.
    seed_retries: u32,
    /// Domain of the periodic yield.
    bounds: (f64, f64),
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a new yield solver with default settings.
    ///
    /// Default tolerance: 0.0001 (price units)
    /// Default max iterations: 100
    /// Default domain: periodic yield in `[0, 1]`
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::new(DEFAULT_PRICE_TOLERANCE, 100),
            seed_retries: DEFAULT_SEED_RETRIES,
            bounds: (0.0, 1.0),
        }
    }

    /// Sets the price tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the maximum iterations per attempt.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Sets the number of Newton attempts with distinct seeds (at least one).
    #[must_use]
    pub fn with_seed_retries(mut self, retries: u32) -> Self {
        self.seed_retries = retries.max(1);
        self
    }

    /// Sets the periodic yield domain.
    #[must_use]
    pub fn with_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.bounds = (lo.min(hi), lo.max(hi));
        self
    }

    /// Seeds tried in order: current yield, coupon rate, then a fixed 5%.
    fn seeds(&self, bond: &BondSpec) -> Vec<f64> {
        let freq = f64::from(bond.frequency);
        let (lo, hi) = self.bounds;
        let mut seeds: Vec<f64> = Vec::with_capacity(3);
        for annual in [bond.current_yield(), bond.coupon_rate, FALLBACK_ANNUAL_SEED] {
            let seed = (annual / freq).clamp(lo, hi);
            if seed.is_finite() && !seeds.iter().any(|s| (s - seed).abs() < 1e-12) {
                seeds.push(seed);
            }
        }
        seeds.truncate(self.seed_retries as usize);
        seeds
    }

    /// Solves for the yield that reprices the bond to its market price.
    ///
    /// Returns an error only for bonds that cannot be priced. A run that never
    /// met the tolerance returns the estimate with the smallest residual and a
    /// non-converged [`Termination`].
    pub fn solve(&self, bond: &BondSpec) -> MathResult<YieldResult> {
        bond.validate()?;

        let objective = |r: f64| bond.price_at(r) - bond.market_price;
        let derivative = |r: f64| bond.price_derivative_at(r);
        let freq = f64::from(bond.frequency);

        let mut total_iterations = 0;
        let mut best: Option<(SolverResult, SolveMethod)> = None;

        for seed in self.seeds(bond) {
            let attempt =
                newton_raphson(objective, derivative, seed, Some(self.bounds), &self.config);
            total_iterations += attempt.iterations;

            if attempt.converged() {
                return Ok(Self::finish(attempt, SolveMethod::Newton, total_iterations, freq));
            }

            log::debug!(
                "Newton yield attempt from seed {:.6} stopped: {} (residual {:.3e})",
                seed,
                attempt.termination,
                attempt.residual
            );
            best = Some(Self::better(best, attempt, SolveMethod::Newton));
        }

        let (lo, hi) = self.bounds;
        match bisection(objective, lo, hi, &self.config) {
            Ok(attempt) => {
                total_iterations += attempt.iterations;
                if attempt.converged() {
                    return Ok(Self::finish(
                        attempt,
                        SolveMethod::Bisection,
                        total_iterations,
                        freq,
                    ));
                }
                best = Some(Self::better(best, attempt, SolveMethod::Bisection));
            }
            Err(e) => log::debug!("Bisection fallback unavailable: {}", e),
        }

        let (attempt, method) = best.ok_or_else(|| {
            MathError::invalid_input("no yield seed could be derived from the bond")
        })?;
        log::warn!(
            "Yield solve did not converge after {} iterations (residual {:.3e})",
            total_iterations,
            attempt.residual
        );
        Ok(Self::finish(attempt, method, total_iterations, freq))
    }

    fn better(
        current: Option<(SolverResult, SolveMethod)>,
        candidate: SolverResult,
        method: SolveMethod,
    ) -> (SolverResult, SolveMethod) {
        let score = |r: &SolverResult| {
            if r.residual.is_finite() {
                r.residual.abs()
            } else {
                f64::INFINITY
            }
        };
        match current {
            Some(existing) if score(&existing.0) <= score(&candidate) => existing,
            _ => (candidate, method),
        }
    }

    fn finish(result: SolverResult, method: SolveMethod, iterations: u32, freq: f64) -> YieldResult {
        YieldResult {
            periodic_yield: result.root,
            annual_yield: result.root * freq,
            iterations,
            residual: result.residual,
            termination: result.termination,
            method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_par_bond_yields_coupon() {
        let bond = BondSpec::new(1000.0, 0.05, 1000.0, 10.0, 2);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert!(result.converged());
        assert_eq!(result.method, SolveMethod::Newton);
        assert_relative_eq!(result.annual_yield, 0.05, epsilon = 1e-6);
        assert_relative_eq!(result.periodic_yield, 0.025, epsilon = 1e-7);
    }

    #[test]
    fn test_discount_bond_yields_above_coupon() {
        let bond = BondSpec::new(1000.0, 0.05, 950.0, 5.0, 2);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert!(result.converged());
        assert!(result.annual_yield > 0.05);
        assert!((bond.price_at(result.periodic_yield) - 950.0).abs() < DEFAULT_PRICE_TOLERANCE);
    }

    #[test]
    fn test_premium_bond_yields_below_coupon() {
        let bond = BondSpec::new(1000.0, 0.07, 1050.0, 5.0, 2);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert!(result.converged());
        assert!(result.annual_yield < 0.07);
    }

    #[test]
    fn test_zero_coupon_bond() {
        // 1000 / 1.1^5 = 620.921...
        let bond = BondSpec::new(1000.0, 0.0, 620.921_323, 5.0, 1);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.annual_yield, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_price_above_cash_flows_is_not_converged() {
        // No non-negative yield can price a zero coupon bond above face
        let bond = BondSpec::new(1000.0, 0.0, 5000.0, 10.0, 2);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert!(!result.converged());
        assert_eq!(result.termination, Termination::OutOfBounds);
        assert!(result.residual.abs() > 1.0);
    }

    #[test]
    fn test_tight_iteration_cap_is_flagged() {
        let bond = BondSpec::new(1000.0, 0.02, 400.0, 30.0, 2);
        let result = YieldSolver::new()
            .with_max_iterations(1)
            .with_seed_retries(1)
            .with_tolerance(1e-12)
            .solve(&bond)
            .unwrap();

        assert!(!result.converged());
    }

    #[test]
    fn test_converged_yield_reprices_within_tolerance() {
        let bond = BondSpec::new(1000.0, 0.02, 400.0, 30.0, 2);

        for max_iterations in 1..=30 {
            let result = YieldSolver::new()
                .with_max_iterations(max_iterations)
                .with_seed_retries(1)
                .solve(&bond)
                .unwrap();

            if result.converged() {
                assert!(result.residual.abs() < DEFAULT_PRICE_TOLERANCE);
                assert!((bond.price_at(result.periodic_yield) - 400.0).abs() < DEFAULT_PRICE_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let bond = BondSpec::new(1000.0, 0.06, 980.0, 7.0, 2);
        let r = 0.031;
        let h = 1e-6;
        let numeric = (bond.price_at(r + h) - bond.price_at(r - h)) / (2.0 * h);

        assert_relative_eq!(bond.price_derivative_at(r), numeric, max_relative = 1e-5);
    }

    #[test]
    fn test_invalid_bonds_rejected() {
        let solver = YieldSolver::new();
        assert!(solver.solve(&BondSpec::new(1000.0, 0.05, 0.0, 10.0, 2)).is_err());
        assert!(solver.solve(&BondSpec::new(0.0, 0.05, 900.0, 10.0, 2)).is_err());
        assert!(solver.solve(&BondSpec::new(1000.0, 0.05, 900.0, 0.1, 1)).is_err());
        assert!(solver.solve(&BondSpec::new(1000.0, 0.05, 900.0, 10.0, 0)).is_err());
    }

    #[test]
    fn test_effective_annual_yield() {
        let bond = BondSpec::new(100.0, 0.08, 100.0, 3.0, 2);
        let result = YieldSolver::new().solve(&bond).unwrap();

        assert_relative_eq!(result.effective_annual_yield(2), 0.0816, epsilon = 1e-6);
    }
}
