//! Level payments, amortization schedules and payoff simulation.
//!
//! Two shapes of the same period loop live here:
//!
//! - [`amortize`] builds a fully amortizing schedule for a fixed-rate loan
//!   over a known number of periods.
//! - [`simulate_payoff`] runs a balance down under a payment policy until it
//!   reaches zero or a hard period ceiling. Hitting the ceiling is reported
//!   as [`PayoffStatus::NotAchieved`], never as a payoff.
//!
//! # Example
//!
//! ```rust
//! use fincalc_math::amortization::{simulate_payoff, PaymentPolicy, PayoffParams};
//!
//! let params = PayoffParams::new(5000.0, 0.18, PaymentPolicy::Fixed(200.0))
//!     .with_extra_payment(50.0);
//! let schedule = simulate_payoff(&params).unwrap();
//!
//! assert!(schedule.is_paid_off());
//! assert!(schedule.periods() < 30);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Balances below this fraction of the opening balance count as paid off.
const BALANCE_EPSILON: f64 = 1e-9;

/// Default payoff ceiling: 50 years of monthly periods.
pub const DEFAULT_MAX_PERIODS: u32 = 600;

/// Closed-form level payment that amortizes `principal` over `periods`.
///
/// A zero rate spreads the principal evenly.
///
/// ```rust
/// use fincalc_math::amortization::level_payment;
///
/// let payment = level_payment(200_000.0, 0.06 / 12.0, 360).unwrap();
/// assert!((payment - 1199.10).abs() < 0.01);
/// ```
pub fn level_payment(principal: f64, periodic_rate: f64, periods: u32) -> MathResult<f64> {
    if periods == 0 {
        return Err(MathError::invalid_input("number of periods must be positive"));
    }
    if !principal.is_finite() || principal < 0.0 {
        return Err(MathError::invalid_input("principal cannot be negative"));
    }
    if !periodic_rate.is_finite() || periodic_rate <= -1.0 {
        return Err(MathError::invalid_input("periodic rate must be above -100%"));
    }

    let n = f64::from(periods);
    if periodic_rate.abs() < 1e-12 {
        return Ok(principal / n);
    }
    Ok(principal * periodic_rate / (1.0 - (1.0 + periodic_rate).powf(-n)))
}

/// One period of an amortization or payoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// 1-based period number.
    pub period: u32,
    /// Total paid this period.
    pub payment: f64,
    /// Portion of the payment that reduced the balance.
    pub principal: f64,
    /// Interest charged this period.
    pub interest: f64,
    /// Balance after the payment.
    pub balance: f64,
}

/// How the scheduled payment is determined each period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPolicy {
    /// The same amount every period.
    Fixed(f64),
    /// A fraction of the opening balance, never less than `floor`.
    PercentOfBalance {
        /// Fraction of the balance (0.02 = 2%).
        percent: f64,
        /// Minimum payment.
        floor: f64,
    },
}

impl PaymentPolicy {
    /// Scheduled payment for a period that opens at `balance`.
    #[must_use]
    pub fn scheduled(&self, balance: f64) -> f64 {
        match *self {
            Self::Fixed(amount) => amount,
            Self::PercentOfBalance { percent, floor } => (balance * percent).max(floor),
        }
    }

    fn validate(&self) -> MathResult<()> {
        let ok = match *self {
            Self::Fixed(amount) => amount.is_finite() && amount >= 0.0,
            Self::PercentOfBalance { percent, floor } => {
                percent.is_finite() && percent >= 0.0 && floor.is_finite() && floor >= 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(MathError::invalid_input("payment amounts cannot be negative"))
        }
    }
}

/// Inputs to a payoff simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffParams {
    /// Opening balance.
    pub balance: f64,
    /// Nominal annual interest rate as a decimal.
    pub annual_rate: f64,
    /// Compounding and payment periods per year.
    pub periods_per_year: u32,
    /// Scheduled payment policy.
    pub policy: PaymentPolicy,
    /// Extra amount paid on top of the scheduled payment each period.
    pub extra_payment: f64,
    /// Hard ceiling on simulated periods.
    pub max_periods: u32,
}

impl PayoffParams {
    /// Creates monthly payoff parameters with no extra payment.
    #[must_use]
    pub fn new(balance: f64, annual_rate: f64, policy: PaymentPolicy) -> Self {
        Self {
            balance,
            annual_rate,
            periods_per_year: 12,
            policy,
            extra_payment: 0.0,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }

    /// Sets the extra payment per period.
    #[must_use]
    pub fn with_extra_payment(mut self, extra: f64) -> Self {
        self.extra_payment = extra;
        self
    }

    /// Sets the number of periods per year.
    #[must_use]
    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Sets the period ceiling.
    #[must_use]
    pub fn with_max_periods(mut self, max_periods: u32) -> Self {
        self.max_periods = max_periods;
        self
    }

    /// Sets the period ceiling from a number of years.
    #[must_use]
    pub fn with_max_years(self, years: u32) -> Self {
        let periods = years.saturating_mul(self.periods_per_year);
        self.with_max_periods(periods)
    }

    /// Interest rate per period.
    #[must_use]
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate / f64::from(self.periods_per_year)
    }

    fn validate(&self) -> MathResult<()> {
        if !self.balance.is_finite() || self.balance < 0.0 {
            return Err(MathError::invalid_input("balance cannot be negative"));
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(MathError::invalid_input("interest rate cannot be negative"));
        }
        if self.periods_per_year == 0 {
            return Err(MathError::invalid_input("periods per year must be positive"));
        }
        if self.max_periods == 0 {
            return Err(MathError::invalid_input("period ceiling must be positive"));
        }
        if !self.extra_payment.is_finite() || self.extra_payment < 0.0 {
            return Err(MathError::invalid_input("extra payment cannot be negative"));
        }
        self.policy.validate()
    }
}

/// Whether a simulated balance was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffStatus {
    /// Balance reached zero.
    PaidOff,
    /// The ceiling was reached, or the balance stopped falling, first.
    NotAchieved {
        /// Balance left when the loop stopped.
        remaining_balance: f64,
    },
}

/// A completed schedule with running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSchedule {
    /// Opening balance.
    pub initial_balance: f64,
    /// Period-by-period rows.
    pub rows: Vec<PeriodRow>,
    /// Interest paid over the schedule.
    pub total_interest: f64,
    /// Total amount paid over the schedule.
    pub total_paid: f64,
    /// Period ceiling the schedule ran under.
    pub max_periods: u32,
    /// Payoff status.
    pub status: PayoffStatus,
}

impl PayoffSchedule {
    /// Number of periods simulated.
    #[must_use]
    pub fn periods(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Returns true when the balance reached zero.
    #[must_use]
    pub fn is_paid_off(&self) -> bool {
        matches!(self.status, PayoffStatus::PaidOff)
    }

    /// Sum of the principal column.
    #[must_use]
    pub fn total_principal(&self) -> f64 {
        self.rows.iter().map(|r| r.principal).sum()
    }

    /// The first scheduled payment, if any.
    #[must_use]
    pub fn first_payment(&self) -> Option<f64> {
        self.rows.first().map(|r| r.payment)
    }

    /// Converts an unpaid schedule into an error.
    ///
    /// The error reports `max_periods`, the ceiling, even when the loop
    /// stopped early because a payment failed to reduce the balance; use
    /// [`PayoffSchedule::periods`] for the simulated count.
    pub fn require_paid_off(self) -> MathResult<Self> {
        match self.status {
            PayoffStatus::PaidOff => Ok(self),
            PayoffStatus::NotAchieved { remaining_balance } => Err(
                MathError::payoff_not_achieved(self.max_periods, remaining_balance),
            ),
        }
    }
}

/// Runs a balance down period by period.
///
/// Each period charges interest on the opening balance, then applies the
/// scheduled payment plus the extra payment, capped at the balance plus
/// interest so that principal never exceeds what is owed. The loop stops when
/// the balance reaches zero, when the ceiling is reached, or as soon as a
/// period fails to reduce the balance (it never will afterwards).
pub fn simulate_payoff(params: &PayoffParams) -> MathResult<PayoffSchedule> {
    params.validate()?;

    let rate = params.periodic_rate();
    let epsilon = BALANCE_EPSILON * params.balance.max(1.0);

    let mut balance = params.balance;
    let mut rows = Vec::new();
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;

    while balance > epsilon && (rows.len() as u32) < params.max_periods {
        let interest = balance * rate;
        let owed = balance + interest;
        let payment = (params.policy.scheduled(balance) + params.extra_payment).min(owed);
        let principal = payment - interest;

        balance = owed - payment;
        if balance <= epsilon {
            balance = 0.0;
        }
        total_interest += interest;
        total_paid += payment;

        rows.push(PeriodRow {
            period: rows.len() as u32 + 1,
            payment,
            principal,
            interest,
            balance,
        });

        if principal <= 0.0 {
            log::debug!(
                "Payoff stalled in period {}: payment {:.2} does not cover interest {:.2}",
                rows.len(),
                payment,
                interest
            );
            break;
        }
    }

    let status = if balance <= epsilon {
        PayoffStatus::PaidOff
    } else {
        PayoffStatus::NotAchieved {
            remaining_balance: balance,
        }
    };

    Ok(PayoffSchedule {
        initial_balance: params.balance,
        rows,
        total_interest,
        total_paid,
        max_periods: params.max_periods,
        status,
    })
}

/// Builds a fully amortizing fixed-rate schedule.
///
/// Every period pays the level payment; the final period pays exactly the
/// remaining balance so that principal sums to the loan amount.
pub fn amortize(
    principal: f64,
    annual_rate: f64,
    periods_per_year: u32,
    periods: u32,
) -> MathResult<PayoffSchedule> {
    if periods_per_year == 0 {
        return Err(MathError::invalid_input("periods per year must be positive"));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(MathError::invalid_input("interest rate cannot be negative"));
    }
    let rate = annual_rate / f64::from(periods_per_year);
    let payment = level_payment(principal, rate, periods)?;

    let mut balance = principal;
    let mut rows = Vec::with_capacity(periods as usize);
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;

    for period in 1..=periods {
        let interest = balance * rate;
        let principal_part = if period == periods {
            balance
        } else {
            (payment - interest).min(balance)
        };
        let paid = principal_part + interest;
        balance -= principal_part;
        total_interest += interest;
        total_paid += paid;

        rows.push(PeriodRow {
            period,
            payment: paid,
            principal: principal_part,
            interest,
            balance,
        });
    }

    Ok(PayoffSchedule {
        initial_balance: principal,
        rows,
        total_interest,
        total_paid,
        max_periods: periods,
        status: PayoffStatus::PaidOff,
    })
}

/// Two independent payoff runs: without and with the extra payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffComparison {
    /// Run with the scheduled payment only.
    pub baseline: PayoffSchedule,
    /// Run with the extra payment applied.
    pub accelerated: PayoffSchedule,
}

impl PayoffComparison {
    /// Periods saved by the extra payment, when both runs paid off.
    #[must_use]
    pub fn periods_saved(&self) -> Option<u32> {
        (self.baseline.is_paid_off() && self.accelerated.is_paid_off())
            .then(|| self.baseline.periods().saturating_sub(self.accelerated.periods()))
    }

    /// Interest saved by the extra payment, when both runs paid off.
    #[must_use]
    pub fn interest_saved(&self) -> Option<f64> {
        (self.baseline.is_paid_off() && self.accelerated.is_paid_off())
            .then(|| self.baseline.total_interest - self.accelerated.total_interest)
    }
}

/// Runs [`simulate_payoff`] with and without `params.extra_payment`.
pub fn compare_payoff(params: &PayoffParams) -> MathResult<PayoffComparison> {
    let baseline = simulate_payoff(&params.with_extra_payment(0.0))?;
    let accelerated = simulate_payoff(params)?;
    Ok(PayoffComparison {
        baseline,
        accelerated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_level_payment_mortgage() {
        let payment = level_payment(200_000.0, 0.06 / 12.0, 360).unwrap();
        assert_relative_eq!(payment, 1199.101, epsilon = 1e-3);
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let payment = level_payment(12_000.0, 0.0, 24).unwrap();
        assert_relative_eq!(payment, 500.0);
    }

    #[test]
    fn test_level_payment_rejects_zero_periods() {
        assert!(level_payment(1000.0, 0.01, 0).is_err());
    }

    #[test]
    fn test_amortize_conserves_principal() {
        let schedule = amortize(250_000.0, 0.065, 12, 360).unwrap();

        assert_eq!(schedule.periods(), 360);
        assert!(schedule.is_paid_off());
        assert_relative_eq!(schedule.total_principal(), 250_000.0, max_relative = 1e-10);

        let paid: f64 = schedule.rows.iter().map(|r| r.payment).sum();
        assert_relative_eq!(
            schedule.total_principal() + schedule.total_interest,
            paid,
            max_relative = 1e-10
        );
        assert_relative_eq!(schedule.rows.last().unwrap().balance, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_amortize_interest_front_loaded() {
        let schedule = amortize(100_000.0, 0.05, 12, 120).unwrap();
        let first = schedule.rows.first().unwrap();
        let last = schedule.rows.last().unwrap();

        assert!(first.interest > last.interest);
        assert!(first.principal < last.principal);
    }

    #[test]
    fn test_simulate_payoff_pays_off() {
        let params = PayoffParams::new(10_000.0, 0.12, PaymentPolicy::Fixed(500.0));
        let schedule = simulate_payoff(&params).unwrap();

        assert!(schedule.is_paid_off());
        assert_eq!(schedule.periods(), 23);
        assert_relative_eq!(schedule.total_principal(), 10_000.0, max_relative = 1e-9);

        // The last payment is trimmed to what was owed
        let last = schedule.rows.last().unwrap();
        assert!(last.payment < 500.0);
        assert_eq!(last.balance, 0.0);
    }

    #[test]
    fn test_payment_below_interest_is_not_achieved() {
        let params = PayoffParams::new(10_000.0, 0.24, PaymentPolicy::Fixed(150.0));
        let schedule = simulate_payoff(&params).unwrap();

        assert!(!schedule.is_paid_off());
        assert_eq!(schedule.periods(), 1);

        // The loop stops after one period, but the error names the ceiling
        let err = schedule.require_paid_off().unwrap_err();
        assert!(matches!(
            err,
            MathError::PayoffNotAchieved { periods: 600, .. }
        ));
        assert!(err.to_string().contains("600-period ceiling"));
    }

    #[test]
    fn test_ceiling_reached_is_not_achieved() {
        let params = PayoffParams::new(50_000.0, 0.05, PaymentPolicy::Fixed(250.0)).with_max_years(10);
        let schedule = simulate_payoff(&params).unwrap();

        assert_eq!(schedule.periods(), 120);
        match schedule.status {
            PayoffStatus::NotAchieved { remaining_balance } => assert!(remaining_balance > 0.0),
            PayoffStatus::PaidOff => panic!("expected the ceiling to be hit"),
        }
    }

    #[test]
    fn test_percent_of_balance_policy() {
        let policy = PaymentPolicy::PercentOfBalance {
            percent: 0.03,
            floor: 25.0,
        };
        let params = PayoffParams::new(3000.0, 0.20, policy).with_max_years(30);
        let schedule = simulate_payoff(&params).unwrap();

        assert!(schedule.is_paid_off());
        assert_relative_eq!(schedule.first_payment().unwrap(), 90.0);
        // Once the balance is small the floor applies
        assert!(schedule.rows.iter().any(|r| (r.payment - 25.0).abs() < 1e-9));
    }

    #[test]
    fn test_zero_balance_is_trivially_paid_off() {
        let params = PayoffParams::new(0.0, 0.1, PaymentPolicy::Fixed(100.0));
        let schedule = simulate_payoff(&params).unwrap();

        assert!(schedule.is_paid_off());
        assert_eq!(schedule.periods(), 0);
    }

    #[test]
    fn test_compare_payoff_savings() {
        let params =
            PayoffParams::new(8000.0, 0.18, PaymentPolicy::Fixed(200.0)).with_extra_payment(100.0);
        let comparison = compare_payoff(&params).unwrap();

        assert!(comparison.periods_saved().unwrap() > 0);
        assert!(comparison.interest_saved().unwrap() > 0.0);
        assert_eq!(comparison.baseline.rows[0].payment, 200.0);
        assert_eq!(comparison.accelerated.rows[0].payment, 300.0);
    }

    #[test]
    fn test_invalid_params() {
        let params = PayoffParams::new(-1.0, 0.1, PaymentPolicy::Fixed(100.0));
        assert!(simulate_payoff(&params).is_err());

        let params = PayoffParams::new(100.0, 0.1, PaymentPolicy::Fixed(-5.0));
        assert!(simulate_payoff(&params).is_err());
    }
}
