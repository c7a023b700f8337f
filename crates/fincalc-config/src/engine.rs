//! Engine configuration types.
//!
//! Solver tolerances, payoff ceilings and the reference year used by
//! date-bounded variables. Every field has a serde default, so an empty
//! file is a valid configuration.

use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use fincalc_math::YieldSolver;

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// SOLVER SETTINGS
// =============================================================================

/// Settings for the yield-to-maturity solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Price tolerance for convergence.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration ceiling per attempt.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Number of Newton attempts with distinct seeds.
    #[serde(default = "default_max_seed_retries")]
    pub max_seed_retries: u32,

    /// Lower bound of the periodic yield.
    #[serde(default = "default_min_periodic_yield")]
    pub min_periodic_yield: f64,

    /// Upper bound of the periodic yield.
    #[serde(default = "default_max_periodic_yield")]
    pub max_periodic_yield: f64,
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_max_iterations() -> u32 {
    100
}

fn default_max_seed_retries() -> u32 {
    3
}

fn default_min_periodic_yield() -> f64 {
    0.0
}

fn default_max_periodic_yield() -> f64 {
    1.0
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            max_seed_retries: default_max_seed_retries(),
            min_periodic_yield: default_min_periodic_yield(),
            max_periodic_yield: default_max_periodic_yield(),
        }
    }
}

impl SolverSettings {
    /// A yield solver configured with these settings.
    #[must_use]
    pub fn yield_solver(&self) -> YieldSolver {
        YieldSolver::new()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
            .with_seed_retries(self.max_seed_retries)
            .with_bounds(self.min_periodic_yield, self.max_periodic_yield)
    }
}

impl Validate for SolverSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance <= 1.0) {
            errors.push(ValidationError::with_rule(
                "solver.tolerance",
                "Tolerance must be between 0 and 1",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "solver.max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        if self.max_seed_retries == 0 || self.max_seed_retries > 10 {
            errors.push(ValidationError::with_rule(
                "solver.max_seed_retries",
                "Seed retries must be between 1 and 10",
                "valid_retries",
            ));
        }

        if !(self.min_periodic_yield.is_finite()
            && self.max_periodic_yield.is_finite()
            && self.min_periodic_yield > -1.0
            && self.min_periodic_yield < self.max_periodic_yield)
        {
            errors.push(ValidationError::with_rule(
                "solver.min_periodic_yield",
                format!(
                    "Yield domain [{}, {}] must be finite, above -1 and non-empty",
                    self.min_periodic_yield, self.max_periodic_yield
                ),
                "valid_domain",
            ));
        }

        errors
    }
}

// =============================================================================
// PAYOFF SETTINGS
// =============================================================================

/// Period ceilings for payoff simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSettings {
    /// Ceiling for general debt payoff, in years.
    #[serde(default = "default_debt_max_years")]
    pub debt_max_years: u32,

    /// Ceiling for credit card payoff, in years.
    #[serde(default = "default_credit_card_max_years")]
    pub credit_card_max_years: u32,
}

fn default_debt_max_years() -> u32 {
    50
}

fn default_credit_card_max_years() -> u32 {
    30
}

impl Default for PayoffSettings {
    fn default() -> Self {
        Self {
            debt_max_years: default_debt_max_years(),
            credit_card_max_years: default_credit_card_max_years(),
        }
    }
}

impl Validate for PayoffSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, years) in [
            ("payoff.debt_max_years", self.debt_max_years),
            ("payoff.credit_card_max_years", self.credit_card_max_years),
        ] {
            if years == 0 || years > 100 {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("Ceiling of {years} years must be between 1 and 100"),
                    "valid_ceiling",
                ));
            }
        }

        errors
    }
}

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Configuration of the formula engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reference year for date-bounded variables. Left unset, it must be
    /// resolved with [`EngineConfig::resolve_current_year`] before the
    /// formula catalog can be built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,

    /// Yield solver settings.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Payoff ceilings.
    #[serde(default)]
    pub payoff: PayoffSettings,
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the reference year.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    /// Sets the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the payoff settings.
    #[must_use]
    pub fn with_payoff(mut self, payoff: PayoffSettings) -> Self {
        self.payoff = payoff;
        self
    }

    /// Fills an unset reference year from the local clock.
    #[must_use]
    pub fn resolve_current_year(self) -> Self {
        match self.current_year {
            Some(_) => self,
            None => self.with_current_year(chrono::Local::now().year()),
        }
    }

    /// The pinned reference year, if any. Never reads the clock.
    #[must_use]
    pub fn current_year(&self) -> Option<i32> {
        self.current_year
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialization`] for malformed input.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialization`] for malformed input.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialization`] if TOML cannot represent a value.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads and validates a configuration file, choosing the format by
    /// extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns an I/O, format, parse or validation error.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&content)?;
        config.validate_or_error()?;
        Ok(config)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.solver.validate();
        errors.extend(self.payoff.validate());

        if let Some(year) = self.current_year {
            if !(1900..=2200).contains(&year) {
                errors.push(ValidationError::with_rule(
                    "current_year",
                    format!("Year {year} must be between 1900 and 2200"),
                    "valid_year",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.solver.tolerance, 1e-4);
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.solver.max_seed_retries, 3);
        assert_eq!(config.payoff.debt_max_years, 50);
        assert_eq!(config.payoff.credit_card_max_years, 30);
        assert!(config.current_year.is_none());
        assert!(config.is_valid());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            current_year = 2030

            [solver]
            max_iterations = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.current_year, Some(2030));
        assert_eq!(config.solver.max_iterations, 50);
        assert_eq!(config.solver.tolerance, 1e-4);
        assert_eq!(config.payoff, PayoffSettings::default());
    }

    #[test]
    fn test_json() {
        let config =
            EngineConfig::from_json_str(r#"{"payoff": {"credit_card_max_years": 40}}"#).unwrap();
        assert_eq!(config.payoff.credit_card_max_years, 40);
        assert_eq!(config.payoff.debt_max_years, 50);

        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(ConfigError::Deserialization(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default().with_current_year(2026);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_validation_collects_errors() {
        let config = EngineConfig {
            solver: SolverSettings {
                tolerance: 0.0,
                max_iterations: 0,
                ..SolverSettings::default()
            },
            payoff: PayoffSettings {
                debt_max_years: 0,
                ..PayoffSettings::default()
            },
            current_year: Some(1200),
        };

        let errors = config.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "solver.tolerance",
                "solver.max_iterations",
                "payoff.debt_max_years",
                "current_year"
            ]
        );
        assert!(matches!(
            config.validate_or_error(),
            Err(ConfigError::MultipleValidationErrors(_))
        ));
    }

    #[test]
    fn test_invalid_domain() {
        let settings = SolverSettings {
            min_periodic_yield: 0.5,
            max_periodic_yield: 0.1,
            ..SolverSettings::default()
        };
        assert_eq!(settings.validate().len(), 1);
    }

    #[test]
    fn test_current_year_resolution() {
        assert_eq!(EngineConfig::new().with_current_year(2024).current_year(), Some(2024));
        assert_eq!(EngineConfig::new().current_year(), None);
        assert_eq!(
            EngineConfig::new().with_current_year(2024).resolve_current_year().current_year,
            Some(2024)
        );
        assert!(EngineConfig::new().resolve_current_year().current_year.is_some());
    }

    #[test]
    fn test_yield_solver_from_settings() {
        let solver = SolverSettings::default().yield_solver();
        let bond = fincalc_math::BondSpec::new(1000.0, 0.05, 1000.0, 10.0, 2);
        let result = solver.solve(&bond).unwrap();
        assert!(result.converged());
        assert!((result.annual_yield - 0.05).abs() < 1e-6);
    }
}
