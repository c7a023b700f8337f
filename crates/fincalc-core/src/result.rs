//! Formula results.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    /// A numeric output.
    Number(f64),
    /// A category label.
    Text(String),
}

impl ResultValue {
    /// The number, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(n) => Some(*n),
            ResultValue::Text(_) => None,
        }
    }

    /// The text, if this is a label.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Number(_) => None,
            ResultValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => write!(f, "{n}"),
            ResultValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        ResultValue::Number(value)
    }
}

impl From<u32> for ResultValue {
    fn from(value: u32) -> Self {
        ResultValue::Number(f64::from(value))
    }
}

impl From<bool> for ResultValue {
    fn from(value: bool) -> Self {
        ResultValue::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        ResultValue::Text(value.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        ResultValue::Text(value)
    }
}

/// A caveat attached to an accepted result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An iterative solver stopped before reaching its tolerance; the
    /// reported value is a best estimate.
    SolverNonConvergence {
        /// Iterations spent.
        iterations: u32,
        /// Residual at the reported estimate.
        residual: f64,
    },
    /// A comparison baseline did not pay off within its ceiling.
    BaselineNotPaidOff {
        /// Period ceiling.
        periods: u32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SolverNonConvergence {
                iterations,
                residual,
            } => write!(
                f,
                "Solver did not converge after {iterations} iterations (residual {residual:.6}); value is an estimate"
            ),
            Diagnostic::BaselineNotPaidOff { periods } => {
                write!(f, "Baseline is not paid off within {periods} periods")
            }
        }
    }
}

/// The output of a calculate function.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormulaResult {
    values: BTreeMap<String, ResultValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

impl FormulaResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ResultValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a diagnostic, builder style.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ResultValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Adds a diagnostic.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The value for `key`.
    pub fn get(&self, key: &str) -> Option<&ResultValue> {
        self.values.get(key)
    }

    /// The numeric value for `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ResultValue::as_number)
    }

    /// The text value for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ResultValue::as_text)
    }

    /// Diagnostics attached to the result.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the result has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first key holding a NaN or infinite number.
    pub fn non_finite_key(&self) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, v)| v.as_number().is_some_and(|n| !n.is_finite()))
            .map(|(k, _)| k.as_str())
    }
}

// =============================================================================
// FORMATTING HELPERS
// =============================================================================

/// Formats a money amount as `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let sign = if value <= -0.005 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a value already in percent units as `12.34%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats a whole number with thousands separators.
pub fn format_count(value: f64) -> String {
    let sign = if value <= -0.5 { "-" } else { "" };
    format!("{sign}{}", group_thousands(&format!("{:.0}", value.abs())))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let result = FormulaResult::new()
            .with("roi", 50.0)
            .with("category", "Low Risk")
            .with("converged", true);

        assert_eq!(result.number("roi"), Some(50.0));
        assert_eq!(result.text("category"), Some("Low Risk"));
        assert_eq!(result.number("converged"), Some(1.0));
        assert_eq!(result.number("category"), None);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_non_finite_key() {
        let result = FormulaResult::new().with("a", 1.0).with("b", f64::NAN);
        assert_eq!(result.non_finite_key(), Some("b"));
        assert_eq!(FormulaResult::new().with("a", 1.0).non_finite_key(), None);
    }

    #[test]
    fn test_serialize() {
        let result = FormulaResult::new()
            .with("ytm", 5.0)
            .with_diagnostic(Diagnostic::SolverNonConvergence {
                iterations: 100,
                residual: 0.5,
            });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["values"]["ytm"], 5.0);
        assert_eq!(json["diagnostics"][0]["type"], "solver_non_convergence");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-42.5), "-$42.50");
    }

    #[test]
    fn test_format_percent_and_count() {
        assert_eq!(format_percent(5.0), "5.00%");
        assert_eq!(format_count(360.0), "360");
        assert_eq!(format_count(12_000.0), "12,000");
    }
}
