//! Variable schemas.
//!
//! A [`VariableSchema`] describes one input field of a calculator: its type,
//! default, inclusive bounds, optional gate and optional cross-field
//! validator. A [`VariableSet`] is the ordered, checked collection of a
//! formula's variables.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{ContractError, ContractResult};
use crate::input::Inputs;

/// Cross-field validator: receives the interpreted value and every
/// interpretable input (defaults filled in) and returns the accepted value
/// or a user-facing message.
pub type ValidatorFn = Arc<dyn Fn(f64, &Inputs) -> Result<f64, String> + Send + Sync>;

const EQUALS_EPSILON: f64 = 1e-9;

// =============================================================================
// KINDS
// =============================================================================

/// One selectable option of an enum variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumOption {
    /// Numeric value submitted for this option.
    pub value: f64,
    /// Display label.
    pub label: String,
}

impl EnumOption {
    /// Creates an option.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// The type of a variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariableKind {
    /// A money amount.
    Currency,
    /// A percentage, expressed in percent units (5 means 5%).
    Percentage,
    /// A whole number.
    Count,
    /// A yes/no toggle stored as 1 or 0.
    Boolean,
    /// One of a fixed list of options.
    Enum {
        /// Available options, in display order.
        options: Vec<EnumOption>,
    },
}

impl VariableKind {
    /// Short lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Currency => "currency",
            VariableKind::Percentage => "percentage",
            VariableKind::Count => "count",
            VariableKind::Boolean => "boolean",
            VariableKind::Enum { .. } => "enum",
        }
    }

    /// The option with the given value, for enum kinds.
    pub fn option(&self, value: f64) -> Option<&EnumOption> {
        match self {
            VariableKind::Enum { options } => options
                .iter()
                .find(|o| (o.value - value).abs() < EQUALS_EPSILON),
            _ => None,
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// GATING
// =============================================================================

/// When a gate is open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum GateCondition {
    /// The gating value is non-zero.
    Truthy,
    /// The gating value equals the given value.
    Equals(f64),
}

impl GateCondition {
    /// True if the gate is open for `value`.
    pub fn is_open(self, value: f64) -> bool {
        match self {
            GateCondition::Truthy => value != 0.0,
            GateCondition::Equals(expected) => (value - expected).abs() < EQUALS_EPSILON,
        }
    }
}

/// A dependency on another variable of the same formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gate {
    /// Key of the gating variable.
    pub key: String,
    /// Condition on the gating value.
    pub condition: GateCondition,
}

// =============================================================================
// VARIABLE SCHEMA
// =============================================================================

/// Description of one input field.
#[derive(Clone, Serialize)]
pub struct VariableSchema {
    /// Unique key within the formula.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Optional help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Type of the value.
    pub kind: VariableKind,
    /// Default value.
    pub default: f64,
    /// Inclusive minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive maximum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// UI granularity hint; not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Gate that decides whether the variable is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Gate>,
    #[serde(skip)]
    validator: Option<ValidatorFn>,
}

impl VariableSchema {
    /// Creates a variable of the given kind. The label defaults to the key.
    pub fn new(key: impl Into<String>, kind: VariableKind, default: f64) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            help: None,
            kind,
            default,
            min: None,
            max: None,
            step: None,
            depends_on: None,
            validator: None,
        }
    }

    /// A money amount.
    pub fn currency(key: impl Into<String>, default: f64) -> Self {
        Self::new(key, VariableKind::Currency, default)
    }

    /// A percentage in percent units.
    pub fn percentage(key: impl Into<String>, default: f64) -> Self {
        Self::new(key, VariableKind::Percentage, default)
    }

    /// A whole number.
    pub fn count(key: impl Into<String>, default: u32) -> Self {
        Self::new(key, VariableKind::Count, f64::from(default))
    }

    /// A yes/no toggle.
    pub fn boolean(key: impl Into<String>, default: bool) -> Self {
        Self::new(key, VariableKind::Boolean, if default { 1.0 } else { 0.0 })
    }

    /// One of a fixed list of options.
    pub fn choice(key: impl Into<String>, options: Vec<EnumOption>, default: f64) -> Self {
        Self::new(key, VariableKind::Enum { options }, default)
    }

    /// Sets the display label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the inclusive minimum.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive maximum.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets both bounds.
    #[must_use]
    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    /// Sets the step hint.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Activates the variable only while `key` is truthy.
    #[must_use]
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.depends_on = Some(Gate {
            key: key.into(),
            condition: GateCondition::Truthy,
        });
        self
    }

    /// Activates the variable only while `key` equals `value`.
    #[must_use]
    pub fn depends_on_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.depends_on = Some(Gate {
            key: key.into(),
            condition: GateCondition::Equals(value),
        });
        self
    }

    /// Attaches a cross-field validator.
    #[must_use]
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, &Inputs) -> Result<f64, String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    /// The cross-field validator, if any.
    pub fn custom_validator(&self) -> Option<&ValidatorFn> {
        self.validator.as_ref()
    }

    /// Checks the variable's own invariants.
    pub fn check_definition(&self) -> ContractResult<()> {
        if self.key.is_empty() {
            return Err(ContractError::EmptyKey);
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ContractError::InvalidBounds {
                    key: self.key.clone(),
                    min,
                    max,
                });
            }
        }

        if !self.default.is_finite() {
            return Err(self.invalid_default("default must be finite"));
        }

        let below = self.min.is_some_and(|min| self.default < min);
        let above = self.max.is_some_and(|max| self.default > max);
        if below || above {
            return Err(ContractError::DefaultOutOfRange {
                key: self.key.clone(),
                default: self.default,
            });
        }

        match &self.kind {
            VariableKind::Count if self.default.fract() != 0.0 => {
                Err(self.invalid_default("count default must be a whole number"))
            }
            VariableKind::Boolean if self.default != 0.0 && self.default != 1.0 => {
                Err(self.invalid_default("boolean default must be 0 or 1"))
            }
            VariableKind::Enum { options } if options.is_empty() => {
                Err(ContractError::EmptyOptions {
                    key: self.key.clone(),
                })
            }
            VariableKind::Enum { .. } if self.kind.option(self.default).is_none() => {
                Err(self.invalid_default("enum default must be one of the options"))
            }
            _ => Ok(()),
        }
    }

    fn invalid_default(&self, reason: &str) -> ContractError {
        ContractError::InvalidDefault {
            key: self.key.clone(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Debug for VariableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableSchema")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("depends_on", &self.depends_on)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

// =============================================================================
// VARIABLE SET
// =============================================================================

/// Ordered, checked variables of one formula.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct VariableSet {
    variables: Vec<VariableSchema>,
}

impl VariableSet {
    /// Builds a set, checking every variable and the gating graph.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContractError`] found: an invalid variable, a
    /// duplicate key, a gate naming an unknown key or the variable itself,
    /// or a gating cycle.
    pub fn new(variables: Vec<VariableSchema>) -> ContractResult<Self> {
        let mut seen = HashSet::new();
        for var in &variables {
            var.check_definition()?;
            if !seen.insert(var.key.as_str()) {
                return Err(ContractError::DuplicateVariable {
                    key: var.key.clone(),
                });
            }
        }

        for var in &variables {
            if let Some(gate) = &var.depends_on {
                if gate.key == var.key || !seen.contains(gate.key.as_str()) {
                    return Err(ContractError::UnknownGate {
                        key: var.key.clone(),
                        depends_on: gate.key.clone(),
                    });
                }
            }
        }

        let set = Self { variables };
        set.check_acyclic()?;
        Ok(set)
    }

    // Each variable has at most one gate, so a chain longer than the set
    // must revisit a key.
    fn check_acyclic(&self) -> ContractResult<()> {
        for var in &self.variables {
            let mut current = var;
            let mut steps = 0;
            while let Some(gate) = &current.depends_on {
                steps += 1;
                if steps > self.variables.len() {
                    return Err(ContractError::GatingCycle {
                        key: var.key.clone(),
                    });
                }
                match self.get(&gate.key) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// Looks up a variable by key.
    pub fn get(&self, key: &str) -> Option<&VariableSchema> {
        self.variables.iter().find(|v| v.key == key)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, VariableSchema> {
        self.variables.iter()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.key.as_str())
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = &'a VariableSchema;
    type IntoIter = std::slice::Iter<'a, VariableSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let var = VariableSchema::currency("home_price", 300_000.0)
            .label("Home Price")
            .range(10_000.0, 10_000_000.0)
            .step(1_000.0);

        assert_eq!(var.key, "home_price");
        assert_eq!(var.label, "Home Price");
        assert_eq!(var.kind, VariableKind::Currency);
        assert_eq!(var.min, Some(10_000.0));
        assert_eq!(var.max, Some(10_000_000.0));
        assert!(var.check_definition().is_ok());
    }

    #[test]
    fn test_gate_conditions() {
        assert!(GateCondition::Truthy.is_open(1.0));
        assert!(!GateCondition::Truthy.is_open(0.0));
        assert!(GateCondition::Equals(2.0).is_open(2.0));
        assert!(!GateCondition::Equals(2.0).is_open(1.0));
    }

    #[test]
    fn test_invalid_bounds() {
        let var = VariableSchema::currency("x", 5.0).min(10.0).max(1.0);
        assert!(matches!(
            var.check_definition(),
            Err(ContractError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_default_out_of_range() {
        let var = VariableSchema::percentage("rate", 150.0).range(0.0, 100.0);
        assert_eq!(
            var.check_definition(),
            Err(ContractError::DefaultOutOfRange {
                key: "rate".into(),
                default: 150.0
            })
        );
    }

    #[test]
    fn test_kind_defaults() {
        let count = VariableSchema::new("years", VariableKind::Count, 2.5);
        assert!(matches!(
            count.check_definition(),
            Err(ContractError::InvalidDefault { .. })
        ));

        let flag = VariableSchema::new("flag", VariableKind::Boolean, 2.0);
        assert!(matches!(
            flag.check_definition(),
            Err(ContractError::InvalidDefault { .. })
        ));

        let empty = VariableSchema::choice("freq", vec![], 1.0);
        assert!(matches!(
            empty.check_definition(),
            Err(ContractError::EmptyOptions { .. })
        ));

        let options = vec![EnumOption::new(1.0, "Annual"), EnumOption::new(2.0, "Semiannual")];
        let bad = VariableSchema::choice("freq", options.clone(), 4.0);
        assert!(matches!(
            bad.check_definition(),
            Err(ContractError::InvalidDefault { .. })
        ));
        assert!(VariableSchema::choice("freq", options, 2.0)
            .check_definition()
            .is_ok());
    }

    #[test]
    fn test_empty_key() {
        let result = VariableSet::new(vec![VariableSchema::currency("", 0.0)]);
        assert_eq!(result.unwrap_err(), ContractError::EmptyKey);
    }

    #[test]
    fn test_duplicate_key() {
        let result = VariableSet::new(vec![
            VariableSchema::currency("a", 0.0),
            VariableSchema::currency("a", 1.0),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ContractError::DuplicateVariable { key: "a".into() }
        );
    }

    #[test]
    fn test_unknown_gate() {
        let result = VariableSet::new(vec![VariableSchema::currency("pmi", 0.0).depends_on("include_pmi")]);
        assert!(matches!(result, Err(ContractError::UnknownGate { .. })));

        let result = VariableSet::new(vec![VariableSchema::boolean("a", true).depends_on("a")]);
        assert!(matches!(result, Err(ContractError::UnknownGate { .. })));
    }

    #[test]
    fn test_gating_cycle() {
        let result = VariableSet::new(vec![
            VariableSchema::boolean("a", true).depends_on("c"),
            VariableSchema::boolean("b", true).depends_on("a"),
            VariableSchema::boolean("c", true).depends_on("b"),
        ]);
        assert!(matches!(result, Err(ContractError::GatingCycle { .. })));
    }

    #[test]
    fn test_gating_chain_is_accepted() {
        let set = VariableSet::new(vec![
            VariableSchema::boolean("a", true),
            VariableSchema::boolean("b", true).depends_on("a"),
            VariableSchema::currency("c", 0.0).depends_on("b"),
        ])
        .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(set.get("c").unwrap().depends_on.is_some());
    }

    #[test]
    fn test_debug_hides_validator() {
        let var = VariableSchema::currency("x", 0.0).validator(|v, _| Ok(v));
        let debug = format!("{var:?}");
        assert!(debug.contains("validator: true"));
        assert!(var.custom_validator().is_some());
    }
}
