//! The validation unit.
//!
//! Turns raw user input into checked numbers, one variable at a time, and
//! decides which variables are active under their gates.
//!
//! Checks for an active variable run in a fixed order: interpretation, kind,
//! custom validator, bounds. The first failing check produces the
//! variable's error.

use crate::error::{ValidationError, ValidationErrorKind};
use crate::input::{Inputs, RawInputs, RawValue};
use crate::schema::{VariableKind, VariableSchema, VariableSet};

/// Interprets a raw value as a finite number.
///
/// Text is trimmed and may carry thousands separators (`,` or `_`), a
/// leading `$` and a trailing `%`. `true`/`yes` and `false`/`no` map to
/// 1 and 0.
pub fn interpret(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) => n.is_finite().then_some(*n),
        RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawValue::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" => return Some(1.0),
        "false" | "no" => return Some(0.0),
        _ => {}
    }

    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let rest = rest.strip_suffix('%').unwrap_or(rest).trim();

    let cleaned: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() || cleaned.starts_with(['-', '+']) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Validates one active variable.
///
/// `all_inputs` is handed to the custom validator for cross-field checks.
///
/// # Errors
///
/// Returns the first failing check as a [`ValidationError`].
pub fn validate_variable(
    schema: &VariableSchema,
    raw: &RawValue,
    all_inputs: &Inputs,
) -> Result<f64, ValidationError> {
    let fail = |kind| ValidationError::new(&schema.key, &schema.label, kind);

    let mut value = interpret(raw).ok_or_else(|| {
        fail(ValidationErrorKind::NotANumber {
            raw: raw.to_string(),
        })
    })?;

    match &schema.kind {
        VariableKind::Count if value.fract() != 0.0 => {
            return Err(fail(ValidationErrorKind::NotAnInteger { value }));
        }
        VariableKind::Boolean if value != 0.0 && value != 1.0 => {
            return Err(fail(ValidationErrorKind::NotABoolean { value }));
        }
        VariableKind::Enum { .. } if schema.kind.option(value).is_none() => {
            return Err(fail(ValidationErrorKind::UnknownOption { value }));
        }
        _ => {}
    }

    if let Some(validator) = schema.custom_validator() {
        value = validator(value, all_inputs)
            .map_err(|message| fail(ValidationErrorKind::Custom { message }))?;
    }

    if let Some(min) = schema.min {
        if value < min {
            return Err(fail(ValidationErrorKind::BelowMinimum { min, value }));
        }
    }
    if let Some(max) = schema.max {
        if value > max {
            return Err(fail(ValidationErrorKind::AboveMaximum { max, value }));
        }
    }

    Ok(value)
}

/// Every interpretable submitted value, with defaults for missing keys.
///
/// Submitted values that cannot be interpreted are left out. Unknown keys
/// are ignored.
pub fn collect_all_inputs(variables: &VariableSet, raw_inputs: &RawInputs) -> Inputs {
    variables
        .iter()
        .filter_map(|var| {
            let value = match raw_inputs.get(&var.key) {
                Some(raw) => interpret(raw)?,
                None => var.default,
            };
            Some((var.key.clone(), value))
        })
        .collect()
}

/// True if the variable is active under its gate.
///
/// A gated variable is active when its gating variable is itself active
/// and the gating value satisfies the condition. An uninterpretable gating
/// value closes the gate.
pub fn is_active(variables: &VariableSet, schema: &VariableSchema, all_inputs: &Inputs) -> bool {
    let Some(gate) = &schema.depends_on else {
        return true;
    };
    let Some(gating) = variables.get(&gate.key) else {
        return false;
    };
    if !is_active(variables, gating, all_inputs) {
        return false;
    }
    all_inputs
        .get(&gate.key)
        .is_some_and(|value| gate.condition.is_open(value))
}

/// Validates one variable if it is active.
///
/// Returns `Ok(None)` for an inactive variable. A missing raw value takes
/// the variable's default.
///
/// # Errors
///
/// Returns the variable's [`ValidationError`] when it is active and
/// invalid.
pub fn check_variable(
    variables: &VariableSet,
    schema: &VariableSchema,
    raw_inputs: &RawInputs,
    all_inputs: &Inputs,
) -> Result<Option<f64>, ValidationError> {
    if !is_active(variables, schema, all_inputs) {
        return Ok(None);
    }

    let default = RawValue::Number(schema.default);
    let raw = raw_inputs.get(&schema.key).unwrap_or(&default);
    validate_variable(schema, raw, all_inputs).map(Some)
}

/// Validates every variable, collecting all errors.
///
/// # Errors
///
/// Returns every [`ValidationError`], in declaration order, if any
/// variable is invalid.
pub fn validate_inputs(
    variables: &VariableSet,
    raw_inputs: &RawInputs,
) -> Result<Inputs, Vec<ValidationError>> {
    let all_inputs = collect_all_inputs(variables, raw_inputs);
    let mut inputs = Inputs::new();
    let mut errors = Vec::new();

    for var in variables {
        match check_variable(variables, var, raw_inputs, &all_inputs) {
            Ok(Some(value)) => inputs.insert(var.key.clone(), value),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(inputs)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EnumOption;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_interpret_text() {
        assert_eq!(interpret(&text("1,250.50")), Some(1250.5));
        assert_eq!(interpret(&text(" $300_000 ")), Some(300_000.0));
        assert_eq!(interpret(&text("6.5%")), Some(6.5));
        assert_eq!(interpret(&text("-$12")), Some(-12.0));
        assert_eq!(interpret(&text("Yes")), Some(1.0));
        assert_eq!(interpret(&text("false")), Some(0.0));
        assert_eq!(interpret(&text("")), None);
        assert_eq!(interpret(&text("abc")), None);
        assert_eq!(interpret(&text("--5")), None);
        assert_eq!(interpret(&text("inf")), None);
        assert_eq!(interpret(&text("NaN")), None);
    }

    #[test]
    fn test_interpret_number_and_bool() {
        assert_eq!(interpret(&RawValue::Number(2.5)), Some(2.5));
        assert_eq!(interpret(&RawValue::Number(f64::NAN)), None);
        assert_eq!(interpret(&RawValue::Number(f64::INFINITY)), None);
        assert_eq!(interpret(&RawValue::Bool(true)), Some(1.0));
    }

    #[test]
    fn test_bounds_inclusive() {
        let var = VariableSchema::percentage("rate", 5.0).range(0.0, 30.0);
        let all = Inputs::new();

        assert_eq!(validate_variable(&var, &RawValue::Number(0.0), &all), Ok(0.0));
        assert_eq!(validate_variable(&var, &RawValue::Number(30.0), &all), Ok(30.0));

        let err = validate_variable(&var, &RawValue::Number(-1.0), &all).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::BelowMinimum { min: 0.0, value: -1.0 }
        );

        let err = validate_variable(&var, &RawValue::Number(31.0), &all).unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::AboveMaximum { max: 30.0, value: 31.0 }
        );
    }

    #[test]
    fn test_kind_checks() {
        let all = Inputs::new();

        let years = VariableSchema::count("years", 10);
        let err = validate_variable(&years, &RawValue::Number(2.5), &all).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotAnInteger { value: 2.5 });

        let flag = VariableSchema::boolean("flag", false);
        let err = validate_variable(&flag, &RawValue::Number(3.0), &all).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotABoolean { value: 3.0 });

        let freq = VariableSchema::choice(
            "freq",
            vec![EnumOption::new(1.0, "Annual"), EnumOption::new(12.0, "Monthly")],
            12.0,
        );
        let err = validate_variable(&freq, &RawValue::Number(4.0), &all).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownOption { value: 4.0 });
        assert_eq!(validate_variable(&freq, &text("1"), &all), Ok(1.0));
    }

    #[test]
    fn test_not_a_number() {
        let var = VariableSchema::currency("price", 0.0);
        let err = validate_variable(&var, &text("lots"), &Inputs::new()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotANumber { raw: "lots".into() });
        assert_eq!(err.key, "price");
    }

    #[test]
    fn test_custom_validator_precedes_bounds() {
        let var = VariableSchema::currency("down", 0.0)
            .max(1_000.0)
            .validator(|value, all| {
                let price = all.get("price").unwrap_or(0.0);
                if value > price {
                    Err("Down payment cannot exceed the price".to_string())
                } else {
                    Ok(value)
                }
            });
        let all = Inputs::new().with("price", 500.0);

        let err = validate_variable(&var, &RawValue::Number(2_000.0), &all).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::Custom { .. }));
        assert_eq!(validate_variable(&var, &RawValue::Number(400.0), &all), Ok(400.0));
    }

    #[test]
    fn test_custom_validator_may_adjust() {
        let var = VariableSchema::currency("x", 0.0)
            .max(10.0)
            .validator(|value, _| Ok(value.min(10.0)));
        assert_eq!(
            validate_variable(&var, &RawValue::Number(50.0), &Inputs::new()),
            Ok(10.0)
        );
    }

    fn gated_set() -> VariableSet {
        VariableSet::new(vec![
            VariableSchema::boolean("include_pmi", false),
            VariableSchema::percentage("pmi_rate", 0.5)
                .range(0.0, 5.0)
                .depends_on("include_pmi"),
            VariableSchema::choice(
                "strategy",
                vec![EnumOption::new(1.0, "Fixed"), EnumOption::new(2.0, "Percent")],
                1.0,
            ),
            VariableSchema::currency("fixed_payment", 100.0).depends_on_value("strategy", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_closed_gate_skips_validation() {
        let set = gated_set();
        let raw = RawInputs::new().with("pmi_rate", 99.0);

        let inputs = validate_inputs(&set, &raw).unwrap();
        assert!(!inputs.contains("pmi_rate"));
        assert_eq!(inputs.get("include_pmi"), Some(0.0));
    }

    #[test]
    fn test_open_gate_validates() {
        let set = gated_set();
        let raw = RawInputs::new().with("include_pmi", true).with("pmi_rate", 99.0);

        let errors = validate_inputs(&set, &raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "pmi_rate");
    }

    #[test]
    fn test_equals_gate() {
        let set = gated_set();

        let inputs = validate_inputs(&set, &RawInputs::new()).unwrap();
        assert_eq!(inputs.get("fixed_payment"), Some(100.0));

        let inputs = validate_inputs(&set, &RawInputs::new().with("strategy", 2.0)).unwrap();
        assert!(!inputs.contains("fixed_payment"));
    }

    #[test]
    fn test_uninterpretable_gate_closes() {
        let set = gated_set();
        let raw = RawInputs::new().with("include_pmi", "maybe");

        let all = collect_all_inputs(&set, &raw);
        assert!(!all.contains("include_pmi"));
        assert!(!is_active(&set, set.get("pmi_rate").unwrap(), &all));

        let errors = validate_inputs(&set, &raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "include_pmi");
    }

    #[test]
    fn test_nested_gate_follows_parent() {
        let set = VariableSet::new(vec![
            VariableSchema::boolean("a", false),
            VariableSchema::boolean("b", true).depends_on("a"),
            VariableSchema::currency("c", 1.0).depends_on("b"),
        ])
        .unwrap();

        let inputs = validate_inputs(&set, &RawInputs::new()).unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(!inputs.contains("c"));

        let inputs = validate_inputs(&set, &RawInputs::new().with("a", true)).unwrap();
        assert_eq!(inputs.get("c"), Some(1.0));
    }

    #[test]
    fn test_collects_every_error() {
        let set = VariableSet::new(vec![
            VariableSchema::currency("a", 1.0).min(0.0),
            VariableSchema::currency("b", 1.0).min(0.0),
            VariableSchema::count("c", 1),
        ])
        .unwrap();
        let raw = RawInputs::new()
            .with("a", -1.0)
            .with("b", "x")
            .with("c", 1.5)
            .with("unknown", 5.0);

        let errors = validate_inputs(&set, &raw).unwrap_err();
        let keys: Vec<_> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
