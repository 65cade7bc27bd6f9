//! Built-in constraint checks and the per-field evaluator. Pure logic, no
//! database access.

use std::sync::Arc;

use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::registry::{Check, ConstraintSpec};
use super::rules::Outcome;
use crate::currency::ReferenceCodeSet;

/// Kind tag for the email format constraint.
pub const KIND_EMAIL: &str = "email";
/// Kind tag for the inclusive character-count constraint.
pub const KIND_LENGTH: &str = "length";
/// Kind tag for the numeric minimum constraint.
pub const KIND_MIN: &str = "min";
/// Kind tag for currency code set membership.
pub const KIND_CURRENCY_CODE: &str = "currency_code";

pub const EMAIL_MESSAGE: &str = "Not a well-formed email address";
pub const LENGTH_MESSAGE: &str = "{field} must have minimum {min} and maximum {max} characters";
pub const LENGTH_MIN_MESSAGE: &str = "{field} must have at least {min} characters";
pub const LENGTH_MAX_MESSAGE: &str = "{field} must have at most {max} characters";
pub const MIN_MESSAGE: &str = "{field} must be at least {min}";
pub const CURRENCY_CODE_MESSAGE: &str = "Not a valid currency code";

/// Check one value against every constraint of a field.
///
/// Null values pass; presence is enforced by the record's shape, not here.
/// Returns the message of the first failing constraint.
pub fn validate(field_name: &str, value: &Value, spec: &ConstraintSpec) -> Outcome {
    if value.is_null() {
        return Outcome::pass();
    }
    match spec.failures(value).next() {
        Some(constraint) => {
            tracing::debug!(field = field_name, kind = constraint.kind(), "Constraint failed");
            Outcome::fail(constraint.message())
        }
        None => Outcome::pass(),
    }
}

/// `local@domain` with a non-empty local part and a dotted domain.
pub fn is_well_formed_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    s.validate_email()
}

// ---------------------------------------------------------------------------
// Check factories
// ---------------------------------------------------------------------------

pub(crate) fn email_check(params: &Map<String, Value>) -> Result<Check, String> {
    reject_params(KIND_EMAIL, params)?;
    Ok(Arc::new(|value: &Value| {
        value.as_str().is_some_and(is_well_formed_email)
    }))
}

pub(crate) fn length_check(params: &Map<String, Value>) -> Result<Check, String> {
    let min = optional_u64(params, "min")?;
    let max = optional_u64(params, "max")?;
    if min.is_none() && max.is_none() {
        return Err("length requires 'min' and/or 'max'".to_string());
    }
    let min = min.unwrap_or(0) as usize;
    let max = max.map_or(usize::MAX, |m| m as usize);
    if min > max {
        return Err(format!("length has min {min} greater than max {max}"));
    }
    Ok(Arc::new(move |value: &Value| {
        value
            .as_str()
            .is_some_and(|s| (min..=max).contains(&s.chars().count()))
    }))
}

/// Default `length` template for the bounds actually declared.
pub(crate) fn length_message(params: &Map<String, Value>) -> String {
    match (params.contains_key("min"), params.contains_key("max")) {
        (true, false) => LENGTH_MIN_MESSAGE,
        (false, true) => LENGTH_MAX_MESSAGE,
        _ => LENGTH_MESSAGE,
    }
    .to_string()
}

pub(crate) fn min_check(params: &Map<String, Value>) -> Result<Check, String> {
    let min = params
        .get("min")
        .and_then(Value::as_f64)
        .ok_or_else(|| "min requires a numeric 'min'".to_string())?;
    Ok(Arc::new(move |value: &Value| {
        value.as_f64().is_some_and(|n| n >= min)
    }))
}

pub(crate) fn currency_code_check(
    codes: Arc<ReferenceCodeSet>,
) -> impl Fn(&Map<String, Value>) -> Result<Check, String> + Send + Sync + 'static {
    move |params: &Map<String, Value>| -> Result<Check, String> {
        reject_params(KIND_CURRENCY_CODE, params)?;
        let codes = Arc::clone(&codes);
        Ok(Arc::new(move |value: &Value| match value {
            Value::String(code) => codes.contains(code),
            Value::Array(items) => items
                .iter()
                .all(|item| item.as_str().is_some_and(|code| codes.contains(code))),
            _ => false,
        }))
    }
}

fn reject_params(kind: &str, params: &Map<String, Value>) -> Result<(), String> {
    match params.keys().next() {
        Some(key) => Err(format!("{kind} takes no parameters, got '{key}'")),
        None => Ok(()),
    }
}

fn optional_u64(params: &Map<String, Value>, key: &str) -> Result<Option<u64>, String> {
    match params.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("'{key}' must be a non-negative integer, got {v}")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::registry::ConstraintRegistry;
    use crate::validation::rules::ConstraintDecl;

    fn spec_for(decl: ConstraintDecl) -> ConstraintSpec {
        let registry = ConstraintRegistry::with_builtins(Arc::new(ReferenceCodeSet::iso4217()));
        let schema = registry.resolve("Test", &[decl]).unwrap();
        schema.spec("value").cloned().unwrap()
    }

    fn email_spec() -> ConstraintSpec {
        spec_for(ConstraintDecl::new("value", KIND_EMAIL))
    }

    // -- email ---------------------------------------------------------------

    #[test]
    fn email_without_at_fails() {
        let outcome = validate("email", &json!("emp1"), &email_spec());
        assert_eq!(outcome, Outcome::fail(EMAIL_MESSAGE));
    }

    #[test]
    fn email_without_domain_dot_fails() {
        let outcome = validate("email", &json!("emp1@gmail"), &email_spec());
        assert!(!outcome.valid);
        assert_eq!(outcome.message.as_deref(), Some(EMAIL_MESSAGE));
    }

    #[test]
    fn email_with_empty_local_or_domain_fails() {
        for bad in ["@gmail.com", "emp1@", "emp1@.com", "emp1@gmail."] {
            assert!(!is_well_formed_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn email_of_local_domain_tld_form_passes() {
        for good in ["sgsakthi1992@gmail.com", "emp1@gmail.com", "a.b@mail.example.org"] {
            assert!(validate("email", &json!(good), &email_spec()).valid, "{good}");
        }
    }

    #[test]
    fn email_non_string_fails() {
        assert!(!validate("email", &json!(42), &email_spec()).valid);
    }

    // -- length --------------------------------------------------------------

    #[test]
    fn length_bounds_are_inclusive() {
        let spec = spec_for(
            ConstraintDecl::new("value", KIND_LENGTH)
                .param("min", 5)
                .param("max", 15),
        );
        assert!(validate("username", &json!("abcde"), &spec).valid);
        assert!(validate("username", &json!("abcdefghijklmno"), &spec).valid);
        assert!(!validate("username", &json!("emp"), &spec).valid);
        assert!(!validate("username", &json!("employee1_username"), &spec).valid);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_LENGTH).param("max", 3));
        assert!(validate("name", &json!("élé"), &spec).valid);
    }

    #[test]
    fn length_with_single_bound_names_only_that_bound() {
        let max_only = spec_for(ConstraintDecl::new("nickname", KIND_LENGTH).param("max", 3));
        assert_eq!(
            validate("nickname", &json!("abcdef"), &max_only).message.as_deref(),
            Some("Nickname must have at most 3 characters")
        );

        let min_only = spec_for(ConstraintDecl::new("nickname", KIND_LENGTH).param("min", 5));
        assert_eq!(
            validate("nickname", &json!("abc"), &min_only).message.as_deref(),
            Some("Nickname must have at least 5 characters")
        );
    }

    #[test]
    fn length_default_message_names_field_and_bounds() {
        let spec = spec_for(
            ConstraintDecl::new("value", KIND_LENGTH)
                .param("min", 5)
                .param("max", 15),
        );
        let outcome = validate("value", &json!("emp"), &spec);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Value must have minimum 5 and maximum 15 characters")
        );
    }

    // -- min -----------------------------------------------------------------

    #[test]
    fn min_value_equal_to_bound_passes() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_MIN).param("min", 18));
        assert!(validate("age", &json!(18), &spec).valid);
        assert!(validate("age", &json!(27), &spec).valid);
    }

    #[test]
    fn min_value_below_bound_fails() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_MIN).param("min", 18));
        let outcome = validate("age", &json!(0), &spec);
        assert_eq!(outcome.message.as_deref(), Some("Value must be at least 18"));
        assert!(!validate("age", &json!(17.5), &spec).valid);
    }

    // -- currency_code -------------------------------------------------------

    #[test]
    fn currency_list_of_known_codes_passes() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_CURRENCY_CODE));
        assert!(validate("target", &json!(["USD", "EUR", "INR"]), &spec).valid);
        assert!(validate("target", &json!([]), &spec).valid);
    }

    #[test]
    fn currency_list_with_one_unknown_code_fails() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_CURRENCY_CODE));
        let outcome = validate("target", &json!(["USD", "ABC"]), &spec);
        assert_eq!(outcome, Outcome::fail(CURRENCY_CODE_MESSAGE));
    }

    #[test]
    fn currency_match_is_case_sensitive() {
        let spec = spec_for(ConstraintDecl::new("value", KIND_CURRENCY_CODE));
        assert!(!validate("base", &json!("usd"), &spec).valid);
        assert!(validate("base", &json!("USD"), &spec).valid);
    }

    // -- general -------------------------------------------------------------

    #[test]
    fn null_value_passes() {
        assert!(validate("email", &Value::Null, &email_spec()).valid);
    }

    #[test]
    fn empty_spec_always_passes() {
        assert!(validate("anything", &json!("x"), &ConstraintSpec::default()).valid);
    }

    #[test]
    fn validation_is_idempotent() {
        let spec = email_spec();
        let value = json!("not-an-email");
        assert_eq!(
            validate("email", &value, &spec),
            validate("email", &value, &spec)
        );
    }
}
