//! Constraint registry: maps kind tags to check factories and resolves
//! static declarations into per-entity schemas.
//!
//! Resolution happens once at startup. Unknown kinds and bad parameters are
//! reported as [`CoreError::Configuration`] there, so a resolved
//! [`EntitySchema`] can only ever produce validation failures.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::evaluator::{
    self, CURRENCY_CODE_MESSAGE, EMAIL_MESSAGE, KIND_CURRENCY_CODE, KIND_EMAIL, KIND_LENGTH,
    KIND_MIN, MIN_MESSAGE,
};
use super::rules::{ConstraintDecl, FieldViolation, Outcome, ValidationResult};
use crate::currency::ReferenceCodeSet;
use crate::error::CoreError;

/// A resolved check. Returns `true` when the value satisfies the constraint.
pub type Check = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

type CheckFactory = Arc<dyn Fn(&Map<String, Value>) -> Result<Check, String> + Send + Sync>;

/// Picks a kind's default message template from a declaration's params.
type MessageTemplate = Arc<dyn Fn(&Map<String, Value>) -> String + Send + Sync>;

#[derive(Clone)]
struct ConstraintKind {
    default_message: MessageTemplate,
    factory: CheckFactory,
}

/// Registry of constraint kinds available to schema declarations.
#[derive(Clone, Default)]
pub struct ConstraintRegistry {
    kinds: HashMap<String, ConstraintKind>,
}

impl ConstraintRegistry {
    /// A registry with no kinds registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with `email`, `length`, `min` and `currency_code`.
    pub fn with_builtins(codes: Arc<ReferenceCodeSet>) -> Self {
        let mut registry = Self::empty();
        registry.register(KIND_EMAIL, EMAIL_MESSAGE, evaluator::email_check);
        registry.register_with_message(
            KIND_LENGTH,
            evaluator::length_message,
            evaluator::length_check,
        );
        registry.register(KIND_MIN, MIN_MESSAGE, evaluator::min_check);
        registry.register(
            KIND_CURRENCY_CODE,
            CURRENCY_CODE_MESSAGE,
            evaluator::currency_code_check(codes),
        );
        registry
    }

    /// Register (or replace) a kind. `factory` turns a declaration's params
    /// into a check, or explains why the params are invalid.
    pub fn register<F>(&mut self, kind: &str, default_message: &str, factory: F)
    where
        F: Fn(&Map<String, Value>) -> Result<Check, String> + Send + Sync + 'static,
    {
        let default_message = default_message.to_string();
        self.register_with_message(kind, move |_: &Map<String, Value>| default_message.clone(), factory);
    }

    /// Like [`register`](Self::register), but the default template depends
    /// on the declaration's params.
    pub fn register_with_message<M, F>(&mut self, kind: &str, default_message: M, factory: F)
    where
        M: Fn(&Map<String, Value>) -> String + Send + Sync + 'static,
        F: Fn(&Map<String, Value>) -> Result<Check, String> + Send + Sync + 'static,
    {
        self.kinds.insert(
            kind.to_string(),
            ConstraintKind {
                default_message: Arc::new(default_message),
                factory: Arc::new(factory),
            },
        );
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Resolve declarations for one entity. Fields keep their first-declared
    /// order; constraints keep declaration order within a field.
    pub fn resolve(
        &self,
        entity: &'static str,
        decls: &[ConstraintDecl],
    ) -> Result<EntitySchema, CoreError> {
        let mut fields: Vec<(String, ConstraintSpec)> = Vec::new();

        for decl in decls {
            let kind = self.kinds.get(&decl.kind).ok_or_else(|| {
                CoreError::Configuration(format!(
                    "{entity}.{}: unknown constraint kind '{}'",
                    decl.field, decl.kind
                ))
            })?;
            let check = (kind.factory)(&decl.params).map_err(|reason| {
                CoreError::Configuration(format!("{entity}.{}: {reason}", decl.field))
            })?;
            let template = match &decl.message {
                Some(message) => message.clone(),
                None => (kind.default_message)(&decl.params),
            };
            let message = render_message(&template, &decl.field, &decl.params);
            if let Some(placeholder) = BOUND_PLACEHOLDERS.iter().find(|p| message.contains(**p)) {
                return Err(CoreError::Configuration(format!(
                    "{entity}.{}: message uses {placeholder} but the parameter is not set",
                    decl.field
                )));
            }
            let resolved = ResolvedConstraint {
                kind: decl.kind.clone(),
                message,
                check,
            };

            match fields.iter_mut().find(|(name, _)| *name == decl.field) {
                Some((_, spec)) => spec.constraints.push(resolved),
                None => fields.push((
                    decl.field.clone(),
                    ConstraintSpec {
                        constraints: vec![resolved],
                    },
                )),
            }
        }

        Ok(EntitySchema { entity, fields })
    }
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ConstraintRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

/// One resolved constraint with its rendered failure message.
#[derive(Clone)]
pub struct ResolvedConstraint {
    kind: String,
    message: String,
    check: Check,
}

impl ResolvedConstraint {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for ResolvedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConstraint")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// The constraints declared for a single field. Empty specs always pass.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSpec {
    constraints: Vec<ResolvedConstraint>,
}

impl ConstraintSpec {
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[ResolvedConstraint] {
        &self.constraints
    }

    /// Constraints the value does not satisfy, in declaration order.
    pub fn failures<'a>(
        &'a self,
        value: &'a Value,
    ) -> impl Iterator<Item = &'a ResolvedConstraint> + 'a {
        self.constraints.iter().filter(move |c| !c.check(value))
    }
}

/// Resolved constraints for every declared field of one record type.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity: &'static str,
    fields: Vec<(String, ConstraintSpec)>,
}

impl EntitySchema {
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn spec(&self, field: &str) -> Option<&ConstraintSpec> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, spec)| spec)
    }

    /// Validate every declared field and collect all violations.
    ///
    /// Absent and null fields are skipped.
    pub fn validate_record(&self, record: &Map<String, Value>) -> ValidationResult {
        let mut violations = Vec::new();

        for (field, spec) in &self.fields {
            let value = match record.get(field) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            for constraint in spec.failures(value) {
                violations.push(FieldViolation {
                    field: field.clone(),
                    kind: constraint.kind.clone(),
                    message: constraint.message.clone(),
                    value: Some(value.clone()),
                });
            }
        }

        ValidationResult::from_violations(violations)
    }

    /// Validate any serializable record (struct serializing to a JSON object).
    pub fn validate<T: Serialize>(&self, record: &T) -> Result<(), CoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| CoreError::Internal(format!("cannot serialize {}: {e}", self.entity)))?;
        let Value::Object(map) = value else {
            return Err(CoreError::Internal(format!(
                "{} record did not serialize to an object",
                self.entity
            )));
        };
        into_result(self.validate_record(&map))
    }

    /// Validate a single value against one field's constraints. Undeclared
    /// fields pass.
    pub fn validate_field(&self, field: &str, value: &Value) -> Result<(), CoreError> {
        let Some(spec) = self.spec(field) else {
            return Ok(());
        };
        match evaluator::validate(field, value, spec) {
            Outcome { valid: true, .. } => Ok(()),
            Outcome { message, .. } => {
                let kind = spec
                    .failures(value)
                    .next()
                    .map(|c| c.kind.clone())
                    .unwrap_or_default();
                into_result(ValidationResult::from_violations(vec![FieldViolation {
                    field: field.to_string(),
                    kind,
                    message: message.unwrap_or_default(),
                    value: Some(value.clone()),
                }]))
            }
        }
    }
}

fn into_result(result: ValidationResult) -> Result<(), CoreError> {
    if result.is_valid {
        Ok(())
    } else {
        Err(CoreError::Validation(result))
    }
}

const BOUND_PLACEHOLDERS: [&str; 2] = ["{min}", "{max}"];

/// Substitute `{field}`, `{min}` and `{max}` in a message template.
fn render_message(template: &str, field: &str, params: &Map<String, Value>) -> String {
    let mut message = template.replace("{field}", &display_name(field));
    for key in ["min", "max"] {
        let placeholder = format!("{{{key}}}");
        if let Some(value) = params.get(key) {
            message = message.replace(&placeholder, &render_param(value));
        }
    }
    message
}

fn render_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `"base_currency"` -> `"Base currency"`.
fn display_name(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
