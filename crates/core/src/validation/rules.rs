//! Constraint declaration and result types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A constraint declared against one field of a record type.
///
/// `kind` is a tag looked up in the [`ConstraintRegistry`](super::registry::ConstraintRegistry);
/// `params` carries the kind-specific settings (`{"min": 5, "max": 15}` for
/// `length`). `message` overrides the kind's default failure template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintDecl {
    pub field: String,
    pub kind: String,
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConstraintDecl {
    pub fn new(field: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: kind.into(),
            params: serde_json::Map::new(),
            message: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Result of checking one value against one field's constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Aggregated result of validating every declared field of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<FieldViolation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<FieldViolation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// The first violation in declaration order, if any.
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }

    /// Messages of every violation, in declaration order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return f.write_str("no violations");
        }
        f.write_str(&self.messages().join("; "))
    }
}

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}
