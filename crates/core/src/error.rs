use crate::types::DbId;
use crate::validation::rules::ValidationResult;

/// Key kind used in not-found messages for identifier lookups.
pub const KEY_ID: &str = "ID";

/// Key kind used in not-found messages for exact email lookups.
pub const KEY_EMAIL: &str = "Email";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An exact-key lookup found nothing. Renders as
    /// `"<entity> <key_kind> <key> not found"`.
    #[error("{entity} {key_kind} {key} not found")]
    NotFound {
        entity: &'static str,
        key_kind: &'static str,
        key: String,
    },

    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid constraint declarations or reference data. Only raised while
    /// building application state, never per request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Not-found error for a lookup by identifier.
    pub fn not_found_by_id(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            key_kind: KEY_ID,
            key: id.to_string(),
        }
    }

    /// Not-found error for an exact email lookup.
    pub fn not_found_by_email(entity: &'static str, email: &str) -> Self {
        CoreError::NotFound {
            entity,
            key_kind: KEY_EMAIL,
            key: email.to_string(),
        }
    }
}
