//! Constraint declarations for the persisted record types.

use std::sync::Arc;

use super::evaluator::{KIND_CURRENCY_CODE, KIND_EMAIL, KIND_LENGTH, KIND_MIN};
use super::registry::{ConstraintRegistry, EntitySchema};
use super::rules::ConstraintDecl;
use crate::currency::ReferenceCodeSet;
use crate::error::CoreError;

/// Entity name used in messages for person records.
pub const EMPLOYEE: &str = "Employee";

/// Entity name used in messages for rates register records.
pub const RATES_REGISTER: &str = "RatesRegister";

pub const NAME_MIN_LEN: u64 = 1;
pub const NAME_MAX_LEN: u64 = 100;
pub const USERNAME_MIN_LEN: u64 = 5;
pub const USERNAME_MAX_LEN: u64 = 15;
pub const MINIMUM_AGE: i64 = 18;

pub fn person_constraints() -> Vec<ConstraintDecl> {
    vec![
        ConstraintDecl::new("name", KIND_LENGTH)
            .param("min", NAME_MIN_LEN)
            .param("max", NAME_MAX_LEN),
        ConstraintDecl::new("username", KIND_LENGTH)
            .param("min", USERNAME_MIN_LEN)
            .param("max", USERNAME_MAX_LEN),
        ConstraintDecl::new("email", KIND_EMAIL),
        ConstraintDecl::new("age", KIND_MIN)
            .param("min", MINIMUM_AGE)
            .message("Employee age must be at least {min}"),
    ]
}

pub fn rates_register_constraints() -> Vec<ConstraintDecl> {
    vec![
        ConstraintDecl::new("base", KIND_CURRENCY_CODE),
        ConstraintDecl::new("target", KIND_CURRENCY_CODE),
    ]
}

/// Resolved schemas for every record type, built once at startup.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub person: EntitySchema,
    pub rates_register: EntitySchema,
}

impl Schemas {
    pub fn build(registry: &ConstraintRegistry) -> Result<Self, CoreError> {
        Ok(Self {
            person: registry.resolve(EMPLOYEE, &person_constraints())?,
            rates_register: registry.resolve(RATES_REGISTER, &rates_register_constraints())?,
        })
    }

    /// Schemas over the built-in registry for the given code set.
    pub fn with_codes(codes: Arc<ReferenceCodeSet>) -> Result<Self, CoreError> {
        Self::build(&ConstraintRegistry::with_builtins(codes))
    }
}
