//! Field-level constraint validation.
//!
//! Constraint kinds are registered by tag in a [`registry::ConstraintRegistry`];
//! static declarations are resolved against it once into per-entity schemas.

pub mod evaluator;
pub mod registry;
pub mod rules;
pub mod schemas;

pub use evaluator::validate;
pub use registry::{ConstraintRegistry, ConstraintSpec, EntitySchema};
pub use rules::{ConstraintDecl, FieldViolation, Outcome, ValidationResult};
pub use schemas::Schemas;
