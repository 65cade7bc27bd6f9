//! Domain core for the rates register backend.
//!
//! Pure logic only: constraint validation, the reference currency code set,
//! and the flexible lookup engine. Nothing in this crate touches the
//! database or HTTP.

pub mod currency;
pub mod error;
pub mod lookup;
pub mod types;
pub mod validation;
