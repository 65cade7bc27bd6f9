//! Request handlers.
//!
//! Each submodule provides async handler functions for a single record type.
//! Handlers validate input against the resolved schemas in [`AppState`],
//! delegate to the record stores, and map errors via [`AppError`].
//!
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod employee;
pub mod rates_register;
