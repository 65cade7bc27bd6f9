//! Query parameter types for API handlers.
//!
//! The flexible lookup endpoint deserializes its query string straight into
//! [`ratesreg_core::lookup::QueryTemplate`].

use serde::Deserialize;

/// `?email=` for the email update endpoint.
#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}
