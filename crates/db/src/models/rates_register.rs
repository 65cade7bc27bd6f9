//! Rates register entity model and DTO.

use ratesreg_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rates_registers` table: the base currency and ordered
/// target currencies a person wants rates for.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RatesRegister {
    pub registration_id: DbId,
    pub employee_id: DbId,
    pub base: String,
    pub target: Vec<String>,
    pub created_at: Timestamp,
}

/// DTO for registering a new rates register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRatesRegister {
    pub employee_id: DbId,
    pub base: String,
    #[serde(default)]
    pub target: Vec<String>,
}
