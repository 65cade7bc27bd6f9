//! Record structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (also `Serialize`, so it can be
//!   run through the constraint validator)

pub mod person;
pub mod rates_register;
