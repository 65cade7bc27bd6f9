//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod person_repo;
pub mod rates_register_repo;

pub use person_repo::PersonRepo;
pub use rates_register_repo::RatesRegisterRepo;
