//! Record store contract.
//!
//! Handlers and services talk to storage only through these traits, so the
//! same validation and lookup paths run over Postgres ([`PgStore`]) and the
//! in-memory store ([`MemoryStore`](crate::memory::MemoryStore)).

use std::sync::Arc;

use async_trait::async_trait;
use ratesreg_core::lookup::QueryTemplate;
use ratesreg_core::types::DbId;

use crate::models::person::{NewPerson, Person, UpdatePerson};
use crate::models::rates_register::{NewRatesRegister, RatesRegister};
use crate::repositories::{PersonRepo, RatesRegisterRepo};
use crate::DbPool;

/// Failure inside a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write would break a uniqueness rule, e.g. a taken username.
    #[error("{0}")]
    Conflict(String),
}

impl StoreError {
    pub fn username_taken(username: &str) -> Self {
        StoreError::Conflict(format!("Username {username} already exists"))
    }
}

/// Unique constraint guarding `persons.username`.
pub const USERNAME_CONSTRAINT: &str = "uq_persons_username";

/// Map a unique violation on the username constraint to
/// [`StoreError::Conflict`]; other errors pass through.
fn username_conflict(err: sqlx::Error, username: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT) =>
        {
            StoreError::username_taken(username)
        }
        _ => StoreError::Database(err),
    }
}

/// Storage contract for person records.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Persist a new person and return it with its assigned id. A taken
    /// username is a [`StoreError::Conflict`].
    async fn create(&self, input: &NewPerson) -> Result<Person, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Person>, StoreError>;

    /// Exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Person>, StoreError>;

    /// Every person in store order.
    async fn find_all(&self) -> Result<Vec<Person>, StoreError>;

    /// Apply the non-`None` fields of `input`. `None` if the id is unknown.
    /// Renaming onto a taken username is a [`StoreError::Conflict`].
    async fn update(&self, id: DbId, input: &UpdatePerson) -> Result<Option<Person>, StoreError>;

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError>;

    /// Flexible lookup under the default match policy.
    async fn search(&self, template: &QueryTemplate) -> Result<Vec<Person>, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
}

/// Storage contract for rates register records.
#[async_trait]
pub trait RatesRegisterStore: Send + Sync {
    async fn create(&self, input: &NewRatesRegister) -> Result<RatesRegister, StoreError>;

    async fn find_by_id(&self, registration_id: DbId)
        -> Result<Option<RatesRegister>, StoreError>;

    async fn find_all(&self) -> Result<Vec<RatesRegister>, StoreError>;

    async fn find_by_employee(&self, employee_id: DbId) -> Result<Vec<RatesRegister>, StoreError>;

    async fn delete_by_id(&self, registration_id: DbId) -> Result<bool, StoreError>;
}

/// Liveness check for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Short name of the backing storage, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Handles to every store contract, all backed by the same storage.
#[derive(Clone)]
pub struct Stores {
    pub persons: Arc<dyn PersonStore>,
    pub rates_registers: Arc<dyn RatesRegisterStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Share one store value across all contracts.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: PersonStore + RatesRegisterStore + StoreHealth + 'static,
    {
        Self {
            persons: store.clone(),
            rates_registers: store.clone(),
            health: store,
        }
    }

    pub fn postgres(pool: DbPool) -> Self {
        Self::shared(Arc::new(PgStore::new(pool)))
    }

    pub fn memory() -> Self {
        Self::shared(Arc::new(crate::memory::MemoryStore::new()))
    }
}

/// Postgres-backed store delegating to the repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PersonStore for PgStore {
    async fn create(&self, input: &NewPerson) -> Result<Person, StoreError> {
        PersonRepo::create(&self.pool, input)
            .await
            .map_err(|e| username_conflict(e, &input.username))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Person>, StoreError> {
        Ok(PersonRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Person>, StoreError> {
        Ok(PersonRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_all(&self) -> Result<Vec<Person>, StoreError> {
        Ok(PersonRepo::list(&self.pool).await?)
    }

    async fn update(&self, id: DbId, input: &UpdatePerson) -> Result<Option<Person>, StoreError> {
        PersonRepo::update(&self.pool, id, input).await.map_err(|e| match &input.username {
            Some(username) => username_conflict(e, username),
            None => StoreError::Database(e),
        })
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(PersonRepo::delete(&self.pool, id).await?)
    }

    async fn search(&self, template: &QueryTemplate) -> Result<Vec<Person>, StoreError> {
        Ok(PersonRepo::search(&self.pool, template).await?)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(PersonRepo::username_exists(&self.pool, username).await?)
    }
}

#[async_trait]
impl RatesRegisterStore for PgStore {
    async fn create(&self, input: &NewRatesRegister) -> Result<RatesRegister, StoreError> {
        Ok(RatesRegisterRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(
        &self,
        registration_id: DbId,
    ) -> Result<Option<RatesRegister>, StoreError> {
        Ok(RatesRegisterRepo::find_by_id(&self.pool, registration_id).await?)
    }

    async fn find_all(&self) -> Result<Vec<RatesRegister>, StoreError> {
        Ok(RatesRegisterRepo::list(&self.pool).await?)
    }

    async fn find_by_employee(&self, employee_id: DbId) -> Result<Vec<RatesRegister>, StoreError> {
        Ok(RatesRegisterRepo::list_by_employee(&self.pool, employee_id).await?)
    }

    async fn delete_by_id(&self, registration_id: DbId) -> Result<bool, StoreError> {
        Ok(RatesRegisterRepo::delete(&self.pool, registration_id).await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
