//! In-memory record store.
//!
//! Keeps rows in insertion order behind a `tokio` `RwLock`. Used when no
//! `DATABASE_URL` is configured and by tests. Lookup goes through the same
//! core match engine the Postgres predicate is derived from.

use async_trait::async_trait;
use chrono::Utc;
use ratesreg_core::lookup::{match_records, MatchPolicy, QueryTemplate};
use ratesreg_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::person::{NewPerson, Person, UpdatePerson};
use crate::models::rates_register::{NewRatesRegister, RatesRegister};
use crate::store::{PersonStore, RatesRegisterStore, StoreError, StoreHealth};

#[derive(Debug, Default)]
struct Tables {
    persons: Vec<Person>,
    registers: Vec<RatesRegister>,
    last_person_id: DbId,
    last_registration_id: DbId,
}

/// Thread-safe in-memory store; ids are assigned from per-table counters
/// starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed person keeping its id. Later creates are
    /// assigned ids above the highest seeded id.
    pub async fn seed_person(&self, person: Person) {
        let mut tables = self.tables.write().await;
        tables.last_person_id = tables.last_person_id.max(person.id);
        tables.persons.retain(|p| p.id != person.id);
        tables.persons.push(person);
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn create(&self, input: &NewPerson) -> Result<Person, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.persons.iter().any(|p| p.username == input.username) {
            return Err(StoreError::username_taken(&input.username));
        }
        tables.last_person_id += 1;
        let now = Utc::now();
        let person = Person {
            id: tables.last_person_id,
            name: input.name.clone(),
            username: input.username.clone(),
            email: input.email.clone(),
            age: input.age,
            created_at: now,
            updated_at: now,
        };
        tables.persons.push(person.clone());
        tracing::debug!(id = person.id, "Stored person in memory");
        Ok(person)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Person>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.persons.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Person>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .persons
            .iter()
            .filter(|p| p.email == email)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Person>, StoreError> {
        Ok(self.tables.read().await.persons.clone())
    }

    async fn update(&self, id: DbId, input: &UpdatePerson) -> Result<Option<Person>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(username) = &input.username {
            if tables
                .persons
                .iter()
                .any(|p| p.id != id && &p.username == username)
            {
                return Err(StoreError::username_taken(username));
            }
        }
        let Some(person) = tables.persons.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            person.name.clone_from(name);
        }
        if let Some(username) = &input.username {
            person.username.clone_from(username);
        }
        if let Some(email) = &input.email {
            person.email.clone_from(email);
        }
        if let Some(age) = input.age {
            person.age = age;
        }
        person.updated_at = Utc::now();
        Ok(Some(person.clone()))
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.persons.len();
        tables.persons.retain(|p| p.id != id);
        let deleted = tables.persons.len() < before;
        if deleted {
            tables.registers.retain(|r| r.employee_id != id);
        }
        Ok(deleted)
    }

    async fn search(&self, template: &QueryTemplate) -> Result<Vec<Person>, StoreError> {
        let tables = self.tables.read().await;
        let found = match_records(&tables.persons, template, &MatchPolicy::default());
        Ok(found.into_iter().cloned().collect())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.persons.iter().any(|p| p.username == username))
    }
}

#[async_trait]
impl RatesRegisterStore for MemoryStore {
    async fn create(&self, input: &NewRatesRegister) -> Result<RatesRegister, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_registration_id += 1;
        let register = RatesRegister {
            registration_id: tables.last_registration_id,
            employee_id: input.employee_id,
            base: input.base.clone(),
            target: input.target.clone(),
            created_at: Utc::now(),
        };
        tables.registers.push(register.clone());
        Ok(register)
    }

    async fn find_by_id(
        &self,
        registration_id: DbId,
    ) -> Result<Option<RatesRegister>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .registers
            .iter()
            .find(|r| r.registration_id == registration_id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<RatesRegister>, StoreError> {
        Ok(self.tables.read().await.registers.clone())
    }

    async fn find_by_employee(&self, employee_id: DbId) -> Result<Vec<RatesRegister>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .registers
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, registration_id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.registers.len();
        tables.registers.retain(|r| r.registration_id != registration_id);
        Ok(tables.registers.len() < before)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
