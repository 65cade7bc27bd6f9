//! Person (employee) entity model and DTOs.

use ratesreg_core::lookup::{LookupField, Matchable};
use ratesreg_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `persons` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new person. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub username: String,
    pub email: String,
    pub age: i32,
}

/// DTO for updating an existing person. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePerson {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl UpdatePerson {
    /// An update that only replaces the email address.
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

impl Matchable for Person {
    fn lookup_value(&self, field: LookupField) -> Option<&str> {
        match field {
            LookupField::Username => Some(&self.username),
            LookupField::Email => Some(&self.email),
        }
    }
}
