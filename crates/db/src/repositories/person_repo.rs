//! Repository for the `persons` table.

use ratesreg_core::lookup::{ilike_predicate, QueryTemplate};
use ratesreg_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::{NewPerson, Person, UpdatePerson};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, username, email, age, created_at, updated_at";

/// Provides CRUD operations and flexible lookup for persons.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewPerson) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO persons (name, username, email, age)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.age)
            .fetch_one(pool)
            .await
    }

    /// Find a person by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find persons whose email equals `email` exactly (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE email = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Person>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// List all persons in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons ORDER BY id ASC");
        sqlx::query_as::<_, Person>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring lookup, OR-combined across the populated
    /// template fields. An empty template lists everything.
    pub async fn search(pool: &PgPool, template: &QueryTemplate) -> Result<Vec<Person>, sqlx::Error> {
        let Some(predicate) = ilike_predicate(template, 1) else {
            return Self::list(pool).await;
        };
        let query = format!(
            "SELECT {COLUMNS} FROM persons WHERE {} ORDER BY id ASC",
            predicate.clause
        );
        let mut q = sqlx::query_as::<_, Person>(&query);
        for bind in &predicate.binds {
            q = q.bind(bind);
        }
        q.fetch_all(pool).await
    }

    /// Whether any person already uses `username`.
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM persons WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Update a person. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePerson,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "UPDATE persons SET
                name = COALESCE($2, name),
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                age = COALESCE($5, age),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.age)
            .fetch_optional(pool)
            .await
    }

    /// Delete a person by id. Their rates registers cascade. Returns `true`
    /// if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
