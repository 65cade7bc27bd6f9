//! Repository for the `rates_registers` table.

use ratesreg_core::types::DbId;
use sqlx::PgPool;

use crate::models::rates_register::{NewRatesRegister, RatesRegister};

const COLUMNS: &str = "registration_id, employee_id, base, target, created_at";

pub struct RatesRegisterRepo;

impl RatesRegisterRepo {
    /// Insert a new register, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewRatesRegister,
    ) -> Result<RatesRegister, sqlx::Error> {
        let query = format!(
            "INSERT INTO rates_registers (employee_id, base, target)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RatesRegister>(&query)
            .bind(input.employee_id)
            .bind(&input.base)
            .bind(&input.target)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        registration_id: DbId,
    ) -> Result<Option<RatesRegister>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rates_registers WHERE registration_id = $1");
        sqlx::query_as::<_, RatesRegister>(&query)
            .bind(registration_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<RatesRegister>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rates_registers ORDER BY registration_id ASC");
        sqlx::query_as::<_, RatesRegister>(&query)
            .fetch_all(pool)
            .await
    }

    /// All registers owned by one person, oldest first.
    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<RatesRegister>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rates_registers
             WHERE employee_id = $1
             ORDER BY registration_id ASC"
        );
        sqlx::query_as::<_, RatesRegister>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, registration_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rates_registers WHERE registration_id = $1")
            .bind(registration_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
