//! Handlers for the `/rates-registers` resource and the per-employee listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ratesreg_core::error::CoreError;
use ratesreg_core::types::DbId;
use ratesreg_core::validation::schemas::{EMPLOYEE, RATES_REGISTER};
use ratesreg_db::models::rates_register::{NewRatesRegister, RatesRegister};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// GET /api/v1/rates-registers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<RatesRegister>>> {
    let registers = state.stores.rates_registers.find_all().await?;
    Ok(Json(registers))
}

/// POST /api/v1/rates-registers
///
/// Base and target codes must all be in the reference code set, and the
/// owning employee must exist.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewRatesRegister>,
) -> AppResult<(StatusCode, Json<RatesRegister>)> {
    state.schemas.rates_register.validate(&input)?;

    if state
        .stores
        .persons
        .find_by_id(input.employee_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::not_found_by_id(
            EMPLOYEE,
            input.employee_id,
        )));
    }

    let register = state.stores.rates_registers.create(&input).await?;
    tracing::info!(
        registration_id = register.registration_id,
        employee_id = register.employee_id,
        "Rates register created"
    );
    Ok((StatusCode::CREATED, Json(register)))
}

/// GET /api/v1/rates-registers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<RatesRegister>> {
    let register = state
        .stores
        .rates_registers
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found_by_id(RATES_REGISTER, id))?;
    Ok(Json(register))
}

/// GET /api/v1/employees/{id}/rates-registers
pub async fn list_by_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<DbId>,
) -> AppResult<Json<Vec<RatesRegister>>> {
    if state.stores.persons.find_by_id(employee_id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found_by_id(
            EMPLOYEE,
            employee_id,
        )));
    }
    let registers = state
        .stores
        .rates_registers
        .find_by_employee(employee_id)
        .await?;
    Ok(Json(registers))
}

/// DELETE /api/v1/rates-registers/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if state.stores.rates_registers.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found_by_id(RATES_REGISTER, id)))
    }
}
