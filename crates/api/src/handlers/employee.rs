//! Handlers for the `/employees` resource.
//!
//! Exact-key lookups (`/{id}`, `/by-email/{email}`) answer 404 on a miss.
//! The flexible lookup (`/search`) answers 200 with a possibly empty list.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ratesreg_core::error::CoreError;
use ratesreg_core::lookup::{LookupField, QueryTemplate};
use ratesreg_core::types::DbId;
use ratesreg_core::validation::schemas::EMPLOYEE;
use ratesreg_db::models::person::{NewPerson, Person, UpdatePerson};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::query::EmailParams;
use crate::state::AppState;

/// GET /api/v1/employees
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let persons = state.stores.persons.find_all().await?;
    Ok(Json(persons))
}

/// POST /api/v1/employees
///
/// Validates every field, then rejects a username that is already taken.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPerson>,
) -> AppResult<(StatusCode, Json<Person>)> {
    state.schemas.person.validate(&input)?;

    if state.stores.persons.username_exists(&input.username).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Username {} already exists",
            input.username
        ))));
    }

    let person = state.stores.persons.create(&input).await?;
    tracing::info!(id = person.id, username = %person.username, "Employee created");
    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Person>> {
    let person = state
        .stores
        .persons
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found_by_id(EMPLOYEE, id))?;
    Ok(Json(person))
}

/// PUT /api/v1/employees/{id}?email=
///
/// Replaces the email address after validating it.
pub async fn update_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<EmailParams>,
) -> AppResult<Json<Person>> {
    validate_email(&state, &params.email)?;

    let person = state
        .stores
        .persons
        .update(id, &UpdatePerson::email(params.email))
        .await?
        .ok_or_else(|| CoreError::not_found_by_id(EMPLOYEE, id))?;
    tracing::info!(id, "Employee email updated");
    Ok(Json(person))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if state.stores.persons.delete_by_id(id).await? {
        tracing::info!(id, "Employee deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found_by_id(EMPLOYEE, id)))
    }
}

/// GET /api/v1/employees/by-email/{email}
///
/// Exact, case-sensitive match. No match is a 404, not an empty list.
pub async fn get_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> AppResult<Json<Vec<Person>>> {
    validate_email(&state, &email)?;

    let persons = state.stores.persons.find_by_email(&email).await?;
    if persons.is_empty() {
        return Err(AppError::Core(CoreError::not_found_by_email(
            EMPLOYEE, &email,
        )));
    }
    Ok(Json(persons))
}

/// GET /api/v1/employees/search?username=&email=
///
/// Case-insensitive substring match, OR-combined across the given
/// parameters. A populated `email` must itself be a well-formed address.
/// With no parameters every employee is returned.
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(template): ApiQuery<QueryTemplate>,
) -> AppResult<Json<Vec<Person>>> {
    if let Some(email) = template.term(LookupField::Email) {
        validate_email(&state, email)?;
    }

    let persons = state.stores.persons.search(&template).await?;
    tracing::debug!(matches = persons.len(), "Employee search");
    Ok(Json(persons))
}

fn validate_email(state: &AppState, email: &str) -> Result<(), CoreError> {
    state
        .schemas
        .person
        .validate_field("email", &Value::String(email.to_string()))
}
