pub mod employee;
pub mod health;
pub mod rates_register;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /employees                                       list, create
/// /employees/search?username=&email=               flexible lookup
/// /employees/by-email/{email}                      exact email lookup
/// /employees/{id}                                  get, update email (PUT ?email=), delete
/// /employees/{id}/rates-registers                  registers owned by an employee
///
/// /rates-registers                                 list, create
/// /rates-registers/{id}                            get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/employees", employee::router())
        .nest("/rates-registers", rates_register::router())
}
