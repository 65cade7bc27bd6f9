//! Route definitions for the `/employees` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{employee, rates_register};
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /search                   -> search
/// GET    /by-email/{email}         -> get_by_email
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}?email=              -> update_email
/// DELETE /{id}                     -> delete
/// GET    /{id}/rates-registers     -> rates_register::list_by_employee
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list).post(employee::create))
        .route("/search", get(employee::search))
        .route("/by-email/{email}", get(employee::get_by_email))
        .route(
            "/{id}",
            get(employee::get_by_id)
                .put(employee::update_email)
                .delete(employee::delete),
        )
        .route(
            "/{id}/rates-registers",
            get(rates_register::list_by_employee),
        )
}
