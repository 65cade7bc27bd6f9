//! Route definitions for the `/rates-registers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::rates_register;
use crate::state::AppState;

/// Routes mounted at `/rates-registers`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rates_register::list).post(rates_register::create))
        .route(
            "/{id}",
            get(rates_register::get_by_id).delete(rates_register::delete),
        )
}
