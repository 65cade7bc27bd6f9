//! Liveness route, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `"ok"`, or `"degraded"` when the store does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreReport,
    /// Size of the currency code set register validation runs against.
    pub currency_codes: usize,
}

#[derive(Debug, Serialize)]
pub struct StoreReport {
    pub backend: &'static str,
    pub healthy: bool,
}

/// GET /health
///
/// Always 200 while the process serves requests; an unreachable store is
/// reported in the body as `"degraded"`.
async fn report(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let store = &state.stores.health;
    let healthy = match store.health_check().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, backend = store.backend(), "Store health check failed");
            false
        }
    };

    let report = HealthReport {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: StoreReport {
            backend: store.backend(),
            healthy,
        },
        currency_codes: state.codes.len(),
    };
    (StatusCode::OK, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
