use std::sync::Arc;

use ratesreg_core::currency::ReferenceCodeSet;
use ratesreg_core::error::CoreError;
use ratesreg_core::validation::Schemas;
use ratesreg_db::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Record stores (Postgres or in-memory).
    pub stores: Stores,
    /// Resolved constraint schemas, read-only after startup.
    pub schemas: Arc<Schemas>,
    /// Currency codes the schemas validate against.
    pub codes: Arc<ReferenceCodeSet>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Load reference codes and resolve constraint schemas.
    ///
    /// Any error here is a configuration problem and should abort startup.
    pub fn build(stores: Stores, config: ServerConfig) -> Result<Self, CoreError> {
        let codes = Arc::new(config.reference_codes()?);
        tracing::info!(codes = codes.len(), "Loaded reference currency codes");

        let schemas = Schemas::with_codes(Arc::clone(&codes))?;

        Ok(Self {
            stores,
            schemas: Arc::new(schemas),
            codes,
            config: Arc::new(config),
        })
    }
}
