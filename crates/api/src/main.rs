use std::net::SocketAddr;

use ratesreg_api::config::ServerConfig;
use ratesreg_api::router::build_app_router;
use ratesreg_api::state::AppState;
use ratesreg_db::Stores;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        persistent = config.database_url.is_some(),
        "Loaded server configuration"
    );

    let stores = open_stores(&config).await;

    // Reference codes and constraint schemas are resolved once; a bad
    // declaration or code file stops the server here.
    let state = AppState::build(stores, config.clone())
        .unwrap_or_else(|e| panic!("Invalid validation configuration: {e}"));

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Rates register API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratesreg_api=debug,ratesreg_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Postgres when `DATABASE_URL` is set (migrations applied on connect),
/// otherwise a process-local in-memory store.
async fn open_stores(config: &ServerConfig) -> Stores {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, records are kept in memory only");
        return Stores::memory();
    };

    let pool = ratesreg_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    ratesreg_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    ratesreg_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    Stores::postgres(pool)
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
