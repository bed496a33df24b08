//! Binary entrypoint: load configuration, bootstrap the database, serve.

use std::net::SocketAddr;
use std::sync::Arc;

use vezir_api::config::ServerConfig;
use vezir_api::router;
use vezir_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    let ip = config.host.parse().expect("HOST is not a valid IP address");
    let addr = SocketAddr::new(ip, config.port);

    let pool = bootstrap_database().await;
    let app = router::app(AppState::new(pool, Arc::new(config)));

    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server exited with an error");

    tracing::info!("Shutdown complete");
}

/// `RUST_LOG`-driven tracing with a development-friendly default filter.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vezir_api=debug,tower_http=debug".into()),
        )
        .init();
}

/// Connect, ping, migrate. Any failure aborts startup; a task server
/// without its database has nothing to serve.
async fn bootstrap_database() -> vezir_db::DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vezir_db::create_pool(&url)
        .await
        .expect("Postgres connection failed");

    vezir_db::health_check(&pool)
        .await
        .expect("Postgres did not answer the readiness ping");

    vezir_db::run_migrations(&pool)
        .await
        .expect("Migration run failed");

    tracing::info!("Database ready");
    pool
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM. Process managers
/// send SIGTERM first; handling both keeps interactive and managed
/// shutdowns equally clean.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("SIGINT handler installation failed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, draining"),
        () = terminate => tracing::info!("SIGTERM received, draining"),
    }
}
