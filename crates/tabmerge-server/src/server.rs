//! Router assembly and the listener loop.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_api_key;
use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Builds the application router. The API key check wraps every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets/{name}", get(handlers::dataset_data))
        .route("/datasets/{name}/schema", get(handlers::dataset_schema))
        .route("/etl/preview", get(handlers::etl_preview))
        .route("/etl/download", get(handlers::etl_download))
        .route("/etl/persist", post(handlers::etl_persist))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `config.bind_addr` and serves until Ctrl+C.
pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(
        %addr,
        data_dir = %config.data_dir.display(),
        sqlite_path = %config.sqlite_path.display(),
        "tabmerge listening"
    );

    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tabmerge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
