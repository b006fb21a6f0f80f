// Library exports for the toolbox backend
// Exposes the router so binaries and integration tests share one definition

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::AppConfig;
pub use db::{DieselDatabaseConfig, DieselPool};
pub use services::{GenerationOptions, PasswordError, PasswordGenerator, ValidationRequirements};
pub use utils::ServiceError;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application router: every API route under `/api/v1`, the JSON 404
/// fallback, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(handlers::password_routes())
        .merge(handlers::qr_routes())
        .merge(handlers::url_routes())
        .merge(handlers::meta_routes());

    Router::new()
        .nest("/api/v1", api)
        .fallback(handlers::fallback)
        .layer(axum::middleware::from_fn_with_state(
            state.cors_allowed_origins.clone(),
            middleware::cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect to the database, run migrations when enabled and build the state
pub async fn initialize_app_state(
    config: &AppConfig,
) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    use tracing::info;

    info!("Initializing database pool...");
    let db_config = DieselDatabaseConfig::from_app_config(config);
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    if migrations::should_run_migrations(config) {
        info!("Running embedded migrations...");
        let migration_config = migrations::MigrationConfig::from_app_config(config);
        migrations::run_all_migrations(migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    Ok(AppState::new(diesel_pool, config))
}
