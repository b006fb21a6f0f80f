// Health check handler

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::{app::AppState, db};

/// Report service health and database reachability
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let (healthy, postgres_health) = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(()) => (
            true,
            json!({
                "status": "healthy",
                "max_connections": state.max_connections,
                "error": null
            }),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                false,
                json!({
                    "status": "unhealthy",
                    "error": format!("Database connection failed: {}", e)
                }),
            )
        },
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "toolbox-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    });

    if healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
