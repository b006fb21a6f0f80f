// Application state and configuration
use std::sync::Arc;

use crate::{app_config::AppConfig, db::DieselPool};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub diesel_pool: DieselPool,
    /// Fixed base for short URLs; derived from the request Host when unset
    pub public_base_url: Option<Arc<str>>,
    pub cors_allowed_origins: Arc<Vec<String>>,
    pub max_connections: u32,
}

impl AppState {
    pub fn new(diesel_pool: DieselPool, config: &AppConfig) -> Self {
        Self {
            diesel_pool,
            public_base_url: config.public_base_url.as_deref().map(Arc::from),
            cors_allowed_origins: Arc::new(config.cors_allowed_origins.clone()),
            max_connections: config.database_max_connections,
        }
    }
}
