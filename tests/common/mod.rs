// Common test utilities shared by the integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use toolbox_backend::{
    app::AppState,
    build_router,
    db::{create_diesel_pool, create_lazy_diesel_pool, DieselDatabaseConfig, DieselPool},
    migrations::diesel::run_migrations,
};
use tower::util::ServiceExt;

/// Nothing listens on port 1, so checkouts fail fast
pub const UNREACHABLE_DATABASE_URL: &str = "postgres://nobody@127.0.0.1:1/toolbox";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub diesel_pool: DieselPool,
}

impl TestApp {
    fn from_pool(diesel_pool: DieselPool, public_base_url: Option<&str>) -> Self {
        let state = AppState {
            diesel_pool: diesel_pool.clone(),
            public_base_url: public_base_url.map(Arc::from),
            cors_allowed_origins: Arc::new(vec!["*".to_string()]),
            max_connections: 5,
        };

        Self {
            app: build_router(state),
            diesel_pool,
        }
    }

    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }

    /// Send an OPTIONS request
    pub fn options(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "OPTIONS", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: &'static str,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    custom_ip: Option<String>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &'static str, uri: &str) -> Self {
        Self {
            app,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            custom_ip: None,
        }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_vec(body).unwrap();
        self.header("content-type", "application/json")
    }

    /// Send the bytes as-is, whatever they contain
    pub fn raw_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the peer address seen by the server
    pub fn with_ip(mut self, ip: &str) -> Self {
        self.custom_ip = Some(ip.to_string());
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut request = builder.body(Body::from(self.body)).unwrap();

        // Simulate a client connection
        let ip_address = self
            .custom_ip
            .unwrap_or_else(|| "127.0.0.1".to_string());
        request.extensions_mut().insert(ConnectInfo(
            format!("{}:12345", ip_address).parse::<SocketAddr>().unwrap(),
        ));

        let response = self.app.app.clone().oneshot(request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

/// App whose database is unreachable; enough for every route that never
/// touches PostgreSQL. Must be called inside a tokio runtime.
pub fn setup_offline_app() -> TestApp {
    let db_config = DieselDatabaseConfig {
        max_connections: 1,
        min_connections: 0,
        connection_timeout: Duration::from_millis(200),
        test_on_checkout: false,
        ..DieselDatabaseConfig::new(UNREACHABLE_DATABASE_URL)
    };
    TestApp::from_pool(create_lazy_diesel_pool(db_config), None)
}

/// App backed by the database in `DATABASE_URL`, migrated to the latest
/// schema. Returns `None` when no database is configured.
pub async fn setup_database_app(public_base_url: Option<&str>) -> Option<TestApp> {
    dotenv::from_filename(".env.test").ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        },
    };

    run_migrations(database_url.clone())
        .await
        .expect("Failed to run migrations");

    let db_config = DieselDatabaseConfig {
        max_connections: 5,
        min_connections: 0,
        ..DieselDatabaseConfig::new(database_url)
    };
    let diesel_pool = create_diesel_pool(db_config)
        .await
        .expect("Failed to create database pool");

    Some(TestApp::from_pool(diesel_pool, public_base_url))
}
