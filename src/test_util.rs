//! Shared helpers for route tests: an app wired to an in-memory database and
//! small request/response utilities.

use std::sync::Arc;

use axum::body::Body;
use axum::routing::get;
use axum::Router;
use http::Request;
use http_body_util::BodyExt;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::{routes, AppState};

pub async fn test_state() -> Arc<AppState> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    Arc::new(AppState {
        db: pool,
        config: Config::default(),
        realtime: Arc::new(RwLock::new(None)),
        push: Arc::new(RwLock::new(None)),
    })
}

/// The full API surface without the rate limiter and outer middleware.
pub async fn test_app() -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/auth", routes::auth::router())
        .nest("/api/notifications", routes::notifications::router())
        .nest("/api/device-tokens", routes::device_tokens::router())
        .nest("/api/drivers", routes::drivers::router())
        .nest("/api/investors", routes::investors::router())
        .nest("/api/vehicles", routes::vehicles::router())
        .nest("/api/investment-fds", routes::investment_fds::router())
        .nest(
            "/api/driver-plan-selections",
            routes::plan_selections::router(),
        )
        .nest("/api/transactions", routes::transactions::router())
        .nest("/api/investor-wallet", routes::wallet::router())
        .nest(
            "/api/investor-wallet-message",
            routes::wallet::message_router(),
        )
        .with_state(test_state().await)
}

pub fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn request_with_auth(
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    token: &str,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
