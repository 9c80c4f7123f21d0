//! Route modules for the signing server

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod pdf;
pub mod signature;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_file_size = state.config().server.max_file_size;

    Router::new()
        .merge(health::router())
        .merge(signature::router())
        .merge(pdf::router(max_file_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::signature::mock::MockFetcher;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health() {
        let mut config = Config::default();
        config.server.environment = "test".to_string();
        let server = TestServer::new(router(AppState::new(config, Arc::new(MockFetcher::new())))).unwrap();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["environment"], "test");
        assert!(body["timestamp"].is_string());
    }
}
