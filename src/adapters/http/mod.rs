//! HTTP adapters - REST API implementations.
//!
//! The checkout module has its own adapter; this module assembles the
//! application router and the cross-cutting layers around it.

pub mod checkout;

pub use checkout::{checkout_router, CheckoutAppState};

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router with all routes and layers.
///
/// # Routes
///
/// - `GET /health`
/// - `/api/checkout/*` - see [`checkout::checkout_routes`]
pub fn build_router(state: CheckoutAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", checkout_router())
        .with_state(state)
        .route("/health", get(health))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer allowing the configured origins, or any origin when none are set.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::catalogue::InMemoryCourseCatalogue;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryCheckoutRepository;
    use crate::domain::checkout::NavigationPaths;
    use crate::domain::foundation::Locale;

    fn router() -> Router {
        let state = CheckoutAppState::new(
            Arc::new(InMemoryCheckoutRepository::new()),
            Arc::new(InMemoryCourseCatalogue::new()),
            Arc::new(InMemoryEventBus::new()),
            NavigationPaths::default(),
            Locale::En,
        );
        build_router(state, &ServerConfig::default())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = router()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn cors_layer_accepts_explicit_origins() {
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
        let _ = cors_layer(&[]);
    }
}
