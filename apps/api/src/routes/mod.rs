pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::generation::handlers as ads;
use crate::labor_market::{self, LaborMarketProxy};
use crate::recruitment::handlers as recruitment;
use crate::state::AppState;

/// Application routes get permissive CORS; the labor-market proxy is merged
/// afterwards so it keeps its own fixed CORS headers.
pub fn build_router(state: AppState, proxy: LaborMarketProxy) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ad generation
        .route("/api/v1/ads/generate", post(ads::handle_generate_ads))
        .route("/api/v1/ads/suggest", post(ads::handle_suggest_details))
        // Publishing
        .route(
            "/api/v1/job-posts",
            post(recruitment::handle_publish_job_post).get(recruitment::handle_list_job_posts),
        )
        .route(
            "/api/v1/public/job-posts/:slug",
            get(recruitment::handle_get_public_job_post),
        )
        .route(
            "/api/v1/public/job-posts/:slug/applications",
            post(recruitment::handle_submit_application)
                .layer(DefaultBodyLimit::max(recruitment::APPLICATION_BODY_LIMIT)),
        )
        // Application tracking
        .route("/api/v1/applications", get(recruitment::handle_list_applications))
        .route(
            "/api/v1/applications/:id/status",
            patch(recruitment::handle_update_application_status),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .merge(labor_market::router(proxy))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::generator::testing::CannedGenerator;
    use crate::labor_market::token_acquirer::testing::CountingExchange;
    use crate::labor_market::token_cache::TokenCache;

    fn app() -> Router {
        let proxy = LaborMarketProxy::from_parts(
            Arc::new(TokenCache::new()),
            Arc::new(CountingExchange::granting(1500)),
            reqwest::Client::new(),
            "http://127.0.0.1:1",
        );
        build_router(
            AppState::for_tests(Arc::new(CannedGenerator::replying(json!({})))),
            proxy,
        )
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recrutpro-api");
    }

    #[tokio::test]
    async fn test_proxy_keeps_its_own_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/france-travail")
                    .header(header::ORIGIN, "https://recrutpro.fr")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        let origins: Vec<_> = headers
            .get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .iter()
            .collect();
        assert_eq!(origins, vec!["*"]);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_app_routes_are_cors_enabled() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/job-posts")
                    .header(header::ORIGIN, "https://recrutpro.fr")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_proxy_missing_endpoint_through_full_router() {
        let response = app()
            .oneshot(Request::get("/api/france-travail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Missing endpoint parameter" }));
    }
}
