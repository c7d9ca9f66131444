//! HTTP surface of the labor-market proxy.
//!
//! Every response, errors and preflight included, carries the same three
//! fixed CORS headers.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::labor_market::proxy::{LaborMarketProxy, ProxyError};

/// Path kept from the serverless deployment so existing clients keep working.
pub const PROXY_PATH: &str = "/api/france-travail";
pub const PROXY_ALIAS_PATH: &str = "/api/v1/labor-market";

/// GET|POST /api/france-travail?endpoint=<name>&<params>
pub async fn handle_proxy(
    State(proxy): State<LaborMarketProxy>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    let endpoint = params.remove("endpoint");
    let payload = proxy.forward(endpoint.as_deref(), &params).await?;
    Ok(Json(payload))
}

/// OPTIONS preflight: 200, empty body.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

/// Builds the proxy routes with their CORS headers. Generic over the outer
/// router state so it can be merged into the application router.
pub fn router<S>(proxy: LaborMarketProxy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .route(
            PROXY_PATH,
            get(handle_proxy).post(handle_proxy).options(handle_preflight),
        )
        .route(
            PROXY_ALIAS_PATH,
            get(handle_proxy).post(handle_proxy).options(handle_preflight),
        )
        .layer(cors_headers)
        .with_state(proxy)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::FranceTravailConfig;
    use crate::labor_market::token_acquirer::HttpTokenExchange;
    use crate::labor_market::token_cache::TokenCache;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_PATH: &str = "/connexion/oauth2/access_token";

    /// Proxy wired to a single mock server playing both the identity
    /// provider and the labor-market API.
    async fn app_with_mock() -> (Router, MockServer) {
        let server = MockServer::start().await;
        let config = FranceTravailConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            auth_url: format!("{}{TOKEN_PATH}", server.uri()),
            api_base_url: format!("{}/partenaire", server.uri()),
            timeout_secs: 5,
        };
        let proxy = LaborMarketProxy::from_parts(
            Arc::new(TokenCache::new()),
            Arc::new(HttpTokenExchange::new(&config).unwrap()),
            reqwest::Client::new(),
            &config.api_base_url,
        );
        (router(proxy), server)
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "expires_in": 1499,
            })))
            .mount(server)
            .await;
    }

    async fn send(app: &Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_options_returns_empty_200_with_cors() {
        let (app, _server) = app_with_mock().await;

        let response = send(&app, Method::OPTIONS, "/api/france-travail?endpoint=metiers").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_400() {
        let (app, _server) = app_with_mock().await;

        let response = send(&app, Method::GET, "/api/france-travail?codeRome=M1607").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
        assert_eq!(body_json(response).await, json!({ "error": "Missing endpoint parameter" }));
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_400() {
        let (app, _server) = app_with_mock().await;

        for uri in [
            "/api/france-travail?endpoint=candidats",
            "/api/france-travail?endpoint=OFFRES&codeRome=M1607",
            "/api/france-travail?endpoint=metier&keyword=macon&lat=1&lon=2",
        ] {
            let response = send(&app, Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await, json!({ "error": "Unknown endpoint" }));
        }
    }

    #[tokio::test]
    async fn test_missing_required_parameter_is_400() {
        let (app, _server) = app_with_mock().await;

        let response = send(&app, Method::GET, "/api/france-travail?endpoint=marche").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Missing parameter: codeRome" }));
    }

    #[tokio::test]
    async fn test_success_relays_downstream_json() {
        let (app, server) = app_with_mock().await;
        mount_token(&server).await;

        let payload = json!({
            "resultats": [{ "id": "123ABC", "intitule": "Maçon (H/F)" }],
            "filtresPossibles": [],
        });
        Mock::given(method("GET"))
            .and(path("/partenaire/offresdemploi/v2/offres/search"))
            .and(query_param("codeRome", "F1703"))
            .and(query_param("range", "0-14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = send(&app, Method::GET, "/api/france-travail?endpoint=offres&codeRome=F1703").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn test_post_and_alias_behave_like_get() {
        let (app, server) = app_with_mock().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/partenaire/rome-metiers/v1/metiers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "code": "F1703" }])))
            .expect(2)
            .mount(&server)
            .await;

        let post = send(&app, Method::POST, "/api/france-travail?endpoint=metiers&keyword=macon").await;
        assert_eq!(post.status(), StatusCode::OK);

        let alias = send(&app, Method::GET, "/api/v1/labor-market?endpoint=metiers&keyword=macon").await;
        assert_eq!(alias.status(), StatusCode::OK);
        assert_eq!(body_json(alias).await, json!([{ "code": "F1703" }]));
    }

    #[tokio::test]
    async fn test_downstream_404_is_relayed_with_details() {
        let (app, server) = app_with_mock().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/partenaire/infotravail/v1/marche"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"msg":"not found"}"#))
            .mount(&server)
            .await;

        let response = send(&app, Method::GET, "/api/france-travail?endpoint=marche&codeRome=M1607").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "API Error: 404", "details": r#"{"msg":"not found"}"# })
        );
    }

    #[tokio::test]
    async fn test_auth_failure_is_500() {
        let (app, server) = app_with_mock().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let response = send(&app, Method::GET, "/api/france-travail?endpoint=metiers").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Auth error: 401", "details": "invalid_client" })
        );
    }

    #[tokio::test]
    async fn test_token_is_cached_across_http_requests() {
        let (app, server) = app_with_mock().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "expires_in": 1499,
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        for _ in 0..3 {
            let response = send(&app, Method::GET, "/api/france-travail?endpoint=metiers").await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        // `expect(1)` on the token mock is verified when the server drops.
    }
}
