//! Proxy Handler core: validates the request, resolves the endpoint, obtains
//! a token and relays the downstream answer.
//!
//! Flow: endpoint check → `endpoints::resolve` → cache read → (miss) acquire →
//! GET downstream → relay JSON or a normalized error. Nothing is retried and
//! no partial result is ever returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::{header::ACCEPT, Client};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::FranceTravailConfig;
use crate::labor_market::endpoints::{self, RouteError};
use crate::labor_market::token_acquirer::{AuthError, HttpTokenExchange, TokenAcquirer, TokenExchange};
use crate::labor_market::token_cache::TokenCache;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing endpoint parameter")]
    MissingEndpoint,

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("API Error: {status}")]
    Downstream { status: u16, body: String },

    #[error("{0}")]
    Unexpected(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            ProxyError::MissingEndpoint => (StatusCode::BAD_REQUEST, None),
            ProxyError::Route(RouteError::InvalidUrl(_)) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            ProxyError::Route(_) => (StatusCode::BAD_REQUEST, None),
            ProxyError::Auth(AuthError::Rejected { body, .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(body.clone()))
            }
            ProxyError::Auth(AuthError::Transport(_)) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            ProxyError::Downstream { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                Some(body.clone()),
            ),
            ProxyError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = match details {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Shared proxy state. Cheap to clone; every clone shares the same token cache.
#[derive(Clone)]
pub struct LaborMarketProxy {
    cache: Arc<TokenCache>,
    acquirer: TokenAcquirer,
    client: Client,
    api_base_url: Arc<str>,
}

impl LaborMarketProxy {
    pub fn new(config: &FranceTravailConfig) -> anyhow::Result<Self> {
        // Fail at startup rather than on every request.
        reqwest::Url::parse(&config.api_base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let exchange = Arc::new(HttpTokenExchange::new(config)?);

        Ok(Self::from_parts(
            Arc::new(TokenCache::new()),
            exchange,
            client,
            &config.api_base_url,
        ))
    }

    pub fn from_parts(
        cache: Arc<TokenCache>,
        exchange: Arc<dyn TokenExchange>,
        client: Client,
        api_base_url: &str,
    ) -> Self {
        Self {
            acquirer: TokenAcquirer::new(cache.clone(), exchange),
            cache,
            client,
            api_base_url: Arc::from(api_base_url),
        }
    }

    /// Runs one proxied request. `endpoint` is the raw `endpoint` query value;
    /// `params` holds every other query parameter.
    pub async fn forward(
        &self,
        endpoint: Option<&str>,
        params: &HashMap<String, String>,
    ) -> Result<Value, ProxyError> {
        let name = endpoint
            .filter(|name| !name.is_empty())
            .ok_or(ProxyError::MissingEndpoint)?;

        let resolved = endpoints::resolve(&self.api_base_url, name, params)?;
        debug!("Resolved labor-market endpoint {name} -> {}", resolved.url.path());

        let token = self.access_token(resolved.scopes).await?;

        let response = self
            .client
            .get(resolved.url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProxyError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Labor-market API error on {name} ({status}): {body}");
            return Err(ProxyError::Downstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Unexpected(e.to_string()))?;
        let payload = serde_json::from_slice::<Value>(&bytes)
            .map_err(|e| ProxyError::Unexpected(format!("Invalid JSON from {name}: {e}")))?;

        debug!("Relaying {name} response ({} bytes)", bytes.len());
        Ok(payload)
    }

    /// Cached token if still fresh, otherwise a newly acquired one.
    /// The slot is not keyed by scope: a fresh token is reused for every endpoint.
    async fn access_token(&self, scopes: &[&str]) -> Result<String, AuthError> {
        if let Some(cached) = self.cache.get().await {
            debug!("Labor-market token cache hit");
            return Ok(cached.token);
        }
        debug!("Labor-market token cache miss");
        self.acquirer.acquire(scopes).await
    }
}
