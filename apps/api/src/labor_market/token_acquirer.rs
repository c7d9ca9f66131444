//! Token Acquirer: client-credentials exchange against the identity provider.
//!
//! `TokenExchange` is the network seam (one POST per call). `TokenAcquirer`
//! wraps it and performs exactly one cache write per successful exchange.
//! Failures are never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::FranceTravailConfig;
use crate::labor_market::token_cache::TokenCache;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status.
    #[error("Auth error: {status}")]
    Rejected { status: u16, body: String },

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Successful token endpoint payload. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
}

#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchanges the client credentials for a token covering `scope`
    /// (space-separated scope identifiers).
    async fn exchange(&self, scope: &str) -> Result<TokenGrant, AuthError>;
}

/// `TokenExchange` over HTTP: form-encoded POST to the configured token endpoint.
pub struct HttpTokenExchange {
    client: Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpTokenExchange {
    pub fn new(config: &FranceTravailConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, scope: &str) -> Result<TokenGrant, AuthError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self.client.post(&self.auth_url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Token exchange rejected with {status}: {body}");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<TokenGrant>().await?)
    }
}

/// Acquires a fresh token and stores it in the shared cache.
#[derive(Clone)]
pub struct TokenAcquirer {
    cache: Arc<TokenCache>,
    exchange: Arc<dyn TokenExchange>,
}

impl TokenAcquirer {
    pub fn new(cache: Arc<TokenCache>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self { cache, exchange }
    }

    pub async fn acquire(&self, scopes: &[&str]) -> Result<String, AuthError> {
        let scope = scopes.join(" ");
        let grant = self.exchange.exchange(&scope).await?;

        self.cache
            .set(grant.access_token.clone(), grant.expires_in)
            .await;
        info!(
            "Acquired labor-market token for scopes [{scope}], expires in {}s",
            grant.expires_in
        );

        Ok(grant.access_token)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory `TokenExchange` that counts calls and records requested scopes.
    pub struct CountingExchange {
        pub calls: AtomicUsize,
        pub scopes: std::sync::Mutex<Vec<String>>,
        pub expires_in: i64,
        pub reject_with: Option<u16>,
    }

    impl CountingExchange {
        pub fn granting(expires_in: i64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                scopes: std::sync::Mutex::new(Vec::new()),
                expires_in,
                reject_with: None,
            }
        }

        pub fn rejecting(status: u16) -> Self {
            Self {
                reject_with: Some(status),
                ..Self::granting(0)
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenExchange for CountingExchange {
        async fn exchange(&self, scope: &str) -> Result<TokenGrant, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.scopes.lock().unwrap().push(scope.to_string());
            if let Some(status) = self.reject_with {
                return Err(AuthError::Rejected {
                    status,
                    body: "invalid_client".to_string(),
                });
            }
            Ok(TokenGrant {
                access_token: format!("token-{n}"),
                expires_in: self.expires_in,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CountingExchange;
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> FranceTravailConfig {
        FranceTravailConfig {
            client_id: "my-client".to_string(),
            client_secret: "my-secret".to_string(),
            auth_url: format!("{}/connexion/oauth2/access_token", server.uri()),
            api_base_url: server.uri(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_http_exchange_posts_client_credentials_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connexion/oauth2/access_token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=my-client"))
            .and(body_string_contains("client_secret=my-secret"))
            .and(body_string_contains("scope=a+b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 1499,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&config_for(&server)).unwrap();
        let grant = exchange.exchange("a b").await.unwrap();

        assert_eq!(grant.access_token, "tok");
        assert_eq!(grant.expires_in, 1499);
    }

    #[tokio::test]
    async fn test_http_exchange_surfaces_status_and_body_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&config_for(&server)).unwrap();
        let err = exchange.exchange("a").await.unwrap_err();

        match err {
            AuthError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid_client");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_exchange_malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let exchange = HttpTokenExchange::new(&config_for(&server)).unwrap();
        let err = exchange.exchange("a").await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }

    #[tokio::test]
    async fn test_acquire_joins_scopes_and_writes_cache() {
        let cache = Arc::new(TokenCache::new());
        let exchange = Arc::new(CountingExchange::granting(3600));
        let acquirer = TokenAcquirer::new(cache.clone(), exchange.clone());

        let token = acquirer
            .acquire(&["scope_rome_metiers", "nomenclatureRome"])
            .await
            .unwrap();

        assert_eq!(token, "token-1");
        assert_eq!(
            exchange.scopes.lock().unwrap().as_slice(),
            ["scope_rome_metiers nomenclatureRome"]
        );
        assert_eq!(cache.get().await.map(|c| c.token), Some("token-1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_acquire_leaves_cache_untouched() {
        let cache = Arc::new(TokenCache::new());
        let acquirer = TokenAcquirer::new(cache.clone(), Arc::new(CountingExchange::rejecting(401)));

        assert!(acquirer.acquire(&["x"]).await.is_err());
        assert!(cache.get().await.is_none());
    }
}
