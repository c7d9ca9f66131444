use anyhow::{Context, Result};

const DEFAULT_FRANCE_TRAVAIL_AUTH_URL: &str =
    "https://entreprise.francetravail.fr/connexion/oauth2/access_token?realm=/partenaire";
const DEFAULT_FRANCE_TRAVAIL_API_URL: &str = "https://api.francetravail.io/partenaire";
const DEFAULT_FRANCE_TRAVAIL_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base used to build public CV links. Falls back to `s3_endpoint`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub france_travail: FranceTravailConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Credentials and endpoints for the labor-market proxy.
///
/// Missing credentials are NOT a configuration error: the token exchange is
/// attempted with empty values and the identity provider rejects it.
#[derive(Clone)]
pub struct FranceTravailConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl FranceTravailConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

// Hand-written so the secret never lands in logs.
impl std::fmt::Debug for FranceTravailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FranceTravailConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            france_travail: FranceTravailConfig::from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl FranceTravailConfig {
    fn from_env() -> Result<Self> {
        Ok(FranceTravailConfig {
            client_id: std::env::var("FRANCE_TRAVAIL_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("FRANCE_TRAVAIL_CLIENT_SECRET").unwrap_or_default(),
            auth_url: std::env::var("FRANCE_TRAVAIL_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_FRANCE_TRAVAIL_AUTH_URL.to_string()),
            api_base_url: std::env::var("FRANCE_TRAVAIL_API_URL")
                .unwrap_or_else(|_| DEFAULT_FRANCE_TRAVAIL_API_URL.to_string()),
            timeout_secs: match std::env::var("FRANCE_TRAVAIL_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("FRANCE_TRAVAIL_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => DEFAULT_FRANCE_TRAVAIL_TIMEOUT_SECS,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
