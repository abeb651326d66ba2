//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use growth_points_core::{PricingConfig, RewardConfig};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the ledger data directory (default: "/data/growth-points").
    pub data_dir: String,

    /// HS256 secret used to verify user JWTs.
    pub jwt_secret: String,

    /// Service API key for service-to-service auth.
    pub service_api_key: Option<String>,

    /// Generation backend URL (optional).
    pub genai_api_url: Option<String>,

    /// Generation backend API key (optional).
    pub genai_api_key: Option<String>,

    /// Generation backend request timeout in seconds.
    pub genai_timeout_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Point cost of each generation mode.
    pub pricing: PricingConfig,

    /// Referral reward ranges.
    pub rewards: RewardConfig,
}

/// Generation backend secrets file structure.
#[derive(Debug, Deserialize)]
struct GenAiSecrets {
    api_url: String,
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and the optional
    /// secrets file.
    #[must_use]
    pub fn from_env() -> Self {
        let (genai_api_url, genai_api_key) = load_genai_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/growth-points".into()),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!("JWT_SECRET not set, using development default");
                "dev-secret".into()
            }),
            service_api_key: std::env::var("SERVICE_API_KEY").ok(),
            genai_api_url,
            genai_api_key,
            genai_timeout_seconds: env_parse("GENAI_TIMEOUT_SECONDS", 30),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES", 1024 * 1024),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS", 30),
            pricing: PricingConfig {
                text: env_parse("POINTS_COST_TEXT", 10),
                image: env_parse("POINTS_COST_IMAGE", 5),
                code: env_parse("POINTS_COST_CODE", 10),
                speech: env_parse("POINTS_COST_SPEECH", 5),
            },
            rewards: RewardConfig {
                inviter_min: env_parse("REFERRAL_INVITER_MIN", 5),
                inviter_max: env_parse("REFERRAL_INVITER_MAX", 10),
                invitee_min: env_parse("REFERRAL_INVITEE_MIN", 3),
                invitee_max: env_parse("REFERRAL_INVITEE_MAX", 8),
            },
        }
    }
}

/// Parse an environment variable, falling back to a default.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Load generation backend secrets from file or environment.
fn load_genai_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/genai.json", "../.secrets/genai.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<GenAiSecrets>(path) {
            tracing::info!(path = %path, "Loaded generation backend secrets from file");
            return (Some(secrets.api_url), Some(secrets.api_key));
        }
    }

    tracing::debug!("Generation secrets file not found, using environment variables");
    (
        std::env::var("GENAI_API_URL").ok(),
        std::env::var("GENAI_API_KEY").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/growth-points".into(),
            jwt_secret: "dev-secret".into(),
            service_api_key: None,
            genai_api_url: None,
            genai_api_key: None,
            genai_timeout_seconds: 30,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            pricing: PricingConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}
