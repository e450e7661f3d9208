//! Client configuration parsed from environment variables.

use crate::token::{ExpiryRules, MissingExpiryPolicy};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/";
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Backend paths, relative to [`ClientConfig::api_url`] unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub token_login: String,
    pub sign_up: String,
    pub forgot_password: String,
    pub reset_password: String,
    pub unlock_session: String,
    pub user_detail: String,
    pub user_update: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "supra-auth/Authentication/Login".into(),
            token_login: "supra-auth/Authentication/LoginComToken".into(),
            sign_up: "supra-auth/Registros/RegistrarConta".into(),
            forgot_password: "api/auth/forgot-password".into(),
            reset_password: "api/auth/reset-password".into(),
            unlock_session: "api/auth/unlock-session".into(),
            user_detail: "supra-admin/Usuarios/RecuperarUsuario?LogonEmail=threaduser1@empresa.com.br".into(),
            user_update: "api/common/user".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every relative endpoint is joined onto. Always ends in `/`.
    pub api_url: String,
    /// Key under which the access token is persisted.
    pub token_key: String,
    pub expiry: ExpiryRules,
    pub timeouts: HttpTimeouts,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            token_key: DEFAULT_TOKEN_KEY.into(),
            expiry: ExpiryRules::default(),
            timeouts: HttpTimeouts::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `SUPRA_API_URL`: default `http://localhost:5000/`
    /// - `SUPRA_TOKEN_KEY`: default `accessToken`
    /// - `SUPRA_TOKEN_EXPIRY_LEEWAY_SECS`: default 0
    /// - `SUPRA_MISSING_EXPIRY`: `expired` (default) or `valid`
    /// - `SUPRA_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SUPRA_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SUPRA_USER_DETAIL_PATH`: overrides the user-detail endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown `SUPRA_MISSING_EXPIRY` value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(&std::env::var("SUPRA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()));
        let token_key = std::env::var("SUPRA_TOKEN_KEY").unwrap_or_else(|_| DEFAULT_TOKEN_KEY.into());
        let expiry = ExpiryRules {
            leeway_secs: env_parse_u64("SUPRA_TOKEN_EXPIRY_LEEWAY_SECS", 0),
            missing: parse_missing_expiry(std::env::var("SUPRA_MISSING_EXPIRY").ok().as_deref())?,
        };
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("SUPRA_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SUPRA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let mut endpoints = Endpoints::default();
        if let Ok(path) = std::env::var("SUPRA_USER_DETAIL_PATH") {
            endpoints.user_detail = path;
        }

        Ok(Self { api_url, token_key, expiry, timeouts, endpoints })
    }
}

fn normalize_api_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_missing_expiry(raw: Option<&str>) -> Result<MissingExpiryPolicy, ConfigError> {
    match raw.unwrap_or("expired") {
        "expired" => Ok(MissingExpiryPolicy::Expired),
        "valid" => Ok(MissingExpiryPolicy::Valid),
        other => Err(ConfigError::Parse(format!(
            "unsupported SUPRA_MISSING_EXPIRY '{other}' (expected 'expired' or 'valid')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
