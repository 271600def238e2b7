//! Environment-driven configuration.

use reqwest::Url;
use shopfront_observability::RumConfig;
use thiserror::Error;

pub const API_URL_VAR: &str = "SHOPFRONT_API_URL";
pub const API_TOKEN_VAR: &str = "SHOPFRONT_API_TOKEN";
pub const RUM_COLLECTOR_URL_VAR: &str = "SHOPFRONT_RUM_COLLECTOR_URL";
pub const RUM_APPLICATION_ID_VAR: &str = "SHOPFRONT_RUM_APPLICATION_ID";
pub const RUM_CLIENT_TOKEN_VAR: &str = "SHOPFRONT_RUM_CLIENT_TOKEN";
pub const RUM_SERVICE_VAR: &str = "SHOPFRONT_RUM_SERVICE";
pub const RUM_ENV_VAR: &str = "SHOPFRONT_RUM_ENV";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is not a valid base URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Product service base URL.
    pub api_url: Url,
    pub api_token: Option<String>,
    pub rum: RumConfig,
}

impl StorefrontConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration baked in at compile time.
    ///
    /// The browser has no process environment, so values are captured from
    /// the build environment instead.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                API_URL_VAR => option_env!("SHOPFRONT_API_URL"),
                API_TOKEN_VAR => option_env!("SHOPFRONT_API_TOKEN"),
                RUM_COLLECTOR_URL_VAR => option_env!("SHOPFRONT_RUM_COLLECTOR_URL"),
                RUM_APPLICATION_ID_VAR => option_env!("SHOPFRONT_RUM_APPLICATION_ID"),
                RUM_CLIENT_TOKEN_VAR => option_env!("SHOPFRONT_RUM_CLIENT_TOKEN"),
                RUM_SERVICE_VAR => option_env!("SHOPFRONT_RUM_SERVICE"),
                RUM_ENV_VAR => option_env!("SHOPFRONT_RUM_ENV"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get(API_URL_VAR).ok_or(ConfigError::Missing(API_URL_VAR))?;
        let api_url = parse_base_url(API_URL_VAR, &api_url)?;

        let collector_url = match get(RUM_COLLECTOR_URL_VAR) {
            Some(url) => Some(parse_base_url(RUM_COLLECTOR_URL_VAR, &url)?.to_string()),
            None => None,
        };

        let defaults = RumConfig::default();
        let rum = RumConfig {
            collector_url,
            application_id: get(RUM_APPLICATION_ID_VAR).unwrap_or(defaults.application_id),
            client_token: get(RUM_CLIENT_TOKEN_VAR),
            service: get(RUM_SERVICE_VAR).unwrap_or(defaults.service),
            env: get(RUM_ENV_VAR).unwrap_or(defaults.env),
        };

        Ok(Self {
            api_url,
            api_token: get(API_TOKEN_VAR),
            rum,
        })
    }
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}
