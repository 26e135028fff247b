use crate::{ClientError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5000";

/// Name of the build-time variable holding the production backend URL.
pub const PRODUCTION_BASE_URL_VAR: &str = "VIOLATION_REPORT_API_BASE_URL";

const PRODUCTION_BASE_URL: Option<&str> = option_env!("VIOLATION_REPORT_API_BASE_URL");

/// Where the backend lives, chosen when the client is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiEnvironment {
    Development,
    Production,
}

impl ApiEnvironment {
    pub fn base_url(self) -> Result<String> {
        match self {
            Self::Development => Ok(DEVELOPMENT_BASE_URL.to_string()),
            Self::Production => PRODUCTION_BASE_URL
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ClientError::InvalidConfig(format!(
                        "{PRODUCTION_BASE_URL_VAR} was not set when this build was made"
                    ))
                }),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute http(s) URL the `/api/...` paths are appended to
    pub base_url: String,

    /// Per-request timeout
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEVELOPMENT_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    pub fn for_environment(environment: ApiEnvironment) -> Result<Self> {
        Ok(Self {
            base_url: environment.base_url()?,
            ..Self::default()
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(ClientError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| format!("base_url {:?} is not a valid URL: {err}", self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.timeout_ms == 0 {
            return Err("timeout_ms must be > 0".to_string());
        }

        Ok(())
    }
}
