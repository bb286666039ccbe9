//! Configuration schema definitions

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[api]`: product lookup
    #[serde(default)]
    pub api: ApiConfig,

    /// `[storage]`: where preferences are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// `[display]`: presentation
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Product database deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local mirror of the product database
    Development,
    /// Open Food Facts staging (`.net`)
    Staging,
    /// Open Food Facts production (`.org`)
    #[default]
    Production,
}

impl Environment {
    /// Parse a loose environment name; unknown names mean production
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Default service root for this environment
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => "http://localhost:8080",
            Self::Staging => "https://world.openfoodfacts.net",
            Self::Production => "https://world.openfoodfacts.org",
        }
    }
}

/// Product lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Deployment to use when `base_url` is not set
    #[serde(default)]
    pub environment: Environment,

    /// Explicit service root, overrides `environment`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side cap on lookups per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl ApiConfig {
    /// Service root after applying the environment default
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.environment.base_url().to_string())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requests_per_minute() -> u32 {
    100
}

/// Where preferences are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Data directory; the platform data directory when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Locale for allergen names and product text
    #[serde(default)]
    pub locale: Locale,
}
