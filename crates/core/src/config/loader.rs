//! Configuration file loading

use super::schema::{ConfigSchema, Environment};
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loaded configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from; `None` for defaults
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, else the first file found in the standard
    /// locations, else defaults; then apply `LABELCHECK_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load without environment overrides
    pub fn load_file(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        debug!(path = ?config_path, "Configuration loaded");
        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Apply overrides read through `var`
    ///
    /// Recognized keys: `LABELCHECK_ENV`, `LABELCHECK_API_URL`,
    /// `LABELCHECK_TIMEOUT_SECS`, `LABELCHECK_DATA_DIR`, `LABELCHECK_LOCALE`.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = var("LABELCHECK_ENV") {
            self.schema.api.environment = Environment::parse(&env);
        }
        if let Some(url) = var("LABELCHECK_API_URL") {
            self.schema.api.base_url = Some(url);
        }
        if let Some(secs) = var("LABELCHECK_TIMEOUT_SECS") {
            self.schema.api.timeout_secs = secs.trim().parse().map_err(|_| {
                Error::new(
                    ErrorCode::InvalidConfigValue,
                    format!("LABELCHECK_TIMEOUT_SECS is not a number: {secs}"),
                )
            })?;
        }
        if let Some(dir) = var("LABELCHECK_DATA_DIR") {
            self.schema.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(locale) = var("LABELCHECK_LOCALE") {
            self.schema.display.locale = locale
                .parse()
                .map_err(|e: String| Error::new(ErrorCode::InvalidConfigValue, e))?;
        }
        Ok(())
    }
}

/// Find a configuration file in the standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("labelcheck.toml"),
        PathBuf::from(".labelcheck.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("labelcheck").join("config.toml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("While loading {}", path.display()))
    })
}
