//! Settings resolved for one invocation
//!
//! Precedence: command-line flags, then `LABELCHECK_*` variables, then the
//! configuration file, then built-in defaults.

use crate::GlobalArgs;
use anyhow::Result;
use labelcheck_api_client::{ClientConfig, OpenFoodFactsClient};
use labelcheck_cli::{OutputFormat, Status};
use labelcheck_core::config::Config;
use labelcheck_core::preferences::{self, PreferenceStore};
use labelcheck_core::{Error, ErrorCode, Locale};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Everything a command needs
pub struct AppContext {
    pub config: Config,
    pub locale: Locale,
    pub format: OutputFormat,
    pub store: PreferenceStore,
}

impl AppContext {
    /// Resolve configuration, locale and preference location
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config = Config::load(args.config.as_deref())?;
        let locale = args.locale.unwrap_or(config.schema.display.locale);

        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| config.schema.storage.data_dir.clone())
            .or_else(preferences::default_data_dir)
            .ok_or_else(|| {
                Error::new(ErrorCode::StorageUnavailable, "No data directory available")
                    .with_suggestion("Pass --data-dir or set LABELCHECK_DATA_DIR")
            })?;

        let store = PreferenceStore::open(&data_dir);
        debug!(
            config = ?config.path,
            preferences = %store.path().display(),
            locale = %locale,
            "Context resolved"
        );

        Ok(Self {
            config,
            locale,
            format: args.format,
            store,
        })
    }

    /// Client for the configured product database
    pub fn client(&self) -> Result<OpenFoodFactsClient> {
        let config = ClientConfig::from_api_config(&self.config.schema.api);
        Ok(OpenFoodFactsClient::with_config(config)?)
    }

    /// Current selection; unreadable storage counts as an empty selection
    pub fn selected(&self) -> BTreeSet<String> {
        match self.store.get_selected() {
            Ok(selected) => selected,
            Err(e) => {
                warn!(error = %e, "Falling back to an empty allergen selection");
                if !self.format.is_json() {
                    Status::warning(&format!("Could not read your allergen selection: {}", e.message));
                }
                BTreeSet::new()
            }
        }
    }
}
