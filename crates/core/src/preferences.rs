//! Durable allergen preference store
//!
//! Preferences live in a single JSON document in the data directory:
//!
//! ```json
//! { "selected_allergens": ["en:gluten", "en:milk"], "allergens_enabled": false }
//! ```
//!
//! Writes go to a temporary sibling file which is then renamed over the
//! target, so a crash mid-write leaves the previous document intact. The
//! store is single-writer within one process.
//!
//! Reads of a corrupt document fail with [`ErrorCode::StorageCorrupt`].
//! Replacing the selection overwrites such a document with a valid one.

use crate::error::{Error, ErrorCode, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the preference document
pub const PREFERENCES_FILE: &str = "allergen_preferences.json";

/// Persisted preference document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(default)]
    selected_allergens: BTreeSet<String>,
    /// Reserved switch for allergen checking; stored but not consulted
    #[serde(default)]
    allergens_enabled: bool,
}

/// File-backed store for the user's allergen selection
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Open the store inside `data_dir`
    ///
    /// Nothing is touched on disk until the first write.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    /// Open the store in the platform data directory
    pub fn open_default() -> Result<Self> {
        let dir = default_data_dir().ok_or_else(|| {
            Error::new(ErrorCode::StorageUnavailable, "No data directory on this platform")
                .with_suggestion("Pass --data-dir or set LABELCHECK_DATA_DIR")
        })?;
        Ok(Self::open(dir))
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Currently selected allergen codes; empty on a fresh install
    pub fn get_selected(&self) -> Result<BTreeSet<String>> {
        Ok(self.load()?.selected_allergens)
    }

    /// Replace the selection wholesale
    ///
    /// A corrupt document is replaced; its other keys fall back to defaults.
    pub fn set_selected(&self, codes: &BTreeSet<String>) -> Result<()> {
        let mut doc = self.load_or_reset()?;
        doc.selected_allergens = codes.clone();
        self.save(&doc)
    }

    /// Add the code if absent, remove it if present; returns the new selection
    pub fn toggle(&self, code: &str) -> Result<BTreeSet<String>> {
        let mut selected = self.get_selected()?;
        if !selected.remove(code) {
            selected.insert(code.to_string());
        }
        self.set_selected(&selected)?;
        Ok(selected)
    }

    /// Remove every selected code
    pub fn clear(&self) -> Result<()> {
        self.set_selected(&BTreeSet::new())
    }

    /// Reserved "allergen checking enabled" flag, `false` by default
    pub fn allergens_enabled(&self) -> Result<bool> {
        Ok(self.load()?.allergens_enabled)
    }

    /// Persist the reserved flag
    pub fn set_allergens_enabled(&self, enabled: bool) -> Result<()> {
        let mut doc = self.load()?;
        doc.allergens_enabled = enabled;
        self.save(&doc)
    }

    fn load(&self) -> Result<PreferenceDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PreferenceDocument::default());
            }
            Err(e) => return Err(Error::storage_unavailable(&self.path).with_source(e)),
        };

        if content.trim().is_empty() {
            return Ok(PreferenceDocument::default());
        }

        serde_json::from_str(&content)
            .map_err(Error::from)
            .context(format!("Parsing {}", self.path.display()))
            .with_suggestion(
                "Run `labelcheck allergens clear` or `allergens set` to reset your selection",
            )
    }

    fn load_or_reset(&self) -> Result<PreferenceDocument> {
        match self.load() {
            Err(e) if e.code == ErrorCode::StorageCorrupt => {
                warn!(path = %self.path.display(), error = %e.message, "Replacing corrupt preferences");
                Ok(PreferenceDocument::default())
            }
            other => other,
        }
    }

    fn save(&self, doc: &PreferenceDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::storage_unavailable(&self.path))?;

        fs::create_dir_all(dir).map_err(|e| Error::storage_unavailable(dir).with_source(e))?;

        let json = serde_json::to_vec_pretty(doc).map_err(|e| {
            Error::new(ErrorCode::Internal, "Failed to encode preferences").with_source(e)
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp);
            return Err(Error::new(
                ErrorCode::StorageError,
                format!("Failed to write {}", self.path.display()),
            )
            .with_source(e)
            .with_suggestion("Check free disk space and permissions on the data directory"));
        }

        debug!(
            path = %self.path.display(),
            selected = doc.selected_allergens.len(),
            enabled = doc.allergens_enabled,
            "Preferences saved"
        );
        Ok(())
    }
}

/// Platform data directory for labelcheck (e.g. `~/.local/share/labelcheck`)
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("labelcheck"))
}
