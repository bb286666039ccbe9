//! Core library for labelcheck
//!
//! Everything that does not touch the network lives here:
//!
//! - **Allergen catalog**: the fixed list of selectable allergen codes
//! - **Preference store**: durable storage of the user's selection
//! - **Safety evaluation**: product allergen tags vs. the selection
//! - **Scan session**: token-keyed state of the scan flow
//! - **Configuration**: TOML file plus environment overrides
//! - **Error handling**: coded errors with context and suggestions
//!
//! # Example
//!
//! ```rust,no_run
//! use labelcheck_core::{preferences::PreferenceStore, safety};
//!
//! let store = PreferenceStore::open("/tmp/labelcheck");
//! store.toggle("en:milk")?;
//!
//! let tags = vec!["en:milk".to_string(), "en:soybeans".to_string()];
//! let verdict = safety::evaluate(Some(tags.as_slice()), &store.get_selected()?);
//! println!("{verdict}");
//! # Ok::<(), labelcheck_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod allergens;
pub mod config;
pub mod error;
pub mod locale;
pub mod preferences;
pub mod product;
pub mod rate_limit;
pub mod safety;
pub mod session;

pub use error::{Error, ErrorCode, Result, ResultExt};
pub use locale::Locale;
pub use product::{LookupError, ProductRecord};
pub use safety::SafetyVerdict;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::allergens::{self, AllergenEntry};
    pub use crate::config::{Config, ConfigSchema, Environment};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::locale::Locale;
    pub use crate::preferences::PreferenceStore;
    pub use crate::product::{LookupError, ProductRecord};
    pub use crate::safety::{evaluate, SafetyVerdict};
    pub use crate::session::{ScanSession, ScanState, ScanToken};
}
