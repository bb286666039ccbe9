//! Display locale for catalog names and product text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Locales the catalog and product records carry text for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Polish (`pl`), the locale of the localized product fields
    #[default]
    Pl,
    /// English (`en`)
    En,
}

impl Locale {
    /// Two-letter language code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pl" | "pl-pl" | "polish" => Ok(Self::Pl),
            "en" | "en-gb" | "en-us" | "english" => Ok(Self::En),
            other => Err(format!("unsupported locale: {other} (expected pl or en)")),
        }
    }
}
