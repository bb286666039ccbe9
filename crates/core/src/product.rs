//! Product record and lookup failures
//!
//! A [`ProductRecord`] is the result of one successful barcode lookup. It is
//! immutable; a new scan replaces it.

use crate::locale::Locale;
use crate::safety::{self, SafetyVerdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

const UNKNOWN_PRODUCT: &str = "Unknown product";
const NO_INGREDIENTS: &str = "No ingredient information";
const NO_ALLERGEN_INFO: &str = "No information";

/// Product metadata returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Barcode the record belongs to
    pub barcode: String,
    /// Name in the database's primary language
    pub name: Option<String>,
    /// Polish name
    pub name_pl: Option<String>,
    /// Brand(s), comma separated as delivered
    pub brands: Option<String>,
    /// Net quantity, free text (e.g. `500 g`)
    pub quantity: Option<String>,
    /// Ingredient list in the primary language
    pub ingredients: Option<String>,
    /// Polish ingredient list
    pub ingredients_pl: Option<String>,
    /// Allergen taxonomy tags, e.g. `en:milk`
    pub allergen_tags: Option<Vec<String>>,
    /// Free-text allergen statement
    pub allergens_text: Option<String>,
    /// Countries where the product is sold
    pub countries: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn preferred<'a>(
    locale: Locale,
    primary: Option<&'a String>,
    polish: Option<&'a String>,
) -> Option<&'a str> {
    match locale {
        Locale::Pl => non_blank(polish).or_else(|| non_blank(primary)),
        Locale::En => non_blank(primary).or_else(|| non_blank(polish)),
    }
}

impl ProductRecord {
    /// Create an empty record for a barcode
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            ..Self::default()
        }
    }

    /// Name to show, preferring the given locale and falling back to the other
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        preferred(locale, self.name.as_ref(), self.name_pl.as_ref()).unwrap_or(UNKNOWN_PRODUCT)
    }

    /// Ingredient text to show, same preference rule as the name
    #[must_use]
    pub fn display_ingredients(&self, locale: Locale) -> &str {
        preferred(locale, self.ingredients.as_ref(), self.ingredients_pl.as_ref())
            .unwrap_or(NO_INGREDIENTS)
    }

    /// Allergen tags joined for display, else the raw statement
    #[must_use]
    pub fn allergens_display_text(&self) -> String {
        match (&self.allergen_tags, &self.allergens_text) {
            (Some(tags), _) => tags.join(", "),
            (None, Some(text)) => text.clone(),
            (None, None) => NO_ALLERGEN_INFO.to_string(),
        }
    }

    /// Safety verdict of this product for the given selection
    #[must_use]
    pub fn verdict(&self, selected: &BTreeSet<String>) -> SafetyVerdict {
        safety::evaluate(self.allergen_tags.as_deref(), selected)
    }
}

/// Why a barcode lookup produced no product
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LookupError {
    /// The product is not in the database
    #[error("Product not found in the database")]
    NotFound,

    /// The service answered with a non-success HTTP status
    #[error("Server error: {0}")]
    ServerError(u16),

    /// The request never completed (DNS, connect, timeout, I/O)
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl LookupError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }
}
