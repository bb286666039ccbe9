//! Fixed allergen catalog
//!
//! The catalog is the closed set of allergen codes a user can select, in
//! presentation order. Codes use the Open Food Facts taxonomy (`en:` namespace).
//! The safety evaluator never consults it; only input validation and display do.

use crate::locale::Locale;
use serde::Serialize;
use std::collections::BTreeSet;

/// Namespace prefix shared by every catalog code
pub const CODE_NAMESPACE: &str = "en:";

/// One selectable allergen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllergenEntry {
    /// Canonical code, e.g. `en:gluten`
    pub code: &'static str,
    /// Polish display name
    pub name_pl: &'static str,
    /// English display name
    pub name_en: &'static str,
}

impl AllergenEntry {
    /// Display name in the given locale
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Pl => self.name_pl,
            Locale::En => self.name_en,
        }
    }

    /// Code without the `en:` namespace
    #[must_use]
    pub fn short_code(&self) -> &'static str {
        self.code.strip_prefix(CODE_NAMESPACE).unwrap_or(self.code)
    }
}

const fn entry(code: &'static str, name_pl: &'static str, name_en: &'static str) -> AllergenEntry {
    AllergenEntry {
        code,
        name_pl,
        name_en,
    }
}

/// All allergens, ordered by Polish display name
pub const CATALOG: &[AllergenEntry] = &[
    entry("en:yeast", "Drożdże", "Yeast"),
    entry(
        "en:sulphur-dioxide-and-sulphites",
        "Dwutlenek siarki i siarczyny",
        "Sulphur dioxide and sulphites",
    ),
    entry("en:msg", "Glutaminian sodu", "Monosodium glutamate"),
    entry("en:gluten", "Gluten", "Gluten"),
    entry("en:eggs", "Jajka", "Eggs"),
    entry("en:barley", "Jęczmień", "Barley"),
    entry("en:corn", "Kukurydza", "Corn"),
    entry("en:lupin", "Łubin", "Lupin"),
    entry("en:molluscs", "Mięczaki", "Molluscs"),
    entry("en:milk", "Mleko", "Milk"),
    entry("en:mustard", "Musztarda", "Mustard"),
    entry("en:nuts", "Orzechy", "Nuts"),
    entry("en:peanuts", "Orzeszki ziemne", "Peanuts"),
    entry("en:oats", "Owies", "Oats"),
    entry("en:wheat", "Pszenica", "Wheat"),
    entry("en:fish", "Ryby", "Fish"),
    entry("en:rice", "Ryż", "Rice"),
    entry("en:celery", "Seler", "Celery"),
    entry("en:sesame-seeds", "Sezam", "Sesame seeds"),
    entry("en:sulphites", "Siarczyny", "Sulphites"),
    entry("en:shellfish", "Skorupiaki", "Shellfish"),
    entry("en:soybeans", "Soja", "Soybeans"),
    entry("en:gelatin", "Żelatyna", "Gelatin"),
    entry("en:rye", "Żyto", "Rye"),
];

/// Full ordered catalog
#[must_use]
pub fn all() -> &'static [AllergenEntry] {
    CATALOG
}

/// Find an entry by its exact code
#[must_use]
pub fn lookup(code: &str) -> Option<&'static AllergenEntry> {
    CATALOG.iter().find(|e| e.code == code)
}

/// Resolve user input to a catalog entry
///
/// Accepts the full code or the code without its namespace, ignoring case
/// and surrounding whitespace.
#[must_use]
pub fn resolve(input: &str) -> Option<&'static AllergenEntry> {
    let needle = input.trim().to_lowercase();
    let short = needle.strip_prefix(CODE_NAMESPACE).unwrap_or(&needle);
    CATALOG.iter().find(|e| e.short_code() == short)
}

/// Display names of the selected codes, in catalog order
///
/// Codes outside the catalog are skipped.
#[must_use]
pub fn display_names(selected: &BTreeSet<String>, locale: Locale) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|e| selected.contains(e.code))
        .map(|e| e.display_name(locale))
        .collect()
}

/// Every catalog code as an owned set
#[must_use]
pub fn all_codes() -> BTreeSet<String> {
    CATALOG.iter().map(|e| e.code.to_string()).collect()
}
