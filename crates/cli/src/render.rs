//! Rendering of scan results and the allergen selection
//!
//! Text renderers return a `String` so commands decide where it goes.
//! JSON output serializes the core types directly, plus the listing
//! types below.

use crate::messages::Messages;
use labelcheck_core::allergens;
use labelcheck_core::session::ScanState;
use labelcheck_core::{Locale, LookupError, ProductRecord, SafetyVerdict};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Verdict banner, plus the matched tags when unsafe
#[must_use]
pub fn verdict(verdict: &SafetyVerdict, locale: Locale) -> String {
    let msg = Messages::for_locale(locale);
    match verdict {
        SafetyVerdict::Safe => format!(
            "{}",
            format!("✓ {}", msg.safe).if_supports_color(Stream::Stdout, |t| t.green())
        ),
        SafetyVerdict::Unsafe(tags) => format!(
            "{}\n  {}: {}",
            format!("✗ {}", msg.not_safe).if_supports_color(Stream::Stdout, |t| t.red()),
            msg.detected,
            tags.join(", ")
        ),
        SafetyVerdict::Unknown => format!(
            "{}",
            format!("? {}", msg.unknown).if_supports_color(Stream::Stdout, |t| t.yellow())
        ),
    }
}

/// Product details followed by its verdict
#[must_use]
pub fn product(product: &ProductRecord, result: &SafetyVerdict, locale: Locale) -> String {
    let msg = Messages::for_locale(locale);
    let mut out = String::new();

    let _ = writeln!(out, "{}", msg.product_found);
    let _ = writeln!(
        out,
        "{} ({})",
        product
            .display_name(locale)
            .if_supports_color(Stream::Stdout, |t| t.bold()),
        product.barcode
    );
    if let Some(brand) = non_blank(product.brands.as_deref()) {
        let _ = writeln!(out, "  {}: {brand}", msg.brand);
    }
    if let Some(quantity) = non_blank(product.quantity.as_deref()) {
        let _ = writeln!(out, "  {}: {quantity}", msg.quantity);
    }
    let _ = writeln!(
        out,
        "  {}: {}",
        msg.ingredients,
        product.display_ingredients(locale)
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        msg.allergens,
        product.allergens_display_text()
    );
    if let Some(countries) = non_blank(product.countries.as_deref()) {
        let _ = writeln!(out, "  {}: {countries}", msg.countries);
    }
    out.push_str(&verdict(result, locale));
    out
}

/// A failed lookup, with what to do next
#[must_use]
pub fn failure(barcode: &str, error: &LookupError, locale: Locale) -> String {
    let msg = Messages::for_locale(locale);
    format!(
        "{} ({barcode}): {}\n  {}",
        msg.error.if_supports_color(Stream::Stdout, |t| t.red()),
        msg.lookup_error(error),
        msg.lookup_hint(error)
    )
}

/// Text for a session snapshot
#[must_use]
pub fn state(state: &ScanState, locale: Locale) -> Option<String> {
    match state {
        ScanState::Idle => None,
        ScanState::Loading { barcode, .. } => Some(format!(
            "{} ({barcode})",
            Messages::for_locale(locale).searching
        )),
        ScanState::Loaded {
            product: record,
            verdict: result,
            ..
        } => Some(product(record, result, locale)),
        ScanState::Failed { barcode, error, .. } => Some(failure(barcode, error, locale)),
    }
}

/// One catalog entry in the allergen listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Canonical code
    pub code: &'static str,
    /// Display name in the requested locale
    pub name: &'static str,
    /// Whether the user selected it
    pub selected: bool,
}

/// The catalog with the user's selection applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllergenListing {
    /// Catalog entries in presentation order
    pub allergens: Vec<ListingEntry>,
    /// Number of selected catalog entries
    pub selected_count: usize,
    /// Catalog size
    pub total: usize,
    /// Reserved checking flag
    pub allergens_enabled: bool,
}

impl AllergenListing {
    /// Build the listing for a selection
    #[must_use]
    pub fn new(selected: &BTreeSet<String>, enabled: bool, locale: Locale) -> Self {
        let allergens: Vec<ListingEntry> = allergens::all()
            .iter()
            .map(|entry| ListingEntry {
                code: entry.code,
                name: entry.display_name(locale),
                selected: selected.contains(entry.code),
            })
            .collect();
        let selected_count = allergens.iter().filter(|e| e.selected).count();

        Self {
            total: allergens.len(),
            allergens,
            selected_count,
            allergens_enabled: enabled,
        }
    }
}

/// Catalog with selection markers and a `selected/total` summary
#[must_use]
pub fn allergen_list(selected: &BTreeSet<String>, locale: Locale) -> String {
    let msg = Messages::for_locale(locale);
    let listing = AllergenListing::new(selected, false, locale);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        msg.choose_allergens
            .if_supports_color(Stream::Stdout, |t| t.bold())
    );
    for entry in &listing.allergens {
        let marker = if entry.selected { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "  {marker} {:<30} {}", entry.name, entry.code);
    }
    let _ = writeln!(out, "{}/{}", listing.selected_count, listing.total);
    out.push_str(&selection_summary(selected, locale));
    out
}

/// "Selected: ..." line, or the empty-selection placeholder
#[must_use]
pub fn selection_summary(selected: &BTreeSet<String>, locale: Locale) -> String {
    let msg = Messages::for_locale(locale);
    let names = allergens::display_names(selected, locale);
    if names.is_empty() {
        format!("{}: {}", msg.selected, msg.none)
    } else {
        format!("{}: {}", msg.selected, names.join(", "))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| (*c).to_string()).collect()
    }

    fn chocolate() -> ProductRecord {
        ProductRecord {
            name: Some("Milk chocolate".to_string()),
            name_pl: Some("Czekolada mleczna".to_string()),
            brands: Some("Wedel".to_string()),
            quantity: Some("  ".to_string()),
            allergen_tags: Some(vec!["en:milk".to_string(), "en:soybeans".to_string()]),
            ..ProductRecord::new("5900259000002")
        }
    }

    #[test]
    fn test_unsafe_verdict_lists_tags() {
        let text = verdict(
            &SafetyVerdict::Unsafe(vec!["en:milk".to_string()]),
            Locale::En,
        );
        assert!(text.contains("NOT SAFE"));
        assert!(text.contains("Detected allergens: en:milk"));
    }

    #[test]
    fn test_verdict_localized() {
        assert!(verdict(&SafetyVerdict::Safe, Locale::Pl).contains("BEZPIECZNY"));
        assert!(verdict(&SafetyVerdict::Unknown, Locale::En).contains("No allergen information"));
    }

    #[test]
    fn test_product_details() {
        let p = chocolate();
        let text = product(&p, &p.verdict(&set(&["en:milk"])), Locale::En);

        assert!(text.contains("Milk chocolate"));
        assert!(text.contains("5900259000002"));
        assert!(text.contains("Brand: Wedel"));
        assert!(!text.contains("Quantity"));
        assert!(text.contains("Ingredients: No ingredient information"));
        assert!(text.contains("Allergens: en:milk, en:soybeans"));
        assert!(text.contains("NOT SAFE"));
    }

    #[test]
    fn test_failure_text() {
        let text = failure("123", &LookupError::ServerError(503), Locale::En);
        assert!(text.contains("(123)"));
        assert!(text.contains("Server error: 503"));
        assert!(text.contains("Scan the product again to retry"));
    }

    #[test]
    fn test_failure_text_localized() {
        let text = failure("123", &LookupError::NotFound, Locale::Pl);
        assert!(text.contains("(123): Produkt nie został znaleziony w bazie danych"));
        assert!(text.contains("Sprawdź kod kreskowy"));
        assert!(!text.contains("Product not found"));

        let text = failure("123", &LookupError::connection("refused"), Locale::Pl);
        assert!(text.contains("Błąd połączenia: refused"));
        assert!(text.contains("Zeskanuj produkt ponownie"));
    }

    #[test]
    fn test_state_rendering() {
        assert!(state(&ScanState::Idle, Locale::En).is_none());

        let mut session = labelcheck_core::session::ScanSession::new();
        session.begin("42");
        let text = state(session.state(), Locale::Pl).unwrap();
        assert!(text.contains("Szukam produktu"));
    }

    #[test]
    fn test_listing_counts() {
        let listing = AllergenListing::new(&set(&["en:milk", "en:gluten", "en:bogus"]), true, Locale::En);
        assert_eq!(listing.total, 24);
        assert_eq!(listing.selected_count, 2);
        assert!(listing.allergens_enabled);
        assert!(listing.allergens.iter().any(|e| e.code == "en:milk" && e.selected));
    }

    #[test]
    fn test_allergen_list_text() {
        let text = allergen_list(&set(&["en:milk"]), Locale::En);
        assert!(text.contains("[x] Milk"));
        assert!(text.contains("[ ] Gluten"));
        assert!(text.contains("1/24"));
        assert!(text.contains("Selected: Milk"));
    }

    #[test]
    fn test_empty_selection_summary() {
        assert_eq!(selection_summary(&BTreeSet::new(), Locale::Pl), "Wybrane: Brak");
    }
}
