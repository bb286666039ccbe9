//! User-facing message table
//!
//! Product, verdict and lookup failure texts follow the user's [`Locale`];
//! diagnostics and command feedback stay in English.

use labelcheck_core::{Locale, LookupError};

/// Localized strings used when rendering a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Shown while a lookup is in flight
    pub searching: &'static str,
    /// Heading above product details
    pub product_found: &'static str,
    /// Verdict banner for a safe product
    pub safe: &'static str,
    /// Verdict banner for an unsafe product
    pub not_safe: &'static str,
    /// Prefix before the matched allergen tags
    pub detected: &'static str,
    /// Verdict banner when the product declares no allergens
    pub unknown: &'static str,
    /// Brand label
    pub brand: &'static str,
    /// Quantity label
    pub quantity: &'static str,
    /// Ingredients label
    pub ingredients: &'static str,
    /// Allergens label
    pub allergens: &'static str,
    /// Countries label
    pub countries: &'static str,
    /// Heading for a failed lookup
    pub error: &'static str,
    /// Product missing from the database
    pub not_found: &'static str,
    /// Prefix before the HTTP status of a server error
    pub server_error: &'static str,
    /// Prefix before the cause of a connection error
    pub connection_error: &'static str,
    /// Hint after a not-found lookup
    pub check_barcode: &'static str,
    /// Hint after a server or connection error
    pub retry: &'static str,
    /// Allergen list heading
    pub choose_allergens: &'static str,
    /// Prefix before the selected allergen names
    pub selected: &'static str,
    /// Placeholder for an empty selection
    pub none: &'static str,
}

const PL: Messages = Messages {
    searching: "Szukam produktu...",
    product_found: "Znaleziono produkt!",
    safe: "BEZPIECZNY - Nie zawiera twoich alergenów",
    not_safe: "NIEBEZPIECZNY - Zawiera twoje alergeny!",
    detected: "Wykryte alergeny",
    unknown: "NIEZNANY - Brak informacji o alergenach",
    brand: "Marka",
    quantity: "Ilość",
    ingredients: "Składniki",
    allergens: "Alergeny",
    countries: "Kraje",
    error: "Błąd",
    not_found: "Produkt nie został znaleziony w bazie danych",
    server_error: "Błąd serwera",
    connection_error: "Błąd połączenia",
    check_barcode: "Sprawdź kod kreskowy lub dodaj produkt na openfoodfacts.org",
    retry: "Zeskanuj produkt ponownie, aby spróbować jeszcze raz",
    choose_allergens: "Wybierz swoje alergeny",
    selected: "Wybrane",
    none: "Brak",
};

const EN: Messages = Messages {
    searching: "Looking up product...",
    product_found: "Product found!",
    safe: "SAFE - Contains none of your allergens",
    not_safe: "NOT SAFE - Contains your allergens!",
    detected: "Detected allergens",
    unknown: "UNKNOWN - No allergen information",
    brand: "Brand",
    quantity: "Quantity",
    ingredients: "Ingredients",
    allergens: "Allergens",
    countries: "Countries",
    error: "Error",
    not_found: "Product not found in the database",
    server_error: "Server error",
    connection_error: "Connection error",
    check_barcode: "Check the barcode, or add the product at openfoodfacts.org",
    retry: "Scan the product again to retry",
    choose_allergens: "Choose your allergens",
    selected: "Selected",
    none: "None",
};

impl Messages {
    /// Message table for a locale
    #[must_use]
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Pl => &PL,
            Locale::En => &EN,
        }
    }

    /// Text for a failed lookup
    #[must_use]
    pub fn lookup_error(&self, error: &LookupError) -> String {
        match error {
            LookupError::NotFound => self.not_found.to_string(),
            LookupError::ServerError(status) => format!("{}: {status}", self.server_error),
            LookupError::ConnectionError(cause) => format!("{}: {cause}", self.connection_error),
        }
    }

    /// What the user can do about a failed lookup
    #[must_use]
    pub fn lookup_hint(&self, error: &LookupError) -> &'static str {
        match error {
            LookupError::NotFound => self.check_barcode,
            LookupError::ServerError(_) | LookupError::ConnectionError(_) => self.retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_differ_by_locale() {
        assert_eq!(Messages::for_locale(Locale::Pl).brand, "Marka");
        assert_eq!(Messages::for_locale(Locale::En).brand, "Brand");
        assert!(Messages::for_locale(Locale::Pl).not_safe.starts_with("NIEBEZPIECZNY"));
    }

    #[test]
    fn test_lookup_errors_localized() {
        let pl = Messages::for_locale(Locale::Pl);
        assert_eq!(
            pl.lookup_error(&LookupError::NotFound),
            "Produkt nie został znaleziony w bazie danych"
        );
        assert_eq!(pl.lookup_error(&LookupError::ServerError(502)), "Błąd serwera: 502");
        assert_eq!(
            pl.lookup_error(&LookupError::connection("timed out")),
            "Błąd połączenia: timed out"
        );

        let en = Messages::for_locale(Locale::En);
        assert_eq!(en.lookup_error(&LookupError::ServerError(502)), "Server error: 502");
        assert_eq!(en.lookup_hint(&LookupError::NotFound), en.check_barcode);
        assert_eq!(en.lookup_hint(&LookupError::connection("x")), en.retry);
    }
}
