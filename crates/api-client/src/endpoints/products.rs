//! Product lookup by barcode
//!
//! Maps to `GET /api/v2/product/{barcode}` of the Open Food Facts API,
//! requesting only the fields labelcheck displays or evaluates.

use crate::client::{OpenFoodFactsClient, RawResponse};
use labelcheck_core::{LookupError, ProductRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fields requested from the product API, in query order
pub const PRODUCT_FIELDS: &[&str] = &[
    "code",
    "product_name",
    "product_name_pl",
    "brands",
    "quantity",
    "ingredients_text",
    "ingredients_text_pl",
    "allergens_tags",
    "countries",
];

/// `status` value meaning the product was found
pub const STATUS_FOUND: i64 = 1;

/// Products API interface
#[derive(Clone)]
pub struct ProductsApi {
    client: OpenFoodFactsClient,
}

impl ProductsApi {
    /// Create a new products API interface
    pub(crate) fn new(client: OpenFoodFactsClient) -> Self {
        Self { client }
    }

    /// Look up a product by barcode
    ///
    /// GET /api/v2/product/{barcode}?fields=...
    #[instrument(skip(self))]
    pub async fn fetch_by_barcode(&self, barcode: &str) -> Result<ProductRecord, LookupError> {
        if !is_valid_barcode(barcode) {
            debug!(barcode = %barcode, "Rejecting malformed barcode without a request");
            return Err(LookupError::NotFound);
        }

        let raw = self.client.get_raw(&product_path(barcode)).await?;
        map_response(barcode, &raw)
    }
}

/// Request path for a barcode, including the field list
#[must_use]
pub fn product_path(barcode: &str) -> String {
    format!("api/v2/product/{barcode}?fields={}", PRODUCT_FIELDS.join(","))
}

/// Whether a barcode can be placed in the request path as-is
///
/// Only ASCII letters and digits are accepted, so no input can add a path
/// segment, a query or a `.`/`..` component.
#[must_use]
pub fn is_valid_barcode(barcode: &str) -> bool {
    !barcode.is_empty() && barcode.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Interpret a completed exchange
///
/// - 2xx with `status == 1` and a product → record
/// - 2xx otherwise → [`LookupError::NotFound`]
/// - 404 whose body says `status == 0` → [`LookupError::NotFound`]
///   (the v2 API answers unknown barcodes this way)
/// - any other non-2xx → [`LookupError::ServerError`]
/// - 2xx with an undecodable body → [`LookupError::ConnectionError`]
pub fn map_response(barcode: &str, raw: &RawResponse) -> Result<ProductRecord, LookupError> {
    if !raw.is_success() {
        if raw.status == 404 {
            if let Ok(body) = serde_json::from_str::<ProductResponse>(&raw.body) {
                if body.status != STATUS_FOUND && body.product.is_none() {
                    return Err(LookupError::NotFound);
                }
            }
        }
        return Err(LookupError::ServerError(raw.status));
    }

    let body: ProductResponse = serde_json::from_str(&raw.body)
        .map_err(|e| LookupError::connection(format!("invalid response body: {e}")))?;

    body.into_record(barcode)
}

// ============================================================================
// Response Types
// ============================================================================

/// Envelope of `GET /api/v2/product/{barcode}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductResponse {
    /// Barcode as normalized by the service
    #[serde(default)]
    pub code: Option<String>,
    /// 1 when found, 0 otherwise
    #[serde(default)]
    pub status: i64,
    /// Human-readable status
    #[serde(default)]
    pub status_verbose: Option<String>,
    /// Product payload, absent or null when not found
    #[serde(default)]
    pub product: Option<ProductPayload>,
}

impl ProductResponse {
    /// Convert into a record, or `NotFound` if the envelope carries no product
    pub fn into_record(self, requested_barcode: &str) -> Result<ProductRecord, LookupError> {
        match self.product {
            Some(product) if self.status == STATUS_FOUND => {
                let barcode = self
                    .code
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| requested_barcode.to_string());
                Ok(product.into_record(barcode))
            }
            _ => Err(LookupError::NotFound),
        }
    }
}

/// Product fields as delivered by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Name in the product's main language
    #[serde(default)]
    pub product_name: Option<String>,
    /// Polish name
    #[serde(default)]
    pub product_name_pl: Option<String>,
    /// Comma-separated brands
    #[serde(default)]
    pub brands: Option<String>,
    /// Net quantity as printed
    #[serde(default)]
    pub quantity: Option<String>,
    /// Ingredient list in the main language
    #[serde(default)]
    pub ingredients_text: Option<String>,
    /// Polish ingredient list
    #[serde(default)]
    pub ingredients_text_pl: Option<String>,
    /// Allergen taxonomy tags
    #[serde(default)]
    pub allergens_tags: Option<Vec<String>>,
    /// Free-text allergen statement (not requested, kept if present)
    #[serde(default)]
    pub allergens: Option<String>,
    /// Countries where the product is sold
    #[serde(default)]
    pub countries: Option<String>,
}

impl ProductPayload {
    fn into_record(self, barcode: String) -> ProductRecord {
        ProductRecord {
            barcode,
            name: self.product_name,
            name_pl: self.product_name_pl,
            brands: self.brands,
            quantity: self.quantity,
            ingredients: self.ingredients_text,
            ingredients_pl: self.ingredients_text_pl,
            allergen_tags: self.allergens_tags,
            allergens_text: self.allergens,
            countries: self.countries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_product_path_lists_fields() {
        assert_eq!(
            product_path("5900259000002"),
            "api/v2/product/5900259000002?fields=code,product_name,product_name_pl,brands,\
             quantity,ingredients_text,ingredients_text_pl,allergens_tags,countries"
        );
    }

    #[test]
    fn test_barcode_validation() {
        assert!(is_valid_barcode("5900259000002"));
        assert!(is_valid_barcode("0049000028911"));
        assert!(!is_valid_barcode(""));
        assert!(!is_valid_barcode("590 025"));
        assert!(!is_valid_barcode("../admin"));
        assert!(!is_valid_barcode("123?x=1"));
        assert!(!is_valid_barcode("."));
        assert!(!is_valid_barcode(".."));
        assert!(!is_valid_barcode("59%2F00"));
        assert!(!is_valid_barcode("５９００"));
    }

    #[test]
    fn test_found_product() {
        let body = r#"{
            "code": "5900259000002",
            "status": 1,
            "status_verbose": "product found",
            "product": {
                "product_name": "Milk chocolate",
                "product_name_pl": "Czekolada mleczna",
                "brands": "Wedel",
                "quantity": "100 g",
                "ingredients_text_pl": "cukier, mleko w proszku",
                "allergens_tags": ["en:milk", "en:soybeans"],
                "countries": "Poland"
            }
        }"#;

        let record = map_response("5900259000002", &raw(200, body)).unwrap();
        assert_eq!(record.barcode, "5900259000002");
        assert_eq!(record.name_pl.as_deref(), Some("Czekolada mleczna"));
        assert_eq!(record.brands.as_deref(), Some("Wedel"));
        assert_eq!(record.quantity.as_deref(), Some("100 g"));
        assert!(record.ingredients.is_none());
        assert_eq!(
            record.allergen_tags,
            Some(vec!["en:milk".to_string(), "en:soybeans".to_string()])
        );
        assert_eq!(record.countries.as_deref(), Some("Poland"));
    }

    #[test]
    fn test_missing_code_falls_back_to_requested() {
        let body = r#"{"status": 1, "product": {"product_name": "Water"}}"#;
        let record = map_response("42", &raw(200, body)).unwrap();
        assert_eq!(record.barcode, "42");
        assert!(record.allergen_tags.is_none());
    }

    #[test]
    fn test_status_zero_is_not_found() {
        let body = r#"{"code": "1", "status": 0, "status_verbose": "product not found"}"#;
        assert_eq!(map_response("1", &raw(200, body)), Err(LookupError::NotFound));
    }

    #[test]
    fn test_null_product_is_not_found() {
        let body = r#"{"code": "1", "status": 1, "product": null}"#;
        assert_eq!(map_response("1", &raw(200, body)), Err(LookupError::NotFound));
    }

    #[test]
    fn test_server_error() {
        assert_eq!(
            map_response("1", &raw(500, "Internal Server Error")),
            Err(LookupError::ServerError(500))
        );
        assert_eq!(
            map_response("1", &raw(503, "")),
            Err(LookupError::ServerError(503))
        );
    }

    #[test]
    fn test_404_with_not_found_body() {
        let body = r#"{"code": "1", "status": 0, "status_verbose": "product not found"}"#;
        assert_eq!(map_response("1", &raw(404, body)), Err(LookupError::NotFound));
        assert_eq!(
            map_response("1", &raw(404, "<html>Not Found</html>")),
            Err(LookupError::ServerError(404))
        );
    }

    #[test]
    fn test_undecodable_body_is_connection_error() {
        match map_response("1", &raw(200, "<html>maintenance</html>")) {
            Err(LookupError::ConnectionError(msg)) => assert!(msg.contains("invalid response body")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
