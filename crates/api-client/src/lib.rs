//! Open Food Facts client for labelcheck
//!
//! Looks up products by barcode and maps every outcome to either a
//! [`ProductRecord`](labelcheck_core::ProductRecord) or a
//! [`LookupError`](labelcheck_core::LookupError).
//!
//! # Features
//!
//! - **Environment-based configuration**: production, staging or a local mirror
//! - **Rate limiting**: stays under the service's per-minute read quota
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use labelcheck_api_client::{ClientConfig, OpenFoodFactsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenFoodFactsClient::with_config(ClientConfig::default())?;
//!
//!     match client.products().fetch_by_barcode("5900259000002").await {
//!         Ok(product) => println!("Found {}", product.barcode),
//!         Err(e) => println!("Lookup failed: {e}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::OpenFoodFactsClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use labelcheck_core::config::Environment;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::OpenFoodFactsClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::ProductsApi;
    pub use crate::error::{ApiError, ApiResult};
    pub use labelcheck_core::{LookupError, ProductRecord};
}
