//! Endpoint-specific API implementations
//!
//! | Module | Endpoint | Description |
//! |--------|----------|-------------|
//! | `products` | `/api/v2/product/{barcode}` | Product lookup by barcode |

pub mod products;

pub use products::ProductsApi;
