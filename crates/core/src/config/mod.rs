//! Configuration loading and schema definitions
//!
//! `labelcheck.toml` sections: `[api]`, `[storage]`, `[display]`.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
