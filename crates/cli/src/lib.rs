//! Terminal output for labelcheck
//!
//! Provides shared CLI functionality:
//! - Status lines and localized messages
//! - Rendering of scan results and the allergen selection
//! - Lookup spinner

#![warn(missing_docs)]

pub mod messages;
pub mod output;
pub mod progress;
pub mod render;

pub use messages::Messages;
pub use output::{OutputFormat, Status};
