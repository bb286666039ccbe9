//! CLI command implementations

pub mod allergens;
pub mod check;
pub mod scan;
pub mod watch;
