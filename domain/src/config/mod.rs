//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod output_format;
pub mod roundtable_config;
pub mod validation;

pub use output_format::OutputFormat;
pub use roundtable_config::{MAX_ROUNDS_LIMIT, RoundtableConfig};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
