//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelFamily`]: provider family detection from a model identifier
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: slug helper for history file names

pub mod error;
pub mod model;
pub mod string;
