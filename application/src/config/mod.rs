//! Application-level configuration.
//!
//! - [`DiscussionParams`]: engine runtime parameters (timeouts, buffering)

pub mod execution_params;

pub use execution_params::DiscussionParams;
