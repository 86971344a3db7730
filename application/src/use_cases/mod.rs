//! Use cases (application services)

pub mod invoke_agent;
pub mod run_roundtable;
