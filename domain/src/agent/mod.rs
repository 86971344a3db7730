//! Agent domain module
//!
//! Contains the agent definition supplied by configuration and the
//! role protocol that decides who speaks when.

pub mod entities;
pub mod roles;

pub use entities::{AgentDefinition, AgentRole, AgentSummary};
pub use roles::{RoleProtocol, RoundMode};
