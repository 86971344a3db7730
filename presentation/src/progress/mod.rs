//! Progress indicators shown while agents are working

pub mod reporter;
