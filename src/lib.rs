// src/lib.rs

//! Dependency-Track provider library
//!
//! Maps desired-state records for teams, projects, ACL mappings,
//! notification publishers and rules, team permissions, team API keys and
//! config properties onto the Dependency-Track REST API.

pub mod client;
pub mod data_sources;
pub mod error;
pub mod models;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use provider::{ApplyAction, ApplyOutcome, Provider};
