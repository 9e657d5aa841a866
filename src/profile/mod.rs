//! Actor profiles: role, contact details, and optional location.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - In-memory and `PostgreSQL` adapters in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
