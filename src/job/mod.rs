//! Job lifecycle: posting, the transition policy, and the acceptance guard.
//!
//! A job is posted as `pending`, driven through the status graph by its
//! employer and at most one diarist, and ends `completed` or `cancelled`.
//! Every transition is decided by one pure policy and written with
//! compare-and-swap semantics, so concurrent acceptances can never both
//! succeed and a diarist never holds two active jobs.
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
