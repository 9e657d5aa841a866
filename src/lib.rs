//! `DiaristLink`: a marketplace connecting employers with diarists.
//!
//! Employers post cleaning jobs; diarists discover nearby pending jobs,
//! accept one, and carry it through to completion. The job lifecycle is
//! governed by a single transition policy and compare-and-swap writes, so
//! a job is never accepted twice and a diarist never holds two active jobs.
//!
//! # Architecture
//!
//! Each feature module follows hexagonal principles:
//!
//! - **Domain**: pure types and rules with no I/O
//! - **Ports**: async trait contracts for storage and collaborators
//! - **Adapters**: in-memory, `PostgreSQL`, and HTTP-provider implementations
//! - **Services**: orchestration returning classified errors
//!
//! # Modules
//!
//! - [`job`]: job aggregate, transition policy, and acceptance guard
//! - [`profile`]: actor profiles and their locations
//! - [`geo`]: coordinates, haversine filtering, and geocoding
//! - [`discovery`]: radius-filtered listings
//! - [`http`]: the axum API
//! - [`config`], [`telemetry`], [`persistence`]: process wiring

pub mod config;
pub mod discovery;
pub mod error;
pub mod geo;
pub mod http;
pub mod job;
pub mod persistence;
pub mod profile;
pub mod telemetry;
