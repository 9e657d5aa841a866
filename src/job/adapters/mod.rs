//! Adapter implementations for job ports.

pub mod memory;
pub mod postgres;
