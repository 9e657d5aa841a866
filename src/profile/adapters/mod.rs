//! Adapter implementations for profile ports.

pub mod memory;
pub mod postgres;
