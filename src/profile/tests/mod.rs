//! Unit tests for the profile module.
