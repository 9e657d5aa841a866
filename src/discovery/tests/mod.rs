//! Unit tests for discovery queries.
