//! Unit tests for the HTTP surface.
