//! Cross-module integration tests for the client registry.

pub mod concurrency;
pub mod consistency;
pub mod persistence;
