//! # Stockroom Test Suite
//!
//! Tests that span more than one module of the registry: concurrent writers
//! racing over the counter and the legal-ID index, cross-document
//! consistency, and persistence through the file backend and the runtime.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── concurrency.rs   # Racing writers on a multi-thread runtime
//!     ├── consistency.rs   # Index, counter and audit agree after any history
//!     └── persistence.rs   # File backend and runtime wiring
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sr-tests
//! cargo test -p sr-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p sr-tests
//! ```

pub mod integration;
