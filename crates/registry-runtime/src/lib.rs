//! # Stockroom Registry Runtime
//!
//! Operator binary for the client registry: one invocation runs one command
//! and prints its result as JSON on stdout.
//!
//! ## Modular Structure
//!
//! - `cli` - clap command definitions
//! - `config` - environment plus command-line configuration
//! - `container` - backend selection and service wiring
//! - `commands` - command dispatch through `ClientRegistryApi`
//! - `lock` - exclusive data-file lock held by mutating commands
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line and load configuration
//! 2. Initialize telemetry
//! 3. Take the data lock (mutations on persistent backends only)
//! 4. Open the document store
//! 5. Run the command and print the result
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Storage, transaction or startup failure |
//! | 2 | Rejected input (validation, duplicate, not found, no-op) |

pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod lock;

pub use cli::{Backend, Cli, Command};
pub use commands::{execute, CommandError};
pub use config::{ConfigError, RuntimeConfig};
pub use container::{build_registry, RegistryStore, RuntimeRegistry};
pub use lock::{DataLock, LockError};
