//! # Shared Types Crate
//!
//! Identifier newtypes and document addressing used across the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the shape of a client ID (fixed-width,
//!   zero-padded decimal) is defined once, here.
//! - **Validated on construction**: `ClientId` and `UserId` cannot hold
//!   malformed values; parsing is the only way in.
//! - **Logical paths**: storage adapters address documents through
//!   `DocumentPath`, never through ad-hoc strings.

pub mod collections;
pub mod entities;
pub mod errors;

pub use collections::*;
pub use entities::*;
pub use errors::*;
