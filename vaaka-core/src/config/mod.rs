//! Configuration types
//!
//! Board-agnostic configuration structures, parsed from `machine.toml` at
//! build time and stored as postcard binary data.

pub mod pins;
pub mod types;

pub use pins::PinSpec;
pub use types::*;
