//! Common types and utilities shared by the builder and the unpacker.

// Submodule declarations
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
