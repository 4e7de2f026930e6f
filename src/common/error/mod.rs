//! Unified error types for content package building and unpacking.
//!
//! Every fallible operation in the crate returns [`Result`], so validation,
//! encoding, format and I/O failures share one error type.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
