//! Gravity Store Shared Library
//!
//! This crate contains the request/response types and input validation
//! helpers shared between the backend and any front-end clients.

pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;
