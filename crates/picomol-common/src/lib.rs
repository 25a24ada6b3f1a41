//! picomol-common — Shared types, errors, and configuration used across all Picomol crates.

pub mod config;
pub mod error;
pub mod table;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use error::{PicomolError, Result};
