//! Core system types and foundations
//!
//! Identifier and distance types, error handling, and configuration.

pub mod types;
pub mod error;
pub mod config;

// Re-export commonly used items
pub use types::{Distance, LineId, StationId};
pub use error::{Error, Result, SectionError};
pub use config::Config;
