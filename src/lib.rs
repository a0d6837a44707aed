//! Subway Line - section management for transit lines
//!
//! A line is an ordered chain of stations joined by directed, distance-weighted
//! sections. This crate keeps that chain a single simple path while sections
//! are inserted (extending a terminal or splitting an existing section) and
//! stations are removed (dropping a terminal or merging two sections), and
//! derives the station order and total distance on demand.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod line;
pub mod storage;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Distance, Error, LineId, Result, SectionError, StationId};
pub use line::{Line, Section, Sections};
pub use storage::{LineStore, MemLineStore, SectionDiff};

use crate::core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match logging.format.as_str() {
        "compact" => builder.compact().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::debug!("Initializing {} v{}", NAME, VERSION);
    Ok(())
}
