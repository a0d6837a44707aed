//! Error types and handling for subway line management
//!
//! `SectionError` covers everything the section model can reject. `Error`
//! wraps it together with the configuration, storage and I/O failures of the
//! surrounding crate.

use crate::core::types::{Distance, LineId, StationId};
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Section model errors
    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while editing the sections of a line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// Both stations of the new section are already on the line
    #[error("Both stations {up} and {down} are already registered on the line")]
    DuplicateSection {
        /// Up station of the rejected section
        up: StationId,
        /// Down station of the rejected section
        down: StationId,
    },

    /// Neither station of the new section is on the line
    #[error("Neither {up} nor {down} is registered on the line")]
    DisconnectedSection {
        /// Up station of the rejected section
        up: StationId,
        /// Down station of the rejected section
        down: StationId,
    },

    /// The line only has one section left
    #[error("The line has only one section")]
    SingleSection,

    /// The station is not on the line
    #[error("Station {0} is not registered on the line")]
    StationNotFound(StationId),

    /// Up and down station are the same
    #[error("Up and down station must differ (got {0} twice)")]
    SameStation(StationId),

    /// Distances must be positive
    #[error("Distance must be positive, got {value}")]
    InvalidDistance {
        /// Rejected value
        value: u32,
    },

    /// Splitting would leave a non-positive remainder
    #[error("Section of distance {inserted} does not fit inside existing section of distance {existing}")]
    SectionTooLong {
        /// Distance of the section being split
        existing: Distance,
        /// Distance of the section being inserted
        inserted: Distance,
    },

    /// Merging two sections overflowed the distance range
    #[error("Merged distance of {first} and {second} is out of range")]
    DistanceOverflow {
        /// Distance of the incoming section
        first: Distance,
        /// Distance of the outgoing section
        second: Distance,
    },

    /// The stored sections no longer form a single simple path
    #[error("Malformed path: {0}")]
    MalformedPath(String),

    /// A shrink was attempted that would drop a distance to zero or below
    #[error("Cannot shrink section of distance {existing} by {removed}")]
    DistanceUnderflow {
        /// Distance of the section being shrunk
        existing: Distance,
        /// Distance that was to be removed
        removed: Distance,
    },
}

impl SectionError {
    /// Create a malformed path error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPath(msg.into())
    }

    /// True for errors that indicate a bug rather than bad input
    pub fn is_internal_defect(&self) -> bool {
        matches!(
            self,
            SectionError::MalformedPath(_) | SectionError::DistanceUnderflow { .. }
        )
    }

    /// HTTP-equivalent status for API layers
    pub fn status_code(&self) -> u16 {
        match self {
            SectionError::StationNotFound(_) => 404,
            e if e.is_internal_defect() => 500,
            _ => 400,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create an already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists(resource.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Not-found error for a line id
    pub fn line_not_found(id: LineId) -> Self {
        Self::not_found(format!("line {}", id))
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Section(e) => !e.is_internal_defect(),
            Error::InvalidInput(_) | Error::NotFound(_) | Error::AlreadyExists(_) => true,
            _ => false,
        }
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// HTTP-equivalent status for API layers
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Section(e) => e.status_code(),
            Error::NotFound(_) => 404,
            Error::AlreadyExists(_) => 409,
            Error::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}
