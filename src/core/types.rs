//! Value types shared across the line model
//!
//! Identifiers are transparent `u64` newtypes; `Distance` is a strictly
//! positive length that can only shrink while it stays positive.

use crate::core::error::SectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Station identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct StationId(u64);

/// Line identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct LineId(u64);

/// Positive distance between two adjacent stations
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(transparent)]
pub struct Distance(u32);

impl StationId {
    /// Create a station id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for StationId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for StationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LineId {
    /// Create a line id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for LineId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for LineId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Distance {
    /// Create a distance, rejecting zero
    pub fn new(value: u32) -> Result<Self, SectionError> {
        if value == 0 {
            return Err(SectionError::InvalidDistance { value });
        }
        Ok(Self(value))
    }

    /// Raw value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Subtract `other`, returning `None` unless the remainder stays positive
    pub fn checked_sub(self, other: Distance) -> Option<Distance> {
        match self.0.checked_sub(other.0) {
            Some(0) | None => None,
            Some(rest) => Some(Self(rest)),
        }
    }

    /// Add `other`, returning `None` on overflow
    pub fn checked_add(self, other: Distance) -> Option<Distance> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl TryFrom<u32> for Distance {
    type Error = SectionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Distance> for u32 {
    fn from(distance: Distance) -> Self {
        distance.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
