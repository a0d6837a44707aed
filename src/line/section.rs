//! A single directed section between two adjacent stations

use crate::core::error::SectionError;
use crate::core::types::{Distance, StationId};
use serde::{Deserialize, Serialize};

/// Directed, distance-weighted connection between two distinct stations
///
/// A section never holds a reference back to its line. It is only mutated by
/// the split logic of [`Sections`](crate::line::Sections) through
/// [`shrink_from_up`](Section::shrink_from_up) and
/// [`shrink_from_down`](Section::shrink_from_down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord", into = "SectionRecord")]
pub struct Section {
    up_station: StationId,
    down_station: StationId,
    distance: Distance,
}

/// Unvalidated wire form of a section
#[derive(Serialize, Deserialize)]
struct SectionRecord {
    up_station: StationId,
    down_station: StationId,
    distance: u32,
}

impl Section {
    /// Create a new section
    pub fn new(
        up_station: impl Into<StationId>,
        down_station: impl Into<StationId>,
        distance: u32,
    ) -> Result<Self, SectionError> {
        Self::with_distance(up_station.into(), down_station.into(), Distance::new(distance)?)
    }

    /// Create a new section from an already validated distance
    pub fn with_distance(
        up_station: StationId,
        down_station: StationId,
        distance: Distance,
    ) -> Result<Self, SectionError> {
        if up_station == down_station {
            return Err(SectionError::SameStation(up_station));
        }
        Ok(Self {
            up_station,
            down_station,
            distance,
        })
    }

    /// Up (departure side) station
    pub fn up_station(&self) -> StationId {
        self.up_station
    }

    /// Down (arrival side) station
    pub fn down_station(&self) -> StationId {
        self.down_station
    }

    /// Distance between the two stations
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Whether `station` is one of the two endpoints
    pub fn touches(&self, station: StationId) -> bool {
        self.up_station == station || self.down_station == station
    }

    /// Whether both sections leave from the same station
    pub fn overlaps_at_up_station(&self, other: &Section) -> bool {
        self.up_station == other.up_station
    }

    /// Whether both sections arrive at the same station
    pub fn overlaps_at_down_station(&self, other: &Section) -> bool {
        self.down_station == other.down_station
    }

    /// Whether `other` fits strictly inside this section
    pub fn can_absorb(&self, other: &Section) -> bool {
        other.distance < self.distance
    }

    /// Give up the leading part of this section to `other`
    ///
    /// `other` starts where this section starts; afterwards this section
    /// starts where `other` ends. The section is left untouched on error.
    pub fn shrink_from_up(&mut self, other: &Section) -> Result<(), SectionError> {
        let distance = self.remaining_after(other)?;
        self.up_station = other.down_station;
        self.distance = distance;
        Ok(())
    }

    /// Give up the trailing part of this section to `other`
    ///
    /// `other` ends where this section ends; afterwards this section ends
    /// where `other` starts. The section is left untouched on error.
    pub fn shrink_from_down(&mut self, other: &Section) -> Result<(), SectionError> {
        let distance = self.remaining_after(other)?;
        self.down_station = other.up_station;
        self.distance = distance;
        Ok(())
    }

    fn remaining_after(&self, other: &Section) -> Result<Distance, SectionError> {
        self.distance
            .checked_sub(other.distance)
            .ok_or(SectionError::DistanceUnderflow {
                existing: self.distance,
                removed: other.distance,
            })
    }
}

impl TryFrom<SectionRecord> for Section {
    type Error = SectionError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        Section::new(record.up_station, record.down_station, record.distance)
    }
}

impl From<Section> for SectionRecord {
    fn from(section: Section) -> Self {
        Self {
            up_station: section.up_station,
            down_station: section.down_station,
            distance: section.distance.get(),
        }
    }
}
