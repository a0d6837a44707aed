//! Line model: sections, the section collection, and the line entity itself

pub mod section;
pub mod sections;

pub use section::Section;
pub use sections::Sections;

use crate::core::error::{Error, Result, SectionError};
use crate::core::types::{LineId, StationId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(test)]
mod tests;

/// A subway line and the sections that make it up
///
/// Deserialization goes through [`Line::from_parts`], so a stored line with an
/// empty name or a broken path is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineRecord", into = "LineRecord")]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    sections: Sections,
}

/// Unvalidated wire form of a line
#[derive(Serialize, Deserialize)]
struct LineRecord {
    id: LineId,
    name: String,
    color: String,
    sections: Vec<Section>,
}

impl Line {
    /// Create a line with its first section
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        first: Section,
    ) -> Result<Self> {
        let name = name.into();
        let color = color.into();
        validate_name(&name)?;

        let mut sections = Sections::new();
        sections.insert(first)?;
        Ok(Self {
            id,
            name,
            color,
            sections,
        })
    }

    /// Rebuild a line from stored parts, checking its sections
    pub fn from_parts(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        if sections.is_empty() {
            return Err(Error::invalid_input(format!("line {} has no sections", id)));
        }
        Ok(Self {
            id,
            name,
            color: color.into(),
            sections: Sections::try_from_sections(sections)?,
        })
    }

    /// Line id
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display colour
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Sections of the line
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Rename and recolour the line
    pub fn update(&mut self, name: impl Into<String>, color: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.color = color.into();
        Ok(())
    }

    /// Insert a section into the line
    pub fn add_section(&mut self, section: Section) -> std::result::Result<(), SectionError> {
        debug!(line = %self.id, "adding section");
        self.sections.insert(section)
    }

    /// Remove a station from the line
    pub fn remove_station(&mut self, station: StationId) -> std::result::Result<(), SectionError> {
        debug!(line = %self.id, %station, "removing station");
        self.sections.remove_station(station)
    }

    /// Stations from head to tail
    pub fn stations(&self) -> std::result::Result<Vec<StationId>, SectionError> {
        self.sections.ordered_stations()
    }

    /// Total distance of the line
    pub fn total_distance(&self) -> u64 {
        self.sections.total_distance()
    }
}

impl TryFrom<LineRecord> for Line {
    type Error = Error;

    fn try_from(record: LineRecord) -> Result<Self> {
        Line::from_parts(record.id, record.name, record.color, record.sections)
    }
}

impl From<Line> for LineRecord {
    fn from(line: Line) -> Self {
        Self {
            id: line.id,
            name: line.name,
            color: line.color,
            sections: line.sections.into_vec(),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("line name must not be empty"));
    }
    Ok(())
}
