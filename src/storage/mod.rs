//! Line registry and snapshot storage
//!
//! `LineStore` is the seam a persistence or API layer talks to. Every section
//! edit returns a [`SectionDiff`] naming exactly which section rows appeared
//! and disappeared, so a database-backed layer can translate it into inserts
//! and deletes.

pub mod mem_store;
pub mod snapshot;

pub use mem_store::MemLineStore;

use crate::core::types::{LineId, StationId};
use crate::core::Result;
use crate::line::{Line, Section, Sections};
use serde::Serialize;
use std::collections::HashSet;

/// Operations on the set of lines
pub trait LineStore: Send + Sync {
    /// Create a line with its first section
    fn create_line(&self, name: &str, color: &str, first: Section) -> Result<Line>;

    /// Fetch a line by id
    fn get_line(&self, id: LineId) -> Result<Line>;

    /// All lines, ordered by id
    fn list_lines(&self) -> Vec<Line>;

    /// Rename and recolour a line
    fn update_line(&self, id: LineId, name: &str, color: &str) -> Result<Line>;

    /// Delete a line
    fn delete_line(&self, id: LineId) -> Result<()>;

    /// Insert a section into a line
    fn add_section(&self, id: LineId, section: Section) -> Result<SectionDiff>;

    /// Remove a station from a line
    fn remove_station(&self, id: LineId, station: StationId) -> Result<SectionDiff>;
}

/// Sections added and removed by one edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionDiff {
    /// Sections present only after the edit
    pub added: Vec<Section>,
    /// Sections present only before the edit
    pub removed: Vec<Section>,
}

impl SectionDiff {
    /// Compare two states of the same line
    pub fn between(before: &Sections, after: &Sections) -> Self {
        let old: HashSet<&Section> = before.iter().collect();
        let new: HashSet<&Section> = after.iter().collect();
        Self {
            added: after.iter().filter(|s| !old.contains(s)).copied().collect(),
            removed: before.iter().filter(|s| !new.contains(s)).copied().collect(),
        }
    }

    /// Whether the edit changed nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
