//! Section collection for a single line
//!
//! The sections of a line are kept in no particular order, but together they
//! must always form exactly one simple directed path: one head station with no
//! incoming section, one tail station with no outgoing section, and every other
//! station with exactly one of each. Every public mutation either restores that
//! shape or fails without touching the collection.

use crate::core::error::SectionError;
use crate::core::types::StationId;
use crate::line::Section;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// The owning collection of sections for one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections {
    sections: Vec<Section>,
}

/// Which side of an existing section a new one is carved out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    Up(usize),
    Down(usize),
}

impl Sections {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from previously stored sections without re-validating them
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Rehydrate and check that the sections form a single simple path
    pub fn try_from_sections(sections: Vec<Section>) -> Result<Self, SectionError> {
        let sections = Self::from_sections(sections);
        sections.ordered_stations()?;
        Ok(sections)
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All sections, in storage order
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    /// Iterate over all sections, in storage order
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Consume the collection, returning the sections
    pub fn into_vec(self) -> Vec<Section> {
        self.sections
    }

    /// Whether `station` is an endpoint of any section
    pub fn contains_station(&self, station: StationId) -> bool {
        self.sections.iter().any(|s| s.touches(station))
    }

    /// Sum of all section distances
    pub fn total_distance(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.distance().get())).sum()
    }

    /// Insert a section, extending the line or splitting an existing section
    pub fn insert(&mut self, section: Section) -> Result<(), SectionError> {
        if self.sections.is_empty() {
            debug!(up = %section.up_station(), down = %section.down_station(), "first section");
            self.sections.push(section);
            return Ok(());
        }

        self.validate_insert(&section)?;

        match self.find_split(&section)? {
            Some(Split::Up(idx)) => {
                self.sections[idx].shrink_from_up(&section)?;
                debug!(
                    up = %section.up_station(),
                    down = %section.down_station(),
                    remaining = %self.sections[idx].distance(),
                    "split section from up station"
                );
            }
            Some(Split::Down(idx)) => {
                self.sections[idx].shrink_from_down(&section)?;
                debug!(
                    up = %section.up_station(),
                    down = %section.down_station(),
                    remaining = %self.sections[idx].distance(),
                    "split section from down station"
                );
            }
            None => {
                debug!(
                    up = %section.up_station(),
                    down = %section.down_station(),
                    "extended line at terminal"
                );
            }
        }

        self.sections.push(section);
        Ok(())
    }

    fn validate_insert(&self, section: &Section) -> Result<(), SectionError> {
        let stations = self.station_set();
        let up_in = stations.contains(&section.up_station());
        let down_in = stations.contains(&section.down_station());

        if up_in && down_in {
            return Err(SectionError::DuplicateSection {
                up: section.up_station(),
                down: section.down_station(),
            });
        }
        if !up_in && !down_in {
            return Err(SectionError::DisconnectedSection {
                up: section.up_station(),
                down: section.down_station(),
            });
        }
        Ok(())
    }

    /// Locate the section that has to make room for `section`, if any
    ///
    /// Checks that it fits before anything is mutated.
    fn find_split(&self, section: &Section) -> Result<Option<Split>, SectionError> {
        let split = match self.unique_match(|s| s.overlaps_at_up_station(section))? {
            Some(idx) => Some(Split::Up(idx)),
            None => self
                .unique_match(|s| s.overlaps_at_down_station(section))?
                .map(Split::Down),
        };

        if let Some(Split::Up(idx) | Split::Down(idx)) = split {
            let existing = &self.sections[idx];
            if !existing.can_absorb(section) {
                return Err(SectionError::SectionTooLong {
                    existing: existing.distance(),
                    inserted: section.distance(),
                });
            }
        }
        Ok(split)
    }

    fn unique_match(&self, pred: impl Fn(&Section) -> bool) -> Result<Option<usize>, SectionError> {
        let mut found = None;
        for (idx, section) in self.sections.iter().enumerate() {
            if !pred(section) {
                continue;
            }
            if found.is_some() {
                return Err(defect(format!(
                    "more than one section shares an endpoint with {:?}",
                    section
                )));
            }
            found = Some(idx);
        }
        Ok(found)
    }

    /// Remove a station, merging its two neighbouring sections when it is interior
    pub fn remove_station(&mut self, station: StationId) -> Result<(), SectionError> {
        if self.sections.len() < 2 {
            return Err(SectionError::SingleSection);
        }

        let touching: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.touches(station))
            .map(|(idx, _)| idx)
            .collect();

        match touching.as_slice() {
            [] => Err(SectionError::StationNotFound(station)),
            [idx] => {
                let removed = self.sections.remove(*idx);
                debug!(%station, section = ?removed, "removed terminal station");
                Ok(())
            }
            [first, second] => self.merge_around(station, *first, *second),
            more => Err(defect(format!(
                "station {} is touched by {} sections",
                station,
                more.len()
            ))),
        }
    }

    fn merge_around(&mut self, station: StationId, first: usize, second: usize) -> Result<(), SectionError> {
        let (incoming, outgoing) = match (self.sections[first], self.sections[second]) {
            (a, b) if a.down_station() == station && b.up_station() == station => (first, second),
            (a, b) if b.down_station() == station && a.up_station() == station => (second, first),
            (a, b) => {
                return Err(defect(format!(
                    "station {} is not between {:?} and {:?}",
                    station, a, b
                )))
            }
        };

        let before = self.sections[incoming];
        let after = self.sections[outgoing];
        let distance = before
            .distance()
            .checked_add(after.distance())
            .ok_or(SectionError::DistanceOverflow {
                first: before.distance(),
                second: after.distance(),
            })?;
        let merged = Section::with_distance(before.up_station(), after.down_station(), distance)
            .map_err(|_| defect(format!("merging around {} closes a cycle", station)))?;

        self.sections[incoming] = merged;
        self.sections.remove(outgoing);
        debug!(%station, merged = ?merged, "merged sections around removed station");
        Ok(())
    }

    /// Stations from head to tail
    pub fn ordered_stations(&self) -> Result<Vec<StationId>, SectionError> {
        if self.sections.is_empty() {
            return Ok(Vec::new());
        }

        let mut next: HashMap<StationId, StationId> = HashMap::with_capacity(self.sections.len());
        let mut downs: HashSet<StationId> = HashSet::with_capacity(self.sections.len());
        for section in &self.sections {
            if next.insert(section.up_station(), section.down_station()).is_some() {
                return Err(defect(format!(
                    "station {} has more than one outgoing section",
                    section.up_station()
                )));
            }
            downs.insert(section.down_station());
        }

        let mut heads = next.keys().filter(|s| !downs.contains(*s));
        let head = match (heads.next(), heads.next()) {
            (Some(head), None) => *head,
            (None, _) => return Err(defect("no head station")),
            (Some(_), Some(_)) => return Err(defect("more than one head station")),
        };

        let expected = self.sections.len() + 1;
        let mut stations = Vec::with_capacity(expected);
        let mut visited = HashSet::with_capacity(expected);
        let mut current = head;
        loop {
            if !visited.insert(current) {
                return Err(defect(format!("cycle through station {}", current)));
            }
            stations.push(current);
            match next.get(&current) {
                Some(down) => current = *down,
                None => break,
            }
        }

        if stations.len() != expected {
            return Err(defect(format!(
                "walk visited {} stations, expected {}",
                stations.len(),
                expected
            )));
        }
        Ok(stations)
    }

    fn station_set(&self) -> HashSet<StationId> {
        self.sections
            .iter()
            .flat_map(|s| [s.up_station(), s.down_station()])
            .collect()
    }
}

fn defect(msg: impl Into<String>) -> SectionError {
    let err = SectionError::malformed(msg);
    error!(error = %err, "section invariant violated");
    err
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
