//! In-memory line registry
//!
//! Lines live in a `DashMap` keyed by id, so edits on different lines never
//! contend. Edits on the same line hold that entry's write guard for the whole
//! edit. Line names are unique; a second map reserves names atomically.

use crate::core::error::{Error, Result};
use crate::core::types::{LineId, StationId};
use crate::line::{validate_name, Line, Section};
use crate::storage::{LineStore, SectionDiff};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Line registry held entirely in memory
#[derive(Debug)]
pub struct MemLineStore {
    lines: DashMap<LineId, Line>,
    names: DashMap<String, LineId>,
    next_id: AtomicU64,
}

impl Default for MemLineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemLineStore {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            lines: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Rebuild a registry from previously saved lines
    pub fn from_lines(lines: Vec<Line>) -> Result<Self> {
        let store = Self::new();
        let mut max_id = 0;
        for line in lines {
            let id = line.id();
            if store.lines.contains_key(&id) {
                return Err(Error::already_exists(format!("line {}", id)));
            }
            match store.names.entry(line.name().to_string()) {
                Entry::Occupied(_) => {
                    return Err(Error::already_exists(format!("line name {}", line.name())))
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            max_id = max_id.max(id.get());
            store.lines.insert(id, line);
        }
        store.next_id.store(max_id + 1, Ordering::Relaxed);
        debug!(lines = store.lines.len(), "line registry rebuilt");
        Ok(store)
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All lines, ordered by id, for saving
    pub fn snapshot(&self) -> Vec<Line> {
        self.list_lines()
    }

    fn edit_line<F>(&self, id: LineId, edit: F) -> Result<SectionDiff>
    where
        F: FnOnce(&mut Line) -> std::result::Result<(), crate::core::SectionError>,
    {
        let mut line = self
            .lines
            .get_mut(&id)
            .ok_or_else(|| Error::line_not_found(id))?;
        let before = line.sections().clone();
        if let Err(e) = edit(line.value_mut()) {
            if e.is_internal_defect() {
                tracing::error!(line = %id, error = %e, "line is corrupted");
            } else {
                warn!(line = %id, error = %e, "section edit rejected");
            }
            return Err(e.into());
        }
        Ok(SectionDiff::between(&before, line.sections()))
    }
}

impl LineStore for MemLineStore {
    fn create_line(&self, name: &str, color: &str, first: Section) -> Result<Line> {
        validate_name(name)?;

        // the name entry is released before `lines` is touched; update_line
        // takes the two maps in the opposite order
        let line = match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => {
                warn!(name, "line name already taken");
                return Err(Error::already_exists(format!("line name {}", name)));
            }
            Entry::Vacant(slot) => {
                let id = LineId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                let line = Line::new(id, name, color, first)?;
                slot.insert(id);
                line
            }
        };
        self.lines.insert(line.id(), line.clone());
        info!(line = %line.id(), name, "line created");
        Ok(line)
    }

    fn get_line(&self, id: LineId) -> Result<Line> {
        self.lines
            .get(&id)
            .map(|line| line.clone())
            .ok_or_else(|| Error::line_not_found(id))
    }

    fn list_lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self.lines.iter().map(|entry| entry.value().clone()).collect();
        lines.sort_by_key(Line::id);
        lines
    }

    fn update_line(&self, id: LineId, name: &str, color: &str) -> Result<Line> {
        // hold the line for the whole rename so concurrent renames serialise
        let mut line = self
            .lines
            .get_mut(&id)
            .ok_or_else(|| Error::line_not_found(id))?;
        let old_name = line.name().to_string();
        let renamed = old_name != name;

        if renamed {
            match self.names.entry(name.to_string()) {
                Entry::Occupied(_) => {
                    return Err(Error::already_exists(format!("line name {}", name)))
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        if let Err(e) = line.update(name, color) {
            if renamed {
                self.names.remove(name);
            }
            return Err(e);
        }
        if renamed {
            self.names.remove(&old_name);
        }
        info!(line = %id, name, "line updated");
        Ok(line.value().clone())
    }

    fn delete_line(&self, id: LineId) -> Result<()> {
        let (_, line) = self
            .lines
            .remove(&id)
            .ok_or_else(|| Error::line_not_found(id))?;
        self.names.remove(line.name());
        info!(line = %id, "line deleted");
        Ok(())
    }

    fn add_section(&self, id: LineId, section: Section) -> Result<SectionDiff> {
        self.edit_line(id, |line| line.add_section(section))
    }

    fn remove_station(&self, id: LineId, station: StationId) -> Result<SectionDiff> {
        self.edit_line(id, |line| line.remove_station(station))
    }
}
