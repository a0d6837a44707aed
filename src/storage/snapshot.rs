//! JSON snapshots of the line registry
//!
//! Writes go to `{path}.tmp` first and are renamed into place, so a crash
//! mid-write leaves the previous snapshot intact.

use crate::core::error::Result;
use crate::line::Line;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load lines from a snapshot file; a missing file is an empty registry
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<Line>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot, starting empty");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    // every line is rebuilt through Line::from_parts while parsing
    let lines: Vec<Line> = serde_json::from_str(&contents)?;
    info!(path = %path.display(), lines = lines.len(), "snapshot loaded");
    Ok(lines)
}

/// Save lines to a snapshot file
pub fn save_lines(path: impl AsRef<Path>, lines: &[Line], pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let data = if pretty {
        serde_json::to_vec_pretty(lines)?
    } else {
        serde_json::to_vec(lines)?
    };

    write_atomic(path, |file| file.write_all(&data))?;

    debug!(path = %path.display(), lines = lines.len(), "snapshot saved");
    Ok(())
}

/// Write through `{path}.tmp` and rename over `path`
///
/// The temp file is removed again if `write` or the sync fails.
fn write_atomic<F>(path: &Path, write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);

    let mut file = File::create(&tmp_path)?;
    let written = write(&mut file).and_then(|()| file.sync_all());
    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp snapshot");
        }
        return Err(e);
    }
    fs::rename(&tmp_path, path)
}
