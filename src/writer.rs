use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{IndexError, Result};
use crate::index::IndexEntry;

pub const DEFAULT_OUTPUT: &str = "./wildfly-doc-index.json";

/// Write `entries` as one pretty-printed JSON array.
///
/// The file is staged next to `path` and renamed into place, so a failed
/// write never leaves a partial index behind.
pub fn write_index(entries: &[IndexEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| IndexError::io(dir, e))?;
    staged
        .write_all(json.as_bytes())
        .and_then(|_| staged.flush())
        .map_err(|e| IndexError::io(staged.path(), e))?;
    staged.persist(path)?;

    info!("Index written to JSON file: {} ({} entries)", path.display(), entries.len());
    Ok(())
}
