//! Atomic output writing.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Write `content` to `path` through a sibling temporary file.
///
/// On failure the target is left untouched and no temporary file remains.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    persist(path, content).map_err(|source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn persist(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Path of the JSON dump written next to an HTML output.
pub fn json_dump_path(output: &Path) -> PathBuf {
    output.with_extension("json")
}
