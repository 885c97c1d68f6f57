use std::fs;
use std::io::Write;
use std::path::Path;

use linkgraph_core::error::{Error, Result};
use serde::Serialize;

/// Write `value` as pretty JSON to `path` via a temp file in the same
/// directory plus rename. Readers see the old file or the new one, never a
/// partial write; on error the old file is untouched.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
