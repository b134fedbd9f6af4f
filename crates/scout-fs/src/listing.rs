//! Directory listing and file reads used while scanning install roots

use std::fs;
use std::io::ErrorKind;

use crate::{Error, NormalizedPath, Result};

/// List the immediate subdirectories of `root`, sorted by path.
///
/// A root that does not exist yields an empty list. A root that exists but
/// cannot be read is an [`Error::Io`]. Entries that are not directories
/// (after following symlinks) are skipped, as are entries whose metadata
/// cannot be read.
pub fn list_subdirectories(root: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_root = root.to_native();
    let entries = match fs::read_dir(&native_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(root = %root, "install root does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(&native_root, e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_root, e))?;
        let path = entry.path();
        // fs::metadata follows symlinks, so linked install dirs are kept
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => dirs.push(NormalizedPath::from(path)),
            Ok(_) => {}
            Err(e) => tracing::trace!(path = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}
