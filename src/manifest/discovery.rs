//! Resolve a user supplied path to the manifest files it names.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};

/// Extensions picked up when scanning a directory.
const MANIFEST_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// List the candidate manifests for `path`.
///
/// A file is returned as is, whatever its extension. A directory is scanned
/// one level deep for regular `.yml`/`.yaml` files; nested directories and
/// other files are skipped. Results are sorted so load order is stable.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path).map_err(|source| ProvisionError::PathNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    tracing::info!("Reading directory: {}", path.display());

    let read_dir_err = |source| ProvisionError::DirectoryReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let file_type = entry.file_type().map_err(read_dir_err)?;
        let entry_path = entry.path();

        if !file_type.is_file() {
            tracing::debug!("Skipping non-file entry {}", entry_path.display());
            continue;
        }
        if !is_manifest_file(&entry_path) {
            tracing::debug!("Skipping non-manifest file {}", entry_path.display());
            continue;
        }
        files.push(entry_path);
    }

    files.sort();
    Ok(files)
}

/// Whether a directory entry has a manifest extension. Case sensitive.
pub fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}
