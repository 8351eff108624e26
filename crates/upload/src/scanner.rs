//! Staged-file classification.
//!
//! Recursively walks the staging directory and splits the single
//! configuration manifest from the payload files to upload.

use std::path::{Path, PathBuf};

use crate::VIEWER_CONFIG_FILE;
use crate::error::UploadError;
use crate::types::ScanOutcome;

/// Scans a staging directory and classifies its contents.
///
/// A file is the manifest iff its base name equals
/// [`VIEWER_CONFIG_FILE`](crate::VIEWER_CONFIG_FILE); every other file is
/// payload. A directory with no payload files or no manifest is invalid
/// input and fails before any remote call is made.
pub fn scan_asset_files(root: &Path) -> Result<ScanOutcome, UploadError> {
    let mut payload_files = Vec::new();
    let mut manifest_path = None;

    walk_dir(root, &mut payload_files, &mut manifest_path)?;

    if payload_files.is_empty() {
        return Err(UploadError::InvalidInput(format!(
            "no viewer asset files under {}",
            root.display()
        )));
    }
    let Some(manifest_path) = manifest_path else {
        return Err(UploadError::InvalidInput(format!(
            "missing {VIEWER_CONFIG_FILE} under {}",
            root.display()
        )));
    };

    Ok(ScanOutcome {
        payload_files,
        manifest_path,
    })
}

fn walk_dir(
    current: &Path,
    payload_files: &mut Vec<PathBuf>,
    manifest_path: &mut Option<PathBuf>,
) -> Result<(), UploadError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(&path, payload_files, manifest_path)?;
        } else if metadata.is_file() {
            if entry.file_name() == VIEWER_CONFIG_FILE {
                *manifest_path = Some(path);
            } else {
                payload_files.push(path);
            }
        }
    }

    Ok(())
}
