//! Data types for the import flow.

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::UploadError;

/// One staged payload file, addressed remotely by its upload key.
///
/// Built once at classification time and immutable for the rest of the
/// run.
#[derive(Debug, Clone)]
pub struct AssetFile {
    /// Caller-generated key identifying this file's upload slot.
    pub upload_key: Uuid,
    /// File name under which the platform stores the file.
    pub remote_file_name: String,
    /// Absolute path of the staged file on disk.
    pub local_path: PathBuf,
}

impl AssetFile {
    /// Builds an asset file from a staged path, keyed by a fresh UUID.
    ///
    /// The remote name is the path's base name.
    pub fn from_local_path(local_path: PathBuf) -> Result<Self, UploadError> {
        let remote_file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                UploadError::InvalidInput(format!(
                    "staged path has no file name: {}",
                    local_path.display()
                ))
            })?;

        Ok(Self {
            upload_key: Uuid::new_v4(),
            remote_file_name,
            local_path,
        })
    }
}

/// File slot data the registrar sends to the import service.
#[derive(Debug, Clone)]
pub struct ImportFileSpec {
    pub upload_key: Uuid,
    pub file_name: String,
}

impl From<&AssetFile> for ImportFileSpec {
    fn from(file: &AssetFile) -> Self {
        Self {
            upload_key: file.upload_key,
            file_name: file.remote_file_name.clone(),
        }
    }
}

/// Result of classifying a staged asset directory.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Payload files in walk order, absolute paths.
    pub payload_files: Vec<PathBuf>,
    /// The single configuration manifest found in the tree.
    pub manifest_path: PathBuf,
}

/// Outcome of a completed import run.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub import_id: String,
    pub uploaded: usize,
    pub manifest_path: PathBuf,
}
