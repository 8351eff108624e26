//! End-to-end import pipeline.
//!
//! Classifies the staged directory, registers the import, fans the
//! payload files out to the upload pool, and demands total success.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::coordinator::UploadCoordinator;
use crate::error::UploadError;
use crate::retry::RetryPolicy;
use crate::scanner;
use crate::service::ImportService;
use crate::types::{AssetFile, ImportFileSpec, ImportSummary};

/// Parameters for one import run, resolved by the caller from workflow
/// metadata and local configuration.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub workflow_instance_id: String,
    pub dataset_id: String,
    /// Target packages reported by the workflow instance. Must contain
    /// exactly one entry; anything else aborts before registration.
    pub package_ids: Vec<String>,
    /// Directory holding the staged payload files and the manifest.
    pub asset_dir: PathBuf,
}

/// Drives one viewer-asset import from staged directory to uploaded set.
pub struct Importer {
    service: Arc<dyn ImportService>,
    coordinator: UploadCoordinator,
}

impl Importer {
    /// Creates an importer over the given import service.
    pub fn new(service: Arc<dyn ImportService>) -> Self {
        Self {
            coordinator: UploadCoordinator::new(Arc::clone(&service)),
            service,
        }
    }

    /// Overrides the transfer retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.coordinator = self.coordinator.with_retry_policy(policy);
        self
    }

    /// Runs the pipeline: classify, register, upload, aggregate.
    ///
    /// Any failure aborts the whole run; there is no partial-success
    /// result.
    pub async fn run(&self, req: &ImportRequest) -> Result<ImportSummary, UploadError> {
        let scan = scanner::scan_asset_files(&req.asset_dir)?;
        info!(
            files = scan.payload_files.len(),
            manifest = %scan.manifest_path.display(),
            "discovered staged viewer assets"
        );

        let package_id = single_package_id(&req.package_ids)?;
        info!(
            dataset_id = %req.dataset_id,
            package_id = %package_id,
            "starting import of viewer assets"
        );

        let files: Vec<AssetFile> = scan
            .payload_files
            .into_iter()
            .map(AssetFile::from_local_path)
            .collect::<Result<_, _>>()?;
        let specs: Vec<ImportFileSpec> = files.iter().map(ImportFileSpec::from).collect();

        let import_id = self
            .service
            .create_import(&req.workflow_instance_id, &req.dataset_id, package_id, &specs)
            .await?;
        info!(
            import_id = %import_id,
            files = files.len(),
            "initialized import, starting upload"
        );

        self.coordinator
            .run(&import_id, &req.dataset_id, &files)
            .await?;
        info!(import_id = %import_id, "viewer asset import complete");

        Ok(ImportSummary {
            import_id,
            uploaded: files.len(),
            manifest_path: scan.manifest_path,
        })
    }
}

/// Imports target exactly one package; grouping files across several
/// packages is decided upstream of this processor.
fn single_package_id(package_ids: &[String]) -> Result<&String, UploadError> {
    match package_ids {
        [id] => Ok(id),
        other => Err(UploadError::PackageCardinality(other.len())),
    }
}
