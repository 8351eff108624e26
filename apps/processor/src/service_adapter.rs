//! Adapter bridging the platform `ImportClient` to the `ImportService`
//! trait required by the upload pipeline.
//!
//! The pipeline distinguishes registration failures (fatal, never
//! retried) from presign failures (transient, absorbed by the per-file
//! retry); the mapping happens here.

use std::future::Future;
use std::pin::Pin;

use ingest_api::{ImportClient, ImportFileEntry};
use ingest_upload::{ImportFileSpec, ImportService, UploadError};
use uuid::Uuid;

/// Implements `ImportService` by delegating to the platform API client.
pub struct PlatformImportService {
    client: ImportClient,
}

impl PlatformImportService {
    pub fn new(client: ImportClient) -> Self {
        Self { client }
    }
}

impl ImportService for PlatformImportService {
    fn create_import<'a>(
        &'a self,
        workflow_instance_id: &'a str,
        dataset_id: &'a str,
        package_id: &'a str,
        files: &'a [ImportFileSpec],
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>> {
        let entries: Vec<ImportFileEntry> = files
            .iter()
            .map(|f| ImportFileEntry {
                upload_key: f.upload_key,
                file_name: f.file_name.clone(),
            })
            .collect();

        Box::pin(async move {
            self.client
                .create(workflow_instance_id, dataset_id, package_id, &entries)
                .await
                .map_err(|e| UploadError::Registration(e.to_string()))
        })
    }

    fn presign_url<'a>(
        &'a self,
        import_id: &'a str,
        dataset_id: &'a str,
        upload_key: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            self.client
                .presign_url(import_id, dataset_id, upload_key)
                .await
                .map_err(|e| UploadError::Service(e.to_string()))
        })
    }
}
