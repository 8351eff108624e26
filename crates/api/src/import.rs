//! Import registration and presigned upload URLs.
//!
//! An import is the platform's record of intent to ingest a set of files
//! into a dataset package. Registering one allocates an upload slot per
//! file, addressed by the caller-chosen upload key; each slot's bytes go
//! directly to object storage through a presigned URL.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, bearer_client, read_success};

/// One file slot in an import registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFileEntry {
    pub upload_key: Uuid,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateImportRequest<'a> {
    workflow_instance_id: &'a str,
    dataset_id: &'a str,
    package_id: &'a str,
    files: &'a [ImportFileEntry],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateImportResponse {
    import_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignUrlResponse {
    url: String,
}

/// Client for the import service.
pub struct ImportClient {
    http: reqwest::Client,
    base_url: String,
}

impl ImportClient {
    /// Creates a client against the given host, authenticated with a
    /// session token.
    pub fn new(host: &str, token: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: bearer_client(token)?,
            base_url: host.trim_end_matches('/').to_string(),
        })
    }

    /// Registers an import and returns its id.
    ///
    /// Allocates one upload slot per entry in `files`. Callers validate
    /// the file list before registering; an empty list is a caller bug.
    pub async fn create(
        &self,
        workflow_instance_id: &str,
        dataset_id: &str,
        package_id: &str,
        files: &[ImportFileEntry],
    ) -> Result<String, ApiError> {
        debug_assert!(!files.is_empty(), "import registered with no files");

        let url = format!("{}/imports", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&CreateImportRequest {
                workflow_instance_id,
                dataset_id,
                package_id,
                files,
            })
            .send()
            .await?;
        let body = read_success(resp).await?;

        let created: CreateImportResponse = serde_json::from_slice(&body)?;
        Ok(created.import_id)
    }

    /// Fetches a presigned upload URL for one file slot.
    ///
    /// URLs are time-limited and may be single-use; callers request a
    /// fresh one for every upload attempt.
    pub async fn presign_url(
        &self,
        import_id: &str,
        dataset_id: &str,
        upload_key: Uuid,
    ) -> Result<String, ApiError> {
        let url = format!(
            "{}/imports/{import_id}/files/{upload_key}/presign",
            self.base_url
        );
        let resp = self
            .http
            .get(&url)
            .query(&[("datasetId", dataset_id)])
            .send()
            .await?;
        let body = read_success(resp).await?;

        let presign: PresignUrlResponse = serde_json::from_slice(&body)?;
        Ok(presign.url)
    }
}
