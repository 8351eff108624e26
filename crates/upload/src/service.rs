//! Import service trait used by the upload pipeline.

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use crate::error::UploadError;
use crate::types::ImportFileSpec;

/// Remote import service as seen by the pipeline.
///
/// The processor implements this trait on top of the platform API client.
/// Using a trait keeps the pipeline decoupled from the wire client and
/// testable with mocks.
pub trait ImportService: Send + Sync {
    /// Registers an import for a single package and returns the import id.
    ///
    /// Not retried; a failure here aborts the run.
    fn create_import<'a>(
        &'a self,
        workflow_instance_id: &'a str,
        dataset_id: &'a str,
        package_id: &'a str,
        files: &'a [ImportFileSpec],
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>>;

    /// Fetches a fresh presigned upload URL for one file slot.
    ///
    /// Presigned URLs are time-limited and may be single-use, so workers
    /// call this once per upload attempt and never cache the result.
    fn presign_url<'a>(
        &'a self,
        import_id: &'a str,
        dataset_id: &'a str,
        upload_key: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + 'a>>;
}
