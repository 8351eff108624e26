//! Per-file upload worker.
//!
//! Each worker moves one file: it counts the attempt in the shared
//! progress counter, resolves a fresh presigned URL, and streams the
//! file's bytes to object storage. Transient failures are retried with
//! backoff; the counter increment is rolled back for every failed
//! attempt so the logged progress only reflects attempts still standing.

use std::sync::{Arc, Mutex};

use reqwest::header::CONTENT_LENGTH;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::error::UploadError;
use crate::retry::RetryPolicy;
use crate::service::ImportService;
use crate::types::AssetFile;

/// Shared state for one upload run, handed to every worker task.
pub(crate) struct UploadContext {
    pub(crate) service: Arc<dyn ImportService>,
    pub(crate) http: reqwest::Client,
    pub(crate) import_id: String,
    pub(crate) dataset_id: String,
    pub(crate) policy: RetryPolicy,
    /// Best-effort progress counter, for logging only. Aggregation is
    /// computed from per-file outcomes, never from this value.
    pub(crate) counter: Mutex<usize>,
    pub(crate) total: usize,
}

/// Uploads one file, retrying transient failures per the context policy.
///
/// Returns `true` on success. Exhausted retries re-raise the last
/// transient error; non-transient errors (e.g. a missing local file)
/// fail immediately.
pub(crate) async fn upload_file(
    ctx: &UploadContext,
    file: &AssetFile,
) -> Result<bool, UploadError> {
    ctx.policy
        .run(UploadError::is_transient, |_attempt| upload_once(ctx, file))
        .await?;
    Ok(true)
}

/// One upload attempt: count it, presign, transfer.
async fn upload_once(ctx: &UploadContext, file: &AssetFile) -> Result<(), UploadError> {
    {
        let mut counter = ctx.counter.lock().unwrap();
        *counter += 1;
        info!(
            import_id = %ctx.import_id,
            upload_key = %file.upload_key,
            "uploading {}/{} {}",
            *counter,
            ctx.total,
            file.local_path.display()
        );
    }

    match transfer(ctx, file).await {
        Ok(()) => Ok(()),
        Err(e) => {
            {
                let mut counter = ctx.counter.lock().unwrap();
                *counter -= 1;
            }
            error!(
                import_id = %ctx.import_id,
                upload_key = %file.upload_key,
                error = %e,
                "failed to upload {}",
                file.local_path.display()
            );
            Err(e)
        }
    }
}

/// Resolves a presigned URL for this attempt and PUTs the file bytes.
async fn transfer(ctx: &UploadContext, file: &AssetFile) -> Result<(), UploadError> {
    let upload_url = ctx
        .service
        .presign_url(&ctx.import_id, &ctx.dataset_id, file.upload_key)
        .await?;

    let staged = tokio::fs::File::open(&file.local_path).await?;
    let len = staged.metadata().await?.len();

    let resp = ctx
        .http
        .put(&upload_url)
        .header(CONTENT_LENGTH, len)
        .body(reqwest::Body::wrap_stream(ReaderStream::new(staged)))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(UploadError::Status {
            status: status.as_u16(),
        });
    }
    Ok(())
}
