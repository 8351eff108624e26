//! Upload coordination across a fixed worker pool.

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::error::UploadError;
use crate::retry::RetryPolicy;
use crate::service::ImportService;
use crate::types::AssetFile;
use crate::worker::{self, UploadContext};

/// Number of files transferred concurrently.
pub const MAX_CONCURRENT_UPLOADS: usize = 4;

/// Runs per-file uploads across a bounded pool of concurrent workers and
/// aggregates their outcomes into an all-or-nothing verdict.
pub struct UploadCoordinator {
    service: Arc<dyn ImportService>,
    http: reqwest::Client,
    policy: RetryPolicy,
    concurrency: usize,
}

impl UploadCoordinator {
    /// Creates a coordinator with the default retry policy and pool size.
    pub fn new(service: Arc<dyn ImportService>) -> Self {
        Self {
            service,
            http: reqwest::Client::new(),
            policy: RetryPolicy::default(),
            concurrency: MAX_CONCURRENT_UPLOADS,
        }
    }

    /// Overrides the per-file retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the worker pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Uploads every file and returns whether all of them succeeded.
    ///
    /// One task per file, all submitted up front and gated by a semaphore
    /// holding the pool's permits; the call blocks until the pool drains.
    /// The first worker error is re-raised once draining finishes;
    /// in-flight siblings are not cancelled. A success count short of the
    /// file count is a run-level failure, never a silent partial result.
    pub async fn run(
        &self,
        import_id: &str,
        dataset_id: &str,
        files: &[AssetFile],
    ) -> Result<bool, UploadError> {
        let total = files.len();
        let ctx = Arc::new(UploadContext {
            service: Arc::clone(&self.service),
            http: self.http.clone(),
            import_id: import_id.to_string(),
            dataset_id: dataset_id.to_string(),
            policy: self.policy.clone(),
            counter: Mutex::new(0),
            total,
        });

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut pool: JoinSet<Result<bool, UploadError>> = JoinSet::new();

        for file in files {
            let ctx = Arc::clone(&ctx);
            let permits = Arc::clone(&permits);
            let file = file.clone();
            pool.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| UploadError::Join(e.to_string()))?;
                worker::upload_file(&ctx, &file).await
            });
        }

        let mut successes = 0usize;
        let mut first_error: Option<UploadError> = None;

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(Ok(true)) => successes += 1,
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error.get_or_insert(UploadError::Join(e.to_string()));
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            import_id = %import_id,
            uploaded = *ctx.counter.lock().unwrap(),
            "uploaded {successes} viewer asset files"
        );

        if successes != total {
            return Err(UploadError::Incomplete {
                succeeded: successes,
                total,
            });
        }
        Ok(true)
    }
}
