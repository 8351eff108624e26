//! Upload pipeline error types.

/// Errors produced during an import run.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upload rejected with status {status}")]
    Status { status: u16 },

    #[error("import service error: {0}")]
    Service(String),

    #[error("import registration failed: {0}")]
    Registration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("expected exactly one package for import, got {0}")]
    PackageCardinality(usize),

    #[error("uploaded {succeeded} of {total} files")]
    Incomplete { succeeded: usize, total: usize },

    #[error("worker task failed: {0}")]
    Join(String),
}

impl UploadError {
    /// Whether this error is worth retrying.
    ///
    /// Transport failures, non-2xx storage responses, and service-call
    /// failures are transient; everything else (missing local files,
    /// rejected registrations, precondition violations) fails the attempt
    /// outright.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UploadError::Transport(_) | UploadError::Status { .. } | UploadError::Service(_)
        )
    }
}
