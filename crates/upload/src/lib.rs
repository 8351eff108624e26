//! Viewer-asset import pipeline.
//!
//! Takes a directory of staged viewer assets (payload files plus one
//! well-known configuration manifest), registers an import against the
//! platform, and uploads every payload file to presigned object-storage
//! URLs under a fixed concurrency cap with retry on transient failures.
//! A run either uploads everything or fails as a whole.

mod coordinator;
mod error;
mod importer;
mod retry;
mod scanner;
mod service;
mod types;
mod worker;

pub use coordinator::{MAX_CONCURRENT_UPLOADS, UploadCoordinator};
pub use error::UploadError;
pub use importer::{ImportRequest, Importer};
pub use retry::RetryPolicy;
pub use scanner::scan_asset_files;
pub use service::ImportService;
pub use types::{AssetFile, ImportFileSpec, ImportSummary, ScanOutcome};

/// Well-known name of the viewer configuration manifest staged alongside
/// the asset files.
pub const VIEWER_CONFIG_FILE: &str = "viewer-config.json";
