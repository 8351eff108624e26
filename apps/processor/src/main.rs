//! Viewer-asset import processor entry point.
//!
//! Runs as the final step of a rendering workflow: the previous step
//! stages rendered viewer assets plus a configuration manifest in the
//! output directory, and this processor registers and uploads them into
//! the workflow's dataset package.

mod config;
mod service_adapter;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use ingest_api::{AuthClient, ImportClient, SessionManager, WorkflowClient};
use ingest_upload::{ImportRequest, Importer};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::service_adapter::PlatformImportService;

#[tokio::main]
async fn main() {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "viewer asset import failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        workflow_instance_id = %config.workflow_instance_id,
        "starting viewer asset import processor"
    );

    let staged = staged_input_entry(&config.input_dir)?;
    tracing::debug!(input = %staged.display(), "validated staged input");

    let auth = AuthClient::new(&config.api_host)?;
    let session = SessionManager::establish(&auth, &config.api_key, &config.api_secret)
        .await
        .context("authentication handshake failed")?;

    let workflow = WorkflowClient::new(&config.api2_host, session.token())?;
    let instance = workflow
        .get_workflow_instance(&config.workflow_instance_id)
        .await
        .context("failed to fetch workflow instance")?;
    tracing::info!(
        dataset_id = %instance.dataset_id,
        packages = instance.package_ids.len(),
        "fetched workflow instance"
    );

    let import_client = ImportClient::new(&config.api2_host, session.token())?;
    let importer = Importer::new(Arc::new(PlatformImportService::new(import_client)));

    let request = ImportRequest {
        workflow_instance_id: instance.id,
        dataset_id: instance.dataset_id,
        package_ids: instance.package_ids,
        asset_dir: config.output_dir.clone(),
    };
    let summary = importer.run(&request).await?;

    tracing::info!(
        import_id = %summary.import_id,
        uploaded = summary.uploaded,
        "import finished"
    );
    Ok(())
}

/// The upstream rendering step stages exactly one top-level entry in the
/// input directory; any other shape means this run was dispatched with
/// inputs the renderer does not support yet.
fn staged_input_entry(input_dir: &Path) -> anyhow::Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(input_dir)
        .with_context(|| format!("cannot read input directory {}", input_dir.display()))?
    {
        entries.push(entry?.path());
    }

    match entries.as_slice() {
        [single] => Ok(single.clone()),
        other => bail!(
            "expected exactly one staged input in {}, found {}",
            input_dir.display(),
            other.len()
        ),
    }
}
