//! Async clients for the data-management platform API.
//!
//! Three surfaces, one per remote concern:
//! - [`AuthClient`]/[`SessionManager`]: API-key handshake yielding a session token
//! - [`WorkflowClient`]: workflow-instance metadata lookup
//! - [`ImportClient`]: import registration and per-file presigned upload URLs

mod error;
mod import;
mod session;
mod workflow;

pub use error::ApiError;
pub use import::{ImportClient, ImportFileEntry};
pub use session::{AuthClient, Session, SessionManager};
pub use workflow::{WorkflowClient, WorkflowInstance};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Builds a reqwest client that sends `Authorization: Bearer <token>`
/// on every request.
pub(crate) fn bearer_client(token: &str) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::InvalidToken)?,
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// Returns the response body if the status is 2xx, otherwise drains the
/// body into an [`ApiError::Api`].
pub(crate) async fn read_success(resp: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.bytes().await?.to_vec())
}
