//! Workflow-instance metadata lookup.

use serde::Deserialize;

use crate::{ApiError, bearer_client, read_success};

/// A workflow instance as reported by the workflow service.
///
/// The importer only consumes the identifiers; scheduling state and step
/// parameters stay server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: String,
    pub dataset_id: String,
    #[serde(default)]
    pub package_ids: Vec<String>,
}

/// Client for the workflow service.
pub struct WorkflowClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorkflowClient {
    /// Creates a client against the given host, authenticated with a
    /// session token.
    pub fn new(host: &str, token: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: bearer_client(token)?,
            base_url: host.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a workflow instance by id.
    pub async fn get_workflow_instance(&self, id: &str) -> Result<WorkflowInstance, ApiError> {
        let url = format!("{}/workflows/instances/{id}", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let body = read_success(resp).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = Vec::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                if let Ok(n) = stream.read(&mut buf).await {
                    request.extend_from_slice(&buf[..n]);
                }

                let resp = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    #[tokio::test]
    async fn get_workflow_instance_parses_response() {
        let json = r#"{
            "id": "wf-1",
            "datasetId": "N:dataset:1",
            "packageIds": ["N:package:1"]
        }"#;
        let (url, handle) = mock_server(200, json).await;

        let client = WorkflowClient::new(&url, "tok").unwrap();
        let instance = client.get_workflow_instance("wf-1").await.unwrap();

        assert_eq!(instance.id, "wf-1");
        assert_eq!(instance.dataset_id, "N:dataset:1");
        assert_eq!(instance.package_ids, vec!["N:package:1"]);

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("GET /workflows/instances/wf-1"));
        assert!(request.contains("authorization: Bearer tok"));
    }

    #[tokio::test]
    async fn get_workflow_instance_missing_package_ids() {
        let json = r#"{"id": "wf-2", "datasetId": "N:dataset:2"}"#;
        let (url, handle) = mock_server(200, json).await;

        let client = WorkflowClient::new(&url, "tok").unwrap();
        let instance = client.get_workflow_instance("wf-2").await.unwrap();
        assert!(instance.package_ids.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn get_workflow_instance_not_found() {
        let (url, handle) = mock_server(404, r#"{"message":"no such instance"}"#).await;

        let client = WorkflowClient::new(&url, "tok").unwrap();
        let err = client.get_workflow_instance("wf-404").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 404, .. }));

        handle.abort();
    }
}
