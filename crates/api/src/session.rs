//! API-key session handshake.
//!
//! The platform authenticates batch jobs with an API key/secret pair
//! exchanged for a short-lived session token. All other clients attach
//! that token as a bearer header.

use serde::{Deserialize, Serialize};

use crate::{ApiError, read_success};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiSessionRequest<'a> {
    api_key: &'a str,
    api_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSessionResponse {
    session_token: String,
}

/// An authenticated API session.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// Returns the raw session token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Client for the authentication host.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Creates a client against the given authentication host.
    pub fn new(host: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: host.trim_end_matches('/').to_string(),
        })
    }

    /// Exchanges an API key/secret pair for a session.
    pub async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<Session, ApiError> {
        let url = format!("{}/authentication/api/session", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&ApiSessionRequest {
                api_key,
                api_secret,
            })
            .send()
            .await?;
        let body = read_success(resp).await?;

        let session: ApiSessionResponse = serde_json::from_slice(&body)?;
        Ok(Session {
            token: session.session_token,
        })
    }
}

/// Owns the session for one processor run.
///
/// Tokens outlive any single import by a wide margin, so there is no
/// refresh handling here; a run that outlasts its token fails and is
/// re-dispatched by the workflow engine.
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    /// Performs the handshake and stores the resulting session.
    pub async fn establish(
        auth: &AuthClient,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Self, ApiError> {
        let session = auth.authenticate(api_key, api_secret).await?;
        tracing::debug!("API session established");
        Ok(Self { session })
    }

    /// Returns the session token for bearer authentication.
    pub fn token(&self) -> &str {
        self.session.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot HTTP server answering with the given status and body.
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
    async fn authenticate_returns_session() {
        let (url, handle) = mock_server(200, r#"{"sessionToken":"tok-123"}"#).await;

        let client = AuthClient::new(&url).unwrap();
        let session = client.authenticate("key", "secret").await.unwrap();
        assert_eq!(session.token(), "tok-123");

        let request = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /authentication/api/session"));
        assert!(request.contains(r#""apiKey":"key""#));
        assert!(request.contains(r#""apiSecret":"secret""#));
    }

    #[tokio::test]
    async fn authenticate_rejected_credentials() {
        let (url, handle) = mock_server(401, r#"{"message":"invalid credentials"}"#).await;

        let client = AuthClient::new(&url).unwrap();
        let err = client.authenticate("key", "bad").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 401, .. }));

        handle.abort();
    }

    #[tokio::test]
    async fn session_manager_exposes_token() {
        let (url, handle) = mock_server(200, r#"{"sessionToken":"tok-456"}"#).await;

        let client = AuthClient::new(&url).unwrap();
        let manager = SessionManager::establish(&client, "key", "secret")
            .await
            .unwrap();
        assert_eq!(manager.token(), "tok-456");

        handle.abort();
    }

    #[test]
    fn new_strips_trailing_slash() {
        let client = AuthClient::new("http://example.test/").unwrap();
        assert_eq!(client.base_url, "http://example.test");
    }
}
