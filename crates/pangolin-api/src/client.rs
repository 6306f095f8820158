//! Setup daemon HTTP client
//!
//! Thin typed wrapper over the daemon's JSON endpoints. Every call is a
//! single best-effort attempt: no retries, no backoff. The caller decides
//! what a failure means for the UI.

use crate::error::SetupApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Environment info exposed by the daemon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvResponse {
    /// One-time token minted by the daemon for the setup session
    #[serde(rename = "PANGOLIN_SETUP_TOKEN")]
    pub setup_token: Option<String>,
}

/// Body for the connection test endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TestConnectionRequest {
    pub url: String,
    pub api_key: String,
}

/// Common `{status, error?, output?}` response shape used by the daemon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    pub status: Option<String>,
    pub error: Option<String>,
    pub output: Option<String>,
}

impl StatusResponse {
    fn failure_detail(&self) -> &str {
        self.error
            .as_deref()
            .or(self.output.as_deref())
            .unwrap_or("unknown error")
    }

    /// User-facing result line for a deploy response
    pub fn deploy_message(&self) -> String {
        if self.status.as_deref() == Some("deployed") {
            "Deployment successful!".to_string()
        } else {
            format!("Failed: {}", self.failure_detail())
        }
    }

    /// User-facing result line for a connection test response
    pub fn connection_message(&self) -> String {
        if self.status.as_deref() == Some("success") {
            "Connection successful!".to_string()
        } else {
            format!("Failed: {}", self.failure_detail())
        }
    }
}

/// Client for the setup daemon
#[derive(Debug, Clone)]
pub struct SetupClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl SetupClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SetupApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Use (or clear) a setup token for subsequent requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Parse a response body as JSON, surfacing non-success statuses first
    async fn decode<R: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<R, SetupApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SetupApiError::Http(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch `/api/env` and remember the setup token if one is present.
    ///
    /// Best-effort: a missing key, an unreachable daemon, or a garbled body
    /// all just leave the client unauthenticated.
    pub async fn discover_token(&mut self) -> Option<String> {
        let response = match self.get("/api/env").send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("env endpoint unreachable: {}", e);
                return None;
            }
        };
        let env: EnvResponse = match Self::decode(response).await {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!("env response not usable: {}", e);
                return None;
            }
        };
        self.token = env.setup_token.clone();
        env.setup_token
    }

    /// `GET /api/autodetect`: arbitrary JSON the caller merges into the
    /// configuration record
    pub async fn autodetect(&self) -> Result<Value, SetupApiError> {
        let response = self.get("/api/autodetect").send().await?;
        Self::decode(response).await
    }

    /// `POST /api/save_config` with the full configuration record.
    ///
    /// The response body is ignored beyond completion.
    pub async fn save_config<T: Serialize>(&self, config: &T) -> Result<(), SetupApiError> {
        let response = self.post("/api/save_config").json(config).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetupApiError::Http(status.as_u16()));
        }
        Ok(())
    }

    /// `POST /api/deploy_services` with no body
    pub async fn deploy_services(&self) -> Result<StatusResponse, SetupApiError> {
        let response = self.post("/api/deploy_services").send().await?;
        Self::decode(response).await
    }

    /// `POST /api/test_connection` probing one service's URL/API-key pair
    pub async fn test_connection(
        &self,
        url: &str,
        api_key: &str,
    ) -> Result<StatusResponse, SetupApiError> {
        let body = TestConnectionRequest {
            url: url.to_string(),
            api_key: api_key.to_string(),
        };
        let response = self.post("/api/test_connection").json(&body).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn client_for(server: &mockito::ServerGuard) -> SetupClient {
        SetupClient::new(server.url()).unwrap()
    }

    #[tokio::test]
    async fn deploy_success_maps_to_success_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/deploy_services")
            .with_status(200)
            .with_body(r#"{"status":"deployed"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let response = client.deploy_services().await.unwrap();
        assert_eq!(response.deploy_message(), "Deployment successful!");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn deploy_backend_failure_surfaces_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/deploy_services")
            .with_status(200)
            .with_body(r#"{"status":"error","error":"disk full"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let response = client.deploy_services().await.unwrap();
        assert_eq!(response.deploy_message(), "Failed: disk full");
    }

    #[tokio::test]
    async fn deploy_failure_falls_back_to_output_field() {
        let response = StatusResponse {
            status: Some("error".to_string()),
            error: None,
            output: Some("compose exited 1".to_string()),
        };
        assert_eq!(response.deploy_message(), "Failed: compose exited 1");
    }

    #[tokio::test]
    async fn connection_test_reports_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/test_connection")
            .match_body(mockito::Matcher::Json(json!({
                "url": "http://localhost:8989",
                "api_key": "abc",
            })))
            .with_status(200)
            .with_body(r#"{"status":"success"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let response = client
            .test_connection("http://localhost:8989", "abc")
            .await
            .unwrap();
        assert_eq!(response.connection_message(), "Connection successful!");
    }

    #[tokio::test]
    async fn autodetect_http_error_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/autodetect")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server).await;
        match client.autodetect().await {
            Err(SetupApiError::Http(500)) => {}
            other => panic!("expected Http(500), got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn discover_token_tolerates_missing_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/env")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let mut client = client_for(&server).await;
        assert_eq!(client.discover_token().await, None);
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn discovered_token_is_sent_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/env")
            .with_status(200)
            .with_body(r#"{"PANGOLIN_SETUP_TOKEN":"s3cret"}"#)
            .create_async()
            .await;
        let save = server
            .mock("POST", "/api/save_config")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let mut client = client_for(&server).await;
        assert_eq!(client.discover_token().await.as_deref(), Some("s3cret"));

        client.save_config(&json!({"media_server": "plex"})).await.unwrap();
        save.assert_async().await;
    }

    #[tokio::test]
    async fn save_config_posts_the_full_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/save_config")
            .match_body(mockito::Matcher::Json(json!({
                "media_server": "jellyfin",
                "storage_path": "/mnt/media",
            })))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = client_for(&server).await;
        client
            .save_config(&json!({
                "media_server": "jellyfin",
                "storage_path": "/mnt/media",
            }))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
