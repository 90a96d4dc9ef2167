use std::time::Duration;

use async_trait::async_trait;
use framecast_core::api::{
    GenerationOptions, ProviderConfig, ProviderError, TaskHandle, TaskSnapshot, ValidationResult,
    VideoProvider,
};
use serde::Serialize;
use serde_json::Value;

use super::wire::{
    build_content, CreateTaskRequest, CreateTaskResponse, RelayCreateRequest, TaskResponse,
};
use crate::http::{network_error, read_json};

const PROVIDER_NAME: &str = "volcengine";
const MIN_API_KEY_LEN: usize = 10;

/// Volcengine Ark content-generation backend.
///
/// Talks to the vendor directly with bearer auth, or to a relay when
/// `relay_url` is configured. The relay receives credentials in the body on
/// create and in `x-api-key`/`x-endpoint` headers on status queries.
pub struct VolcengineProvider {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl VolcengineProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_millis(config.advanced.request_timeout_ms());
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { config, http })
    }

    fn relay(&self) -> Option<&str> {
        self.config
            .relay_url
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }

    fn tasks_url(&self) -> String {
        format!(
            "{}/contents/generations/tasks",
            self.config.endpoint().trim_end_matches('/')
        )
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        bearer: bool,
    ) -> Result<Value, ProviderError> {
        let mut req = self.http.post(url).json(body);
        if bearer {
            req = req.bearer_auth(&self.config.api_key);
        }
        let resp = req.send().await.map_err(|e| network_error(e, url))?;
        read_json(resp, "create task").await
    }
}

#[async_trait]
impl VideoProvider for VolcengineProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn create_task(&self, options: &GenerationOptions) -> Result<TaskHandle, ProviderError> {
        self.ensure_valid_config()?;

        let content = build_content(options, &self.config.video_config);
        let model = self.config.model();

        tracing::info!(
            target: "framecast.provider",
            stage = "task.create",
            provider = PROVIDER_NAME,
            model = %model,
            parts = content.len(),
            has_api_key = !self.config.api_key.is_empty(),
            relay = self.relay().is_some()
        );

        let value = match self.relay() {
            Some(relay) => {
                let url = format!("{relay}/api/video/create");
                let body = RelayCreateRequest {
                    api_key: &self.config.api_key,
                    endpoint: self.config.endpoint(),
                    model,
                    content: &content,
                };
                self.post_json(&url, &body, false).await?
            }
            None => {
                let body = CreateTaskRequest {
                    model,
                    content: &content,
                };
                self.post_json(&self.tasks_url(), &body, true).await?
            }
        };

        let created: CreateTaskResponse = serde_json::from_value(value)
            .map_err(|e| ProviderError::Decode(format!("create task: {e}")))?;
        let id = created
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ProviderError::Decode("create task: response has no task id".into()))?;

        tracing::info!(
            target: "framecast.provider",
            stage = "task.created",
            provider = PROVIDER_NAME,
            task_id = %id
        );
        Ok(TaskHandle::new(id))
    }

    async fn get_task_status(&self, task_id: &str) -> Result<TaskSnapshot, ProviderError> {
        self.ensure_valid_config()?;
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(ProviderError::Config("task id is empty".into()));
        }

        let (url, req) = match self.relay() {
            Some(relay) => {
                let url = format!("{relay}/api/video/status/{task_id}");
                let req = self
                    .http
                    .get(&url)
                    .header("x-api-key", &self.config.api_key)
                    .header("x-endpoint", self.config.endpoint());
                (url, req)
            }
            None => {
                let url = format!("{}/{task_id}", self.tasks_url());
                let req = self.http.get(&url).bearer_auth(&self.config.api_key);
                (url, req)
            }
        };

        let resp = req.send().await.map_err(|e| network_error(e, &url))?;
        let value = read_json(resp, "query task").await?;
        let task: TaskResponse = serde_json::from_value(value)
            .map_err(|e| ProviderError::Decode(format!("query task: {e}")))?;

        let snapshot = task.into_snapshot(task_id);
        tracing::debug!(
            target: "framecast.provider",
            stage = "task.status",
            provider = PROVIDER_NAME,
            task_id = %snapshot.id,
            status = %snapshot.status
        );
        Ok(snapshot)
    }

    fn validate_config(&self) -> ValidationResult {
        let key = self.config.api_key.trim();
        let mut errors = Vec::new();
        if key.is_empty() {
            errors.push("API key is empty".to_string());
        } else if key.chars().count() < MIN_API_KEY_LEN {
            errors.push("API key format is invalid".to_string());
        }
        ValidationResult::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecast_core::api::{TaskStatus, VideoConfig};
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const KEY: &str = "ark-0123456789";

    fn provider_for(endpoint: String) -> VolcengineProvider {
        let mut config = ProviderConfig::new(KEY);
        config.endpoint = Some(endpoint);
        VolcengineProvider::new(config).unwrap()
    }

    #[test]
    fn validate_config_reports_empty_and_short_keys() {
        let empty = VolcengineProvider::new(ProviderConfig::new("")).unwrap();
        assert_eq!(empty.validate_config().errors, vec!["API key is empty"]);

        let short = VolcengineProvider::new(ProviderConfig::new("abc")).unwrap();
        let result = short.validate_config();
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["API key format is invalid"]);

        let ok = VolcengineProvider::new(ProviderConfig::new(KEY)).unwrap();
        assert!(ok.validate_config().valid);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_any_request() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut config = ProviderConfig::new("");
        config.endpoint = Some(server.url());
        let provider = VolcengineProvider::new(config).unwrap();

        let err = provider
            .create_task(&GenerationOptions::text("a cat"))
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Config("API key is empty".into()));

        let err = provider.get_task_status("t1").await.unwrap_err();
        assert!(err.is_config());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn create_task_posts_bearer_request_and_accepts_201() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/contents/generations/tasks")
            .match_header("authorization", format!("Bearer {KEY}").as_str())
            .match_body(Matcher::Json(json!({
                "model": "doubao-seedance-1-0-pro-250528",
                "content": [
                    {"type": "text", "text": "a cat running"},
                    {"type": "image_url", "image_url": {"url": "https://img/first.png"}}
                ]
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"cgt-20250101"}"#)
            .create_async()
            .await;

        let provider = provider_for(server.url());
        let opts = GenerationOptions::text("a cat running")
            .with_frames(Some("https://img/first.png".into()), None);
        let handle = provider.create_task(&opts).await.unwrap();

        assert_eq!(handle.id, "cgt-20250101");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn create_task_sends_prompt_flags_from_video_config() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/contents/generations/tasks")
            .match_body(Matcher::PartialJson(json!({
                "content": [{"type": "text", "text": "sunset --resolution 720p --duration 10"}]
            })))
            .with_status(200)
            .with_body(r#"{"id":"t9"}"#)
            .create_async()
            .await;

        let mut config = ProviderConfig::new(KEY);
        config.endpoint = Some(server.url());
        config.video_config = VideoConfig {
            resolution: Some(framecast_core::api::Resolution::P720),
            duration: Some(10),
            ..VideoConfig::default()
        };
        let provider = VolcengineProvider::new(config).unwrap();
        provider
            .create_task(&GenerationOptions::text("sunset"))
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn create_task_without_id_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/contents/generations/tasks")
            .with_status(200)
            .with_body(r#"{"id":""}"#)
            .create_async()
            .await;

        let err = provider_for(server.url())
            .create_task(&GenerationOptions::text("a cat"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn non_2xx_uses_body_error_text() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/contents/generations/tasks")
            .with_status(400)
            .with_body(r#"{"error":{"code":"InvalidParameter","message":"bad ratio"}}"#)
            .create_async()
            .await;

        let err = provider_for(server.url())
            .create_task(&GenerationOptions::text("a cat"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::remote(400, "InvalidParameter: bad ratio")
        );
    }

    #[tokio::test]
    async fn non_2xx_without_error_text_uses_status_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/contents/generations/tasks/t1")
            .with_status(502)
            .create_async()
            .await;

        let err = provider_for(server.url())
            .get_task_status("t1")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::remote(502, "query task failed (HTTP 502)"));
    }

    #[tokio::test]
    async fn get_task_status_maps_vendor_task() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/contents/generations/tasks/t1")
            .match_header("authorization", format!("Bearer {KEY}").as_str())
            .with_status(200)
            .with_body(
                json!({
                    "id": "t1",
                    "status": "succeeded",
                    "content": {"video_url": "https://x/video.mp4"},
                    "duration": 5,
                    "seed": 7
                })
                .to_string(),
            )
            .create_async()
            .await;

        let snapshot = provider_for(server.url())
            .get_task_status("t1")
            .await
            .unwrap();
        assert_eq!(snapshot.status, TaskStatus::Succeeded);
        assert_eq!(snapshot.video_url.as_deref(), Some("https://x/video.mp4"));
        assert_eq!(snapshot.metadata["seed"], json!(7));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn relay_mode_routes_credentials_through_body_and_headers() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/api/video/create")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({
                "apiKey": KEY,
                "endpoint": "https://ark.example/api/v3",
                "model": "custom-model"
            })))
            .with_status(200)
            .with_body(r#"{"id":"r1"}"#)
            .create_async()
            .await;
        let status = server
            .mock("GET", "/api/video/status/r1")
            .match_header("x-api-key", KEY)
            .match_header("x-endpoint", "https://ark.example/api/v3")
            .with_status(200)
            .with_body(r#"{"id":"r1","status":"running"}"#)
            .create_async()
            .await;

        let mut config = ProviderConfig::new(KEY);
        config.endpoint = Some("https://ark.example/api/v3".into());
        config.model = Some("custom-model".into());
        config.relay_url = Some(format!("{}/", server.url()));
        let provider = VolcengineProvider::new(config).unwrap();

        let handle = provider
            .create_task(&GenerationOptions::text("a cat"))
            .await
            .unwrap();
        let snapshot = provider.get_task_status(&handle.id).await.unwrap();

        assert_eq!(snapshot.status, TaskStatus::Running);
        create.assert_async().await;
        status.assert_async().await;
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        let provider = provider_for("http://127.0.0.1:1".to_string());
        let err = provider.get_task_status("t1").await.unwrap_err();
        assert!(matches!(err, ProviderError::Network { .. }));
    }

    #[tokio::test]
    async fn empty_task_id_is_rejected() {
        let provider = provider_for("http://127.0.0.1:1".to_string());
        let err = provider.get_task_status("  ").await.unwrap_err();
        assert_eq!(err, ProviderError::Config("task id is empty".into()));
    }
}
