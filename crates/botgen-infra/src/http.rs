//! HttpBotBackend -- concrete [`BotBackend`] implementation over HTTP.
//!
//! Knowledge base and voice sample uploads are sent as `multipart/form-data`
//! with one `files` part per file plus a `bot_name` text field. Bot creation
//! is a JSON POST. Every request carries an `x-request-id` so a call can be
//! matched against the backend's logs.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use botgen_core::backend::BotBackend;
use botgen_types::backend::{
    CreateBotPayload, CreateBotResponse, KnowledgeBaseResponse, VoiceCloneResponse, endpoint,
};
use botgen_types::config::BackendConfig;
use botgen_types::error::{BackendError, ConfigError};
use botgen_types::form::UploadFile;

/// Header used to correlate a call with backend logs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest slice of an error body kept in [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 2_048;

/// Bot backend reached over HTTP.
pub struct HttpBotBackend {
    client: reqwest::Client,
    base_url: String,
    upload_timeout: Duration,
    create_timeout: Duration,
}

impl HttpBotBackend {
    /// Build a backend client from resolved configuration.
    ///
    /// Fails when no usable backend URL is configured.
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?.to_string();

        let client = reqwest::Client::builder()
            .user_agent(concat!("botgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Ok(Self {
            client,
            base_url,
            upload_timeout: config.upload_timeout(),
            create_timeout: config.create_timeout(),
        })
    }

    /// Override both timeouts (useful for testing).
    pub fn with_timeouts(mut self, upload: Duration, create: Duration) -> Self {
        self.upload_timeout = upload;
        self.create_timeout = create;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `bot_name` plus one `files` part per upload.
    fn upload_form(bot_name: &str, files: &[UploadFile]) -> Result<Form, BackendError> {
        let mut form = Form::new().text("bot_name", bot_name.to_string());
        for file in files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            if let Some(media_type) = &file.media_type {
                part = part.mime_str(media_type).map_err(|e| {
                    BackendError::Transport(format!("invalid media type '{media_type}': {e}"))
                })?;
            }
            form = form.part("files", part);
        }
        Ok(form)
    }

    /// Send a request and decode its JSON body.
    ///
    /// Non-2xx responses become [`BackendError::Status`]; bodies that don't
    /// decode become [`BackendError::Malformed`].
    async fn send<T: DeserializeOwned>(
        &self,
        path: &'static str,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<T, BackendError> {
        let request_id = Uuid::now_v7();
        let span = info_span!(
            "backend_call",
            backend.endpoint = path,
            backend.request_id = %request_id,
            backend.timeout_secs = timeout.as_secs_f64(),
        );

        async move {
            debug!("Sending backend request");

            let response = request
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            if !status.is_success() {
                warn!(status = status.as_u16(), "Backend returned an error status");
                return Err(BackendError::Status {
                    status: status.as_u16(),
                    body: truncate(body, MAX_ERROR_BODY),
                });
            }

            debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");
            serde_json::from_str(&body).map_err(|e| {
                BackendError::Malformed(format!("failed to parse response: {e}"))
            })
        }
        .instrument(span)
        .await
    }
}

// HttpBotBackend does not derive Debug: payloads passing through it carry
// bot tokens.

impl BotBackend for HttpBotBackend {
    async fn process_knowledge_base(
        &self,
        bot_name: &str,
        files: &[UploadFile],
    ) -> Result<KnowledgeBaseResponse, BackendError> {
        let form = Self::upload_form(bot_name, files)?;
        let request = self
            .client
            .post(self.url(endpoint::PROCESS_KNOWLEDGE_BASE))
            .multipart(form);
        self.send(endpoint::PROCESS_KNOWLEDGE_BASE, request, self.upload_timeout)
            .await
    }

    async fn process_voice_clone(
        &self,
        bot_name: &str,
        files: &[UploadFile],
    ) -> Result<VoiceCloneResponse, BackendError> {
        let form = Self::upload_form(bot_name, files)?;
        let request = self
            .client
            .post(self.url(endpoint::PROCESS_VOICE_CLONE))
            .multipart(form);
        self.send(endpoint::PROCESS_VOICE_CLONE, request, self.upload_timeout)
            .await
    }

    async fn create_bot(
        &self,
        payload: &CreateBotPayload,
    ) -> Result<CreateBotResponse, BackendError> {
        let request = self.client.post(self.url(endpoint::CREATE_BOT)).json(payload);
        self.send(endpoint::CREATE_BOT, request, self.create_timeout)
            .await
    }
}

fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        BackendError::Transport(err.to_string())
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use serde_json::{Value, json};

    /// What the mock backend saw on its last request.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Option<(HeaderMap, Bytes)>>>);

    impl Captured {
        fn take(&self) -> (HeaderMap, Bytes) {
            self.0.lock().unwrap().take().expect("no request captured")
        }
    }

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn backend_for(url: String) -> HttpBotBackend {
        HttpBotBackend::new(&BackendConfig {
            backend_url: Some(url),
            ..Default::default()
        })
        .unwrap()
    }

    fn replying(path: &'static str, status: StatusCode, body: &'static str) -> (Router, Captured) {
        let captured = Captured::default();
        let router = Router::new()
            .route(
                path,
                post(
                    move |State(captured): State<Captured>, headers: HeaderMap, bytes: Bytes| async move {
                        *captured.0.lock().unwrap() = Some((headers, bytes));
                        (
                            status,
                            [("content-type", "application/json")],
                            body,
                        )
                            .into_response()
                    },
                ),
            )
            .with_state(captured.clone());
        (router, captured)
    }

    fn payload() -> CreateBotPayload {
        CreateBotPayload {
            bot_token: "123456:ABC".to_string(),
            bot_name: "Rex".to_string(),
            bot_description: String::new(),
            start_message: "Woof!".to_string(),
            help_message: String::new(),
            system_prompt: "You are Rex.".to_string(),
            vector_store_id: None,
            voice_id: "v123".to_string(),
        }
    }

    #[test]
    fn new_requires_backend_url() {
        let result = HttpBotBackend::new(&BackendConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingBackendUrl)));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let backend = backend_for("http://localhost:8000/".to_string());
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(
            backend.url(endpoint::CREATE_BOT),
            "http://localhost:8000/create_bot"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short".to_string(), 10), "short");
        assert_eq!(truncate("ééé".to_string(), 3), "é...");
    }

    #[tokio::test]
    async fn voice_clone_sends_multipart_and_parses_id() {
        let (router, captured) = replying(
            endpoint::PROCESS_VOICE_CLONE,
            StatusCode::OK,
            r#"{"voice_id": "v123", "name": "Rex"}"#,
        );
        let backend = backend_for(spawn_backend(router).await);

        let files = vec![UploadFile::new("bark.mp3", b"ID3data".to_vec()).with_media_type("audio/mpeg")];
        let response = backend.process_voice_clone("Rex", &files).await.unwrap();
        assert_eq!(response.voice_id(), Some("v123"));
        assert_eq!(response.extra.get("name"), Some(&json!("Rex")));

        let (headers, body) = captured.take();
        let content_type = headers["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        assert!(headers.contains_key(REQUEST_ID_HEADER));

        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("name=\"bot_name\""));
        assert!(body.contains("Rex"));
        assert!(body.contains("name=\"files\"; filename=\"bark.mp3\""));
        assert!(body.contains("audio/mpeg"));
        assert!(body.contains("ID3data"));
    }

    #[tokio::test]
    async fn knowledge_base_sends_every_file() {
        let (router, captured) = replying(
            endpoint::PROCESS_KNOWLEDGE_BASE,
            StatusCode::OK,
            r#"{"vector_store_id": "vs_1"}"#,
        );
        let backend = backend_for(spawn_backend(router).await);

        let files = vec![
            UploadFile::new("faq.md", b"# FAQ".to_vec()),
            UploadFile::new("menu.pdf", b"%PDF".to_vec()),
        ];
        let response = backend.process_knowledge_base("Rex", &files).await.unwrap();
        assert_eq!(response.vector_store_id(), Some("vs_1"));

        let (_, body) = captured.take();
        let body = String::from_utf8_lossy(&body);
        assert_eq!(body.matches("name=\"files\"").count(), 2);
        assert!(body.contains("filename=\"faq.md\""));
        assert!(body.contains("filename=\"menu.pdf\""));
    }

    #[tokio::test]
    async fn create_bot_posts_json_payload() {
        let (router, captured) = replying(
            endpoint::CREATE_BOT,
            StatusCode::OK,
            r#"{"success": true, "warning": "webhook failed"}"#,
        );
        let backend = backend_for(spawn_backend(router).await);

        let response = backend.create_bot(&payload()).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.warning_message().as_deref(), Some("webhook failed"));

        let (headers, body) = captured.take();
        assert_eq!(headers["content-type"], "application/json");
        let sent: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(sent["bot_name"], "Rex");
        assert_eq!(sent["bot_token"], "123456:ABC");
        assert_eq!(sent["voice_id"], "v123");
        assert_eq!(sent["vector_store_id"], Value::Null);
    }

    #[tokio::test]
    async fn error_status_maps_to_status_error() {
        let (router, _) = replying(
            endpoint::CREATE_BOT,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "boom"}"#,
        );
        let backend = backend_for(spawn_backend(router).await);

        let err = backend.create_bot(&payload()).await.unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (router, _) = replying(endpoint::PROCESS_VOICE_CLONE, StatusCode::OK, "<html>");
        let backend = backend_for(spawn_backend(router).await);

        let err = backend
            .process_voice_clone("Rex", &[UploadFile::new("a.mp3", vec![1])])
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn slow_backend_maps_to_timeout() {
        let router = Router::new().route(
            endpoint::CREATE_BOT,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                axum::Json(json!({"success": true}))
            }),
        );
        let backend = backend_for(spawn_backend(router).await)
            .with_timeouts(Duration::from_millis(100), Duration::from_millis(100));

        let err = backend.create_bot(&payload()).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = backend_for(format!("http://{addr}"));
        let err = backend.create_bot(&payload()).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
