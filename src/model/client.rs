//! Generative-model client seam: one trait, one HTTP implementation, and a
//! scriptable mock for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{GenerateContentRequest, GenerateContentResponse, ModelRequest};
use super::ProviderError;
use crate::config::{AppConfig, ModelSpec};

/// Anything that can run one generation request against a named model.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        model: &ModelSpec,
        request: &ModelRequest,
    ) -> Result<String, ProviderError>;
}

/// HTTP client for the Gemini generateContent endpoint.
///
/// No request-level timeout is configured here; the invocation state machine
/// races every attempt against its own wall-clock ceiling.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(
        &self,
        model: &ModelSpec,
        request: &ModelRequest,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, model.id
        );
        let body = GenerateContentRequest::build(request, &model.params);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Transport(format!("request timeout: {e}"))
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("response decode: {e}")))?;

        Ok(parsed.flattened_text())
    }
}

/// Mock client for testing: plays back a scripted sequence of outcomes and
/// counts calls.
pub struct MockModelClient {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append the next scripted outcome.
    pub fn then(self, outcome: Result<String, ProviderError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn then_ok(self, text: &str) -> Self {
        self.then(Ok(text.to_string()))
    }

    pub fn then_status(self, status: u16, body: &str) -> Self {
        self.then(Err(ProviderError::Status {
            status,
            body: body.to_string(),
        }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeClient for MockModelClient {
    async fn generate(
        &self,
        _model: &ModelSpec,
        _request: &ModelRequest,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("mock script exhausted".into())))
    }
}
