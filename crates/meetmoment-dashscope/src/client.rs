// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DashScope chat and image-synthesis APIs.
//!
//! Provides [`DashScopeClient`] which handles request construction,
//! bearer authentication, per-request timeouts, and failure classification.
//! Requests are sent exactly once; retry policy belongs to the caller.

use std::time::Duration;

use meetmoment_config::model::DashScopeConfig;
use meetmoment_core::GenerationError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ImageSynthesisRequest,
    TaskResponse,
};

/// Timeout for image task creation and status queries.
const TASK_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Header that switches image synthesis into task mode.
const ASYNC_HEADER: &str = "X-DashScope-Async";

/// HTTP client for DashScope API communication.
#[derive(Debug, Clone)]
pub struct DashScopeClient {
    client: reqwest::Client,
    api_key: SecretString,
    chat_url: String,
    image_url: String,
    task_url: String,
}

impl DashScopeClient {
    /// Creates a client for the endpoints named in `config`.
    pub fn new(api_key: SecretString, config: &DashScopeConfig) -> Result<Self, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GenerationError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            chat_url: config.chat_url.clone(),
            image_url: config.image_url.clone(),
            task_url: config.task_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends one chat completion request, abandoning it after `timeout`.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        let builder = self
            .client
            .post(&self.chat_url)
            .bearer_auth(self.api_key.expose_secret())
            .timeout(timeout)
            .json(request);
        self.send_json(builder, "chat completion").await
    }

    /// Submits an image synthesis task in asynchronous mode.
    pub async fn create_image_task(
        &self,
        request: &ImageSynthesisRequest,
    ) -> Result<TaskResponse, GenerationError> {
        let builder = self
            .client
            .post(&self.image_url)
            .bearer_auth(self.api_key.expose_secret())
            .header(ASYNC_HEADER, "enable")
            .timeout(TASK_REQUEST_TIMEOUT)
            .json(request);
        self.send_json(builder, "image task creation").await
    }

    /// Fetches the current state of a task.
    pub async fn query_task(&self, task_id: &str) -> Result<TaskResponse, GenerationError> {
        if task_id.is_empty() || task_id.contains(['/', '?', '#']) {
            return Err(GenerationError::validation(format!(
                "invalid task id `{task_id}`"
            )));
        }
        let builder = self
            .client
            .get(format!("{}/{task_id}", self.task_url))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(TASK_REQUEST_TIMEOUT);
        self.send_json(builder, "task query").await
    }

    /// Sends `builder` and decodes a successful body as `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, GenerationError> {
        let response = builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("{operation} timed out")
            } else {
                format!("{operation} request failed: {e}")
            };
            GenerationError::Transport {
                message,
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        debug!(status = %status, operation, "response received");

        let body = response.text().await.map_err(|e| GenerationError::Transport {
            message: format!("failed to read {operation} response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            warn!(status = %status, operation, "upstream returned error status");
            return Err(upstream_error(status, body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed(format!("failed to parse {operation} response: {e}")))
    }
}

/// Builds an [`GenerationError::UpstreamStatus`], condensing structured
/// error bodies to `code: message`.
fn upstream_error(status: StatusCode, body: String) -> GenerationError {
    let body = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(ApiErrorResponse {
            code: Some(code),
            message,
        }) => format!("{code}: {}", message.unwrap_or_default()),
        _ => body,
    };
    GenerationError::UpstreamStatus {
        status: status.as_u16(),
        body,
    }
}
