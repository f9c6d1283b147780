// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DashScope adapter for the MeetMoment generation engine.
//!
//! This crate implements [`ChatModel`] over the OpenAI-compatible chat
//! completion endpoint and [`ImageSynthesis`] over the asynchronous
//! text-to-image task API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use meetmoment_config::model::DashScopeConfig;
use meetmoment_core::error::GenerationError;
use meetmoment_core::traits::{ChatModel, ImageSynthesis};
use meetmoment_core::types::{ImageTask, ImageTaskSpec, ParsedReply, TaskStatus, TokenUsage};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::DashScopeClient;
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageInput, ImageParameters,
    ImageSynthesisRequest, TaskResponse,
};

/// DashScope provider implementing both [`ChatModel`] and [`ImageSynthesis`].
///
/// API key resolution order: config -> `DASHSCOPE_API_KEY` env var. A missing
/// key yields [`GenerationError::Unavailable`] so callers can run without
/// remote generation.
pub struct DashScopeProvider {
    client: DashScopeClient,
    chat_model: String,
    image_model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl DashScopeProvider {
    /// Creates a provider from the `[dashscope]` configuration section.
    pub fn from_config(config: &DashScopeConfig) -> Result<Self, GenerationError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GenerationError::Unavailable(
                "no DashScope API key configured; set dashscope.api_key or DASHSCOPE_API_KEY"
                    .to_string(),
            )
        })?;
        let client = DashScopeClient::new(SecretString::from(api_key), config)?;

        info!(
            chat_model = %config.chat_model,
            image_model = %config.image_model,
            "DashScope provider initialized"
        );

        Ok(Self {
            client,
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        })
    }

    fn to_chat_request(&self, system_prompt: Option<&str>, user_payload: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user_payload));

        ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }

    fn to_image_request(&self, spec: &ImageTaskSpec) -> ImageSynthesisRequest {
        ImageSynthesisRequest {
            model: self.image_model.clone(),
            input: ImageInput {
                prompt: spec.prompt.clone(),
                negative_prompt: spec.negative_prompt.clone(),
            },
            parameters: ImageParameters {
                size: spec.size.clone(),
                n: spec.count,
                seed: spec.seed,
                prompt_extend: spec.prompt_extend,
                watermark: spec.watermark,
            },
        }
    }
}

/// Extracts the first choice's text; an empty choice list is malformed.
fn parse_chat_response(
    response: ChatCompletionResponse,
    requested_model: &str,
) -> Result<ParsedReply, GenerationError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::malformed("reply contained no choices"))?
        .message
        .content
        .ok_or_else(|| GenerationError::malformed("first choice has no content"))?;

    let usage = response.usage.map(|u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
        total_tokens: if u.total_tokens > 0 {
            u.total_tokens
        } else {
            u.prompt_tokens.saturating_add(u.completion_tokens)
        },
    });

    Ok(ParsedReply {
        text,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage,
    })
}

/// Maps a task response onto the engine's task state.
fn to_image_task(fallback_id: &str, response: TaskResponse) -> ImageTask {
    let output = response.output;
    let status = TaskStatus::from_upstream(&output.task_status);
    let message = match (output.code, output.message) {
        (Some(code), Some(message)) => Some(format!("{code}: {message}")),
        (code, message) => message.or(code),
    }
    // Keeps the upstream wording for states folded into `Failed` (CANCELED).
    .or_else(|| {
        (status == TaskStatus::Failed).then(|| format!("task reported {}", output.task_status))
    });
    ImageTask {
        task_id: output.task_id.unwrap_or_else(|| fallback_id.to_string()),
        status,
        result_url: output.results.into_iter().find_map(|r| r.url),
        message,
    }
}

#[async_trait]
impl ChatModel for DashScopeProvider {
    fn model_name(&self) -> &str {
        &self.chat_model
    }

    async fn call(
        &self,
        system_prompt: Option<&str>,
        user_payload: &str,
        timeout: Duration,
    ) -> Result<ParsedReply, GenerationError> {
        let request = self.to_chat_request(system_prompt, user_payload);
        let response = self.client.chat_completion(&request, timeout).await?;
        let reply = parse_chat_response(response, &self.chat_model)?;
        debug!(
            model = %reply.model,
            chars = reply.text.chars().count(),
            "chat completion parsed"
        );
        Ok(reply)
    }
}

#[async_trait]
impl ImageSynthesis for DashScopeProvider {
    async fn create_task(&self, spec: &ImageTaskSpec) -> Result<String, GenerationError> {
        let request = self.to_image_request(spec);
        let response = self.client.create_image_task(&request).await?;
        match response.output.task_id {
            Some(task_id) if !task_id.is_empty() => {
                debug!(task_id = %task_id, status = %response.output.task_status, "image task created");
                Ok(task_id)
            }
            _ => Err(GenerationError::malformed(
                "task creation reply carried no task id",
            )),
        }
    }

    async fn query_task(&self, task_id: &str) -> Result<ImageTask, GenerationError> {
        let response = self.client.query_task(task_id).await?;
        Ok(to_image_task(task_id, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetmoment_core::FailureKind;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> DashScopeConfig {
        DashScopeConfig {
            api_key: Some("test-api-key".into()),
            chat_url: format!("{base_url}/chat/completions"),
            image_url: format!("{base_url}/image-synthesis"),
            task_url: format!("{base_url}/tasks"),
            ..DashScopeConfig::default()
        }
    }

    fn spec() -> ImageTaskSpec {
        ImageTaskSpec {
            prompt: "a lighthouse at dusk".into(),
            negative_prompt: "blurry".into(),
            size: "1024*1024".into(),
            count: 1,
            seed: Some(7),
            prompt_extend: true,
            watermark: false,
        }
    }

    #[test]
    fn chat_request_puts_system_prompt_first() {
        let provider = DashScopeProvider::from_config(&test_config("http://localhost")).unwrap();
        let req = provider.to_chat_request(Some("你是助手"), "你好");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0], ChatMessage::system("你是助手"));
        assert_eq!(req.messages[1], ChatMessage::user("你好"));
        assert_eq!(req.model, "qwen-plus");
        assert_eq!(req.max_tokens, 1000);

        let req = provider.to_chat_request(None, "hi");
        assert_eq!(req.messages, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn empty_choices_are_malformed() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = parse_chat_response(response, "qwen-plus").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedReply);
    }

    #[test]
    fn missing_model_falls_back_to_requested() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "ok"}}], "usage": {"prompt_tokens": 2, "completion_tokens": 1}}"#,
        )
        .unwrap();
        let reply = parse_chat_response(response, "qwen-plus").unwrap();
        assert_eq!(reply.model, "qwen-plus");
        assert_eq!(reply.text, "ok");
        assert_eq!(reply.usage.map(|u| u.total_tokens), Some(3));
    }

    #[test]
    fn oversized_usage_counts_saturate() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"好的"}}],
                "usage":{"prompt_tokens":4294967295,"completion_tokens":1,"total_tokens":0}}"#,
        )
        .unwrap();
        let reply = parse_chat_response(response, "qwen-plus").unwrap();
        let usage = reply.usage.unwrap();
        assert_eq!(usage.input_tokens, u32::MAX);
        assert_eq!(usage.total_tokens, u32::MAX);
    }

    #[test]
    fn failed_task_message_joins_code() {
        let response: TaskResponse = serde_json::from_str(
            r#"{"output": {"task_status": "FAILED", "code": "InternalError", "message": "boom"}}"#,
        )
        .unwrap();
        let task = to_image_task("t-9", response);
        assert_eq!(task.task_id, "t-9");
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.message.as_deref(), Some("InternalError: boom"));
        assert!(task.result_url.is_none());
    }

    #[test]
    fn canceled_task_is_failed() {
        let response: TaskResponse =
            serde_json::from_str(r#"{"output": {"task_id": "t-3", "task_status": "CANCELED"}}"#)
                .unwrap();
        let task = to_image_task("t-3", response);
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.message.as_deref(), Some("task reported CANCELED"));
    }

    #[tokio::test]
    async fn call_returns_parsed_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "qwen-plus",
                "messages": [{"role": "system", "content": "sys"}, {"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen-plus-2025-01-25",
                "choices": [{"message": {"content": "你好！"}}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = DashScopeProvider::from_config(&test_config(&server.uri())).unwrap();
        let reply = provider
            .call(Some("sys"), "hello", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(reply.text, "你好！");
        assert_eq!(reply.model, "qwen-plus-2025-01-25");
        assert_eq!(reply.usage.map(|u| u.total_tokens), Some(7));
    }

    #[tokio::test]
    async fn create_task_sends_spec_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/image-synthesis"))
            .and(body_partial_json(serde_json::json!({
                "model": "wanx2.1-t2i-turbo",
                "input": {"prompt": "a lighthouse at dusk", "negative_prompt": "blurry"},
                "parameters": {"size": "1024*1024", "n": 1, "seed": 7, "prompt_extend": true, "watermark": false}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "request_id": "r",
                "output": {"task_id": "task-1", "task_status": "PENDING"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = DashScopeProvider::from_config(&test_config(&server.uri())).unwrap();
        let task_id = provider.create_task(&spec()).await.unwrap();
        assert_eq!(task_id, "task-1");
    }

    #[tokio::test]
    async fn create_task_without_id_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/image-synthesis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {"task_status": "PENDING"}
            })))
            .mount(&server)
            .await;

        let provider = DashScopeProvider::from_config(&test_config(&server.uri())).unwrap();
        let err = provider.create_task(&spec()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedReply);
    }

    #[tokio::test]
    async fn query_task_maps_succeeded_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": {
                    "task_id": "task-1",
                    "task_status": "SUCCEEDED",
                    "results": [{"url": "https://img.example/1.png", "actual_prompt": "extended"}]
                }
            })))
            .mount(&server)
            .await;

        let provider = DashScopeProvider::from_config(&test_config(&server.uri())).unwrap();
        let task = provider.query_task("task-1").await.unwrap();
        assert_eq!(task.status, TaskStatus::Succeeded);
        assert_eq!(task.result_url.as_deref(), Some("https://img.example/1.png"));
    }
}
