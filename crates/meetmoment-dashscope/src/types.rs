// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DashScope wire types for chat completion and image synthesis.

use serde::{Deserialize, Serialize};

// --- Chat completion (OpenAI-compatible mode) ---

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

/// One message in the conversation; `role` is `system` or `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat completion response. Only the fields the engine reads are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting. Compatible mode uses the OpenAI names; the native
/// API uses `input_tokens` / `output_tokens`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default, alias = "input_tokens")]
    pub prompt_tokens: u32,
    #[serde(default, alias = "output_tokens")]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

// --- Image synthesis ---

/// Text-to-image task creation request.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSynthesisRequest {
    pub model: String,
    pub input: ImageInput,
    pub parameters: ImageParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub negative_prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageParameters {
    pub size: String,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    pub prompt_extend: bool,
    pub watermark: bool,
}

/// Response to both task creation and task queries.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    pub output: TaskOutput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub task_id: Option<String>,
    pub task_status: String,
    #[serde(default)]
    pub results: Vec<TaskResultItem>,
    /// Failure code, present on failed tasks.
    #[serde(default)]
    pub code: Option<String>,
    /// Failure detail, present on failed tasks.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskResultItem {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub actual_prompt: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
