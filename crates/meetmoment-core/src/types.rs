// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request, result, and task types shared by the generation engine.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;

/// The four generation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    TagExtraction,
    Conversation,
    ProfileAnalysis,
    ImageGeneration,
}

/// Interest-tag extraction input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    /// Caller identity, used for logging only.
    pub subject: String,
    pub content: String,
}

/// Persona conversation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub subject: String,
    pub message: String,
    /// Raw persona tag; unknown values resolve to the default persona.
    #[serde(default)]
    pub persona: Option<String>,
    /// Free-form context rendered into the system prompt, ordered by key.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

/// The profile fields inspected by profile analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Profile analysis input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileAnalysisRequest {
    pub subject: String,
    pub profile: ProfileFields,
}

/// Image generation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub subject: String,
    pub prompt: String,
}

/// A generation request, discriminated by operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    TagExtraction(TagRequest),
    Conversation(ConversationRequest),
    ProfileAnalysis(ProfileAnalysisRequest),
    ImageGeneration(ImageRequest),
}

impl GenerationRequest {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::TagExtraction(_) => GenerationKind::TagExtraction,
            GenerationRequest::Conversation(_) => GenerationKind::Conversation,
            GenerationRequest::ProfileAnalysis(_) => GenerationKind::ProfileAnalysis,
            GenerationRequest::ImageGeneration(_) => GenerationKind::ImageGeneration,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            GenerationRequest::TagExtraction(r) => &r.subject,
            GenerationRequest::Conversation(r) => &r.subject,
            GenerationRequest::ProfileAnalysis(r) => &r.subject,
            GenerationRequest::ImageGeneration(r) => &r.subject,
        }
    }
}

/// Extracted interest tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagResult {
    pub tags: Vec<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// A conversational reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResult {
    pub text: String,
    pub source_model: String,
    pub elapsed: Duration,
    pub approx_tokens: u32,
}

/// Profile quality breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileScore {
    /// Overall score in `[0, 100]`.
    pub overall: u8,
    /// Completeness in `[0, 100]`.
    pub completeness: f64,
    /// Attractiveness in `[0, 100]`.
    pub attractiveness: f64,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub keywords: Vec<String>,
}

/// A finished image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
}

/// The result of a generation call, tagged by operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    Tags(TagResult),
    Conversation(ConversationResult),
    Profile(ProfileScore),
    Image(ImageResult),
}

/// Token accounting reported by the remote model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// The first choice of a chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub text: String,
    pub model: String,
    /// `None` when the upstream omitted usage numbers.
    pub usage: Option<TokenUsage>,
}

/// Remote image task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl TaskStatus {
    /// Maps an upstream status string; unrecognized values become `Unknown`.
    ///
    /// A task cancelled upstream can never produce an image, so `CANCELED`
    /// counts as `Failed`. `SUSPENDED` may resume and stays `Unknown`.
    pub fn from_upstream(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "SUCCEEDED" => TaskStatus::Succeeded,
            "FAILED" | "CANCELED" | "CANCELLED" => TaskStatus::Failed,
            _ => TaskStatus::Unknown,
        }
    }

    /// Polling stops at terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// A snapshot of a remote image generation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTask {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub result_url: Option<String>,
    /// Upstream failure detail, when the task failed.
    #[serde(default)]
    pub message: Option<String>,
}

/// Everything the synthesis endpoint needs to create one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTaskSpec {
    pub prompt: String,
    pub negative_prompt: String,
    /// `"<width>*<height>"`.
    pub size: String,
    pub count: u32,
    pub seed: Option<u32>,
    pub prompt_extend: bool,
    pub watermark: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_maps_upstream_strings() {
        assert_eq!(TaskStatus::from_upstream("PENDING"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_upstream("running"), TaskStatus::Running);
        assert_eq!(TaskStatus::from_upstream("SUCCEEDED"), TaskStatus::Succeeded);
        assert_eq!(TaskStatus::from_upstream("FAILED"), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_upstream("UNKNOWN"), TaskStatus::Unknown);
        assert_eq!(TaskStatus::from_upstream("CANCELED"), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_upstream("SUSPENDED"), TaskStatus::Unknown);
    }

    #[test]
    fn only_succeeded_and_failed_are_terminal() {
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(!TaskStatus::Unknown.is_terminal());
    }

    #[test]
    fn generation_request_is_tagged_by_kind() {
        let json = r#"{"kind":"conversation","subject":"42","message":"你好","persona":"温柔"}"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind(), GenerationKind::Conversation);
        assert_eq!(req.subject(), "42");
        let GenerationRequest::Conversation(conv) = req else {
            panic!("expected conversation");
        };
        assert!(conv.context.is_empty());
    }

    #[test]
    fn generation_kind_display() {
        assert_eq!(GenerationKind::TagExtraction.to_string(), "tag_extraction");
        assert_eq!(GenerationKind::ImageGeneration.to_string(), "image_generation");
    }
}
