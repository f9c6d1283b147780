// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fail-soft orchestration of the text generation operations.
//!
//! Tag extraction, conversation, and profile analysis try the remote model
//! first and fall back to the heuristic generator on any failure. None of
//! them return an error. Image generation is delegated to the
//! [`ImageTaskCoordinator`] and does return errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use meetmoment_config::model::{GenerationConfig, MeetmomentConfig};
use meetmoment_core::persona::Persona;
use meetmoment_core::traits::{ChatModel, ImageSynthesis};
use meetmoment_core::types::{
    ConversationRequest, ConversationResult, GenerationKind, GenerationRequest, GenerationResult,
    ImageResult, ImageTask, ParsedReply, ProfileAnalysisRequest, ProfileScore, TagRequest,
    TagResult,
};
use meetmoment_core::GenerationError;
use meetmoment_dashscope::DashScopeProvider;
use meetmoment_heuristic::{
    FALLBACK_MODEL, analyze_profile, conversational_reply, extract_tags, tag_confidence,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::image::ImageTaskCoordinator;
use crate::prompts::{PROFILE_ANALYST_PROMPT, conversation_system_prompt, profile_prompt, tag_prompt};
use crate::validation::{REMOTE_TAG_CONFIDENCE, parse_profile_reply, parse_tag_reply};

/// Which generator produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Remote,
    Heuristic,
}

/// A result tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    pub value: T,
    pub source: ContentSource,
}

impl<T> Generated<T> {
    pub fn remote(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Remote,
        }
    }

    pub fn heuristic(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Heuristic,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// The prompt pair sent to the remote model for one call.
struct RemotePrompt {
    system: Option<String>,
    payload: String,
}

/// Entry point for all four generation operations.
pub struct GenerationEngine {
    chat: Option<Arc<dyn ChatModel>>,
    images: ImageTaskCoordinator,
    chat_timeout: Duration,
    max_tags: usize,
}

impl GenerationEngine {
    /// `chat` is `None` when no remote model is configured; text operations
    /// then always take the heuristic path.
    pub fn new(
        chat: Option<Arc<dyn ChatModel>>,
        images: ImageTaskCoordinator,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            chat,
            images,
            chat_timeout: config.chat_timeout(),
            max_tags: config.max_tags,
        }
    }

    /// Builds an engine backed by DashScope. A missing credential is not an
    /// error: the engine runs heuristic-only and image calls report
    /// [`GenerationError::Unavailable`].
    pub fn from_config(config: &MeetmomentConfig) -> Result<Self, GenerationError> {
        let (chat, images): (Option<Arc<dyn ChatModel>>, Option<Arc<dyn ImageSynthesis>>) =
            match DashScopeProvider::from_config(&config.dashscope) {
                Ok(provider) => {
                    let provider = Arc::new(provider);
                    let chat: Arc<dyn ChatModel> = provider.clone();
                    let images: Arc<dyn ImageSynthesis> = provider;
                    (Some(chat), Some(images))
                }
                Err(GenerationError::Unavailable(reason)) => {
                    warn!(reason = %reason, "remote generation disabled, using heuristics only");
                    (None, None)
                }
                Err(e) => return Err(e),
            };

        Ok(Self::new(
            chat,
            ImageTaskCoordinator::new(images, config.image.clone()),
            &config.generation,
        ))
    }

    /// The image task coordinator, for callers that drive tasks directly.
    pub fn images(&self) -> &ImageTaskCoordinator {
        &self.images
    }

    /// Attempts the remote model, else runs `heuristic`.
    ///
    /// `accept` turns a reply into a result or rejects it; it may itself
    /// return a heuristic result derived from the reply.
    #[allow(clippy::too_many_arguments)]
    async fn with_fallback<T, R>(
        &self,
        operation: GenerationKind,
        subject: &str,
        prompt: RemotePrompt,
        cancel: &CancellationToken,
        rng: &mut R,
        accept: impl FnOnce(ParsedReply, Duration, &mut R) -> Result<Generated<T>, GenerationError>,
        heuristic: impl FnOnce(&mut R) -> T,
    ) -> Generated<T>
    where
        R: Rng + Send + ?Sized,
    {
        let Some(chat) = &self.chat else {
            debug!(subject, operation = %operation, "no remote model configured");
            return Generated::heuristic(heuristic(rng));
        };

        let started = Instant::now();
        let attempt = tokio::select! {
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
            reply = chat.call(prompt.system.as_deref(), &prompt.payload, self.chat_timeout) => reply,
        };
        let elapsed = started.elapsed();

        match attempt.and_then(|reply| accept(reply, elapsed, rng)) {
            Ok(generated) => {
                info!(
                    subject,
                    operation = %operation,
                    model = chat.model_name(),
                    source = %generated.source,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "generation completed"
                );
                generated
            }
            Err(e) => {
                warn!(
                    subject,
                    operation = %operation,
                    failure = %e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "remote generation failed, using heuristic"
                );
                Generated::heuristic(heuristic(rng))
            }
        }
    }

    /// Extracts interest tags from free text. Never fails.
    pub async fn tags(&self, request: &TagRequest, cancel: &CancellationToken) -> Generated<TagResult> {
        self.tags_with_rng(request, cancel, &mut StdRng::from_entropy())
            .await
    }

    pub async fn tags_with_rng<R>(
        &self,
        request: &TagRequest,
        cancel: &CancellationToken,
        rng: &mut R,
    ) -> Generated<TagResult>
    where
        R: Rng + Send + ?Sized,
    {
        let max_tags = self.max_tags;
        let prompt = RemotePrompt {
            system: None,
            payload: tag_prompt(&request.content),
        };
        self.with_fallback(
            GenerationKind::TagExtraction,
            &request.subject,
            prompt,
            cancel,
            rng,
            |reply, _, rng| match parse_tag_reply(&reply.text, max_tags) {
                Ok(tags) => Ok(Generated::remote(TagResult {
                    tags,
                    confidence: REMOTE_TAG_CONFIDENCE,
                })),
                Err(e) => {
                    debug!(error = %e, "tag reply rejected, extracting from reply text");
                    let tags = extract_tags(&reply.text);
                    let confidence = tag_confidence(&reply.text, &tags, rng);
                    Ok(Generated::heuristic(TagResult { tags, confidence }))
                }
            },
            |rng| {
                let tags = extract_tags(&request.content);
                let confidence = tag_confidence(&request.content, &tags, rng);
                TagResult { tags, confidence }
            },
        )
        .await
    }

    /// Replies in the requested persona's voice. Never fails.
    pub async fn conversation(
        &self,
        request: &ConversationRequest,
        cancel: &CancellationToken,
    ) -> Generated<ConversationResult> {
        self.conversation_with_rng(request, cancel, &mut StdRng::from_entropy())
            .await
    }

    pub async fn conversation_with_rng<R>(
        &self,
        request: &ConversationRequest,
        cancel: &CancellationToken,
        rng: &mut R,
    ) -> Generated<ConversationResult>
    where
        R: Rng + Send + ?Sized,
    {
        let started = Instant::now();
        let persona = Persona::from_tag(request.persona.as_deref());
        let prompt = RemotePrompt {
            system: Some(conversation_system_prompt(persona, &request.context)),
            payload: request.message.clone(),
        };
        self.with_fallback(
            GenerationKind::Conversation,
            &request.subject,
            prompt,
            cancel,
            rng,
            |reply, elapsed, _| {
                if reply.text.trim().is_empty() {
                    return Err(GenerationError::validation("empty conversation reply"));
                }
                let approx_tokens = reply
                    .usage
                    .map(|u| u.total_tokens)
                    .unwrap_or_else(|| estimate_tokens(&reply.text));
                Ok(Generated::remote(ConversationResult {
                    text: reply.text,
                    source_model: reply.model,
                    elapsed,
                    approx_tokens,
                }))
            },
            |rng| {
                let text = conversational_reply(&request.message, persona, rng);
                let approx_tokens = estimate_tokens(&text);
                ConversationResult {
                    text,
                    source_model: FALLBACK_MODEL.to_string(),
                    elapsed: started.elapsed(),
                    approx_tokens,
                }
            },
        )
        .await
    }

    /// Scores a profile and suggests improvements. Never fails.
    pub async fn analyze_profile(
        &self,
        request: &ProfileAnalysisRequest,
        cancel: &CancellationToken,
    ) -> Generated<ProfileScore> {
        let prompt = RemotePrompt {
            system: Some(PROFILE_ANALYST_PROMPT.to_string()),
            payload: profile_prompt(&request.profile),
        };
        // Profile scoring is deterministic; the random source is unused.
        self.with_fallback(
            GenerationKind::ProfileAnalysis,
            &request.subject,
            prompt,
            cancel,
            &mut StdRng::seed_from_u64(0),
            |reply, _, _| parse_profile_reply(&reply.text).map(Generated::remote),
            |_| analyze_profile(&request.profile),
        )
        .await
    }

    /// Generates an image and waits for it within the configured budget.
    pub async fn generate_image(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResult, GenerationError> {
        self.images.generate_and_wait(prompt, None, cancel).await
    }

    /// Generates a portrait from a short description.
    pub async fn generate_portrait(
        &self,
        description: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResult, GenerationError> {
        self.images.generate_portrait(description, cancel).await
    }

    /// Creates an image task without waiting for it.
    pub async fn create_image_task(&self, prompt: &str) -> Result<String, GenerationError> {
        self.images.create_task(prompt).await
    }

    /// Reports the current state of an image task.
    pub async fn query_task(&self, task_id: &str) -> Result<ImageTask, GenerationError> {
        self.images.poll_once(task_id).await
    }

    /// Routes a tagged request to its operation. Only image generation can
    /// return an error.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Generated<GenerationResult>, GenerationError> {
        match request {
            GenerationRequest::TagExtraction(r) => {
                Ok(self.tags(r, cancel).await.map(GenerationResult::Tags))
            }
            GenerationRequest::Conversation(r) => Ok(self
                .conversation(r, cancel)
                .await
                .map(GenerationResult::Conversation)),
            GenerationRequest::ProfileAnalysis(r) => Ok(self
                .analyze_profile(r, cancel)
                .await
                .map(GenerationResult::Profile)),
            GenerationRequest::ImageGeneration(r) => {
                let result = self.generate_image(&r.prompt, cancel).await.inspect_err(|e| {
                    warn!(
                    subject = request.subject(),
                    operation = %request.kind(),
                    failure = %e.kind(),
                    error = %e,
                    "image generation failed"
                );
                })?;
                Ok(Generated::remote(GenerationResult::Image(result)))
            }
        }
    }
}

/// Rough token count for replies without usage numbers.
fn estimate_tokens(text: &str) -> u32 {
    u32::try_from(text.chars().count().div_ceil(4)).unwrap_or(u32::MAX)
}
