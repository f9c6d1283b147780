// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completion model trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::ParsedReply;

/// A remote chat-completion model.
///
/// Implementations send one request per call and never retry. Failures are
/// classified as [`GenerationError::Transport`],
/// [`GenerationError::UpstreamStatus`], or [`GenerationError::MalformedReply`].
#[async_trait]
pub trait ChatModel: Send + Sync + 'static {
    /// Human-readable name of the backing model.
    fn model_name(&self) -> &str;

    /// Sends an optional system prompt followed by the user payload.
    ///
    /// The request is abandoned with a transport failure after `timeout`.
    async fn call(
        &self,
        system_prompt: Option<&str>,
        user_payload: &str,
        timeout: Duration,
    ) -> Result<ParsedReply, GenerationError>;
}
