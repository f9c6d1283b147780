// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat model for deterministic testing.
//!
//! `MockChatModel` implements `ChatModel` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use meetmoment_core::GenerationError;
use meetmoment_core::traits::ChatModel;
use meetmoment_core::types::{ParsedReply, TokenUsage};

const MOCK_MODEL: &str = "mock-model";

type ErrorFactory = Arc<dyn Fn() -> GenerationError + Send + Sync>;

/// One prompt pair the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system_prompt: Option<String>,
    pub user_payload: String,
}

/// A mock chat model that replays scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned, unless the model was built
/// with [`MockChatModel::failing`], in which case every call fails.
pub struct MockChatModel {
    replies: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    call_count: AtomicUsize,
    latency: Option<Duration>,
    always_fail: Option<ErrorFactory>,
}

impl MockChatModel {
    /// Create a mock with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: AtomicUsize::new(0),
            latency: None,
            always_fail: None,
        }
    }

    /// Create a mock pre-loaded with successful replies.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        let queue = replies.into_iter().map(|s| Ok(s.into())).collect();
        Self {
            replies: Arc::new(Mutex::new(queue)),
            ..mock
        }
    }

    /// Create a mock whose every call fails with an error from `make_error`.
    pub fn failing(make_error: impl Fn() -> GenerationError + Send + Sync + 'static) -> Self {
        Self {
            always_fail: Some(Arc::new(make_error)),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails as an unreachable host would.
    pub fn unreachable() -> Self {
        Self::failing(|| GenerationError::transport("connection refused"))
    }

    /// Delay every reply by `latency`. A latency beyond the caller's
    /// timeout yields a transport failure once the timeout elapses.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: GenerationError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every prompt pair received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn next_reply(&self) -> Result<String, GenerationError> {
        if let Some(make_error) = &self.always_fail {
            return Err(make_error());
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model_name(&self) -> &str {
        MOCK_MODEL
    }

    async fn call(
        &self,
        system_prompt: Option<&str>,
        user_payload: &str,
        timeout: Duration,
    ) -> Result<ParsedReply, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(RecordedCall {
            system_prompt: system_prompt.map(str::to_string),
            user_payload: user_payload.to_string(),
        });

        if let Some(latency) = self.latency {
            if latency > timeout {
                tokio::time::sleep(timeout).await;
                return Err(GenerationError::transport("request timed out"));
            }
            tokio::time::sleep(latency).await;
        }

        let text = self.next_reply().await?;
        let output_tokens = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        Ok(ParsedReply {
            text,
            model: MOCK_MODEL.to_string(),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens,
                total_tokens: 10 + output_tokens,
            }),
        })
    }
}
