// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous image task coordination.
//!
//! Image generation has no local fallback: every failure, including a
//! missing credential, is returned to the caller as a distinct error.

use std::sync::Arc;
use std::time::Duration;

use meetmoment_config::model::ImageConfig;
use meetmoment_core::GenerationError;
use meetmoment_core::traits::ImageSynthesis;
use meetmoment_core::types::{ImageResult, ImageTask, ImageTaskSpec, TaskStatus};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompts::{NEGATIVE_PROMPT, portrait_prompt};

/// Creates image tasks and polls them to a terminal state.
pub struct ImageTaskCoordinator {
    service: Option<Arc<dyn ImageSynthesis>>,
    config: ImageConfig,
}

impl ImageTaskCoordinator {
    /// `service` is `None` when no credential is configured; every call
    /// then fails with [`GenerationError::Unavailable`].
    pub fn new(service: Option<Arc<dyn ImageSynthesis>>, config: ImageConfig) -> Self {
        Self { service, config }
    }

    pub fn is_available(&self) -> bool {
        self.service.is_some()
    }

    /// Default budget for [`Self::generate_and_wait`].
    pub fn wait_budget(&self) -> Duration {
        self.config.wait_budget()
    }

    fn service(&self) -> Result<&Arc<dyn ImageSynthesis>, GenerationError> {
        self.service.as_ref().ok_or_else(|| {
            GenerationError::Unavailable("image generation requires a DashScope API key".into())
        })
    }

    fn task_spec(&self, prompt: &str) -> ImageTaskSpec {
        ImageTaskSpec {
            prompt: prompt.to_string(),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            size: self.config.size.clone(),
            count: self.config.count,
            seed: self.config.seed,
            prompt_extend: self.config.prompt_extend,
            watermark: self.config.watermark,
        }
    }

    /// Submits `prompt` with the negative-prompt guardrail and the
    /// configured parameters. Returns the task id.
    pub async fn create_task(&self, prompt: &str) -> Result<String, GenerationError> {
        let service = self.service()?;
        if prompt.trim().is_empty() {
            return Err(GenerationError::validation("image prompt must not be empty"));
        }
        let task_id = service.create_task(&self.task_spec(prompt)).await?;
        info!(task_id, "image task created");
        Ok(task_id)
    }

    /// Queries the task once. Non-terminal states are returned as-is.
    pub async fn poll_once(&self, task_id: &str) -> Result<ImageTask, GenerationError> {
        let task = self.service()?.query_task(task_id).await?;
        debug!(task_id, status = %task.status, "image task polled");
        Ok(task)
    }

    /// Polls every `poll_interval` until the task terminates, `budget`
    /// elapses, or `cancel` fires.
    pub async fn wait_for_completion(
        &self,
        task_id: &str,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<ImageResult, GenerationError> {
        self.service()?;
        let interval = self.config.poll_interval();
        let started = Instant::now();
        let deadline = started + budget;

        loop {
            let task = tokio::select! {
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                polled = self.poll_once(task_id) => polled?,
            };

            if task.status.is_terminal() {
                return settle(task_id, task, started.elapsed());
            }
            if task.status == TaskStatus::Unknown {
                warn!(task_id, "image task in unrecognized state, still waiting");
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }

            if Instant::now() >= deadline {
                warn!(task_id, budget_secs = budget.as_secs(), "image task timed out");
                return Err(GenerationError::TaskTimeout {
                    task_id: task_id.to_string(),
                    budget,
                });
            }
        }
    }

    /// Creates a task and waits for it. `budget` defaults to the
    /// configured wait budget.
    pub async fn generate_and_wait(
        &self,
        prompt: &str,
        budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<ImageResult, GenerationError> {
        let task_id = tokio::select! {
            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
            created = self.create_task(prompt) => created?,
        };
        let budget = budget.unwrap_or_else(|| self.wait_budget());
        self.wait_for_completion(&task_id, budget, cancel).await
    }

    /// Generates a portrait from a short description.
    pub async fn generate_portrait(
        &self,
        description: &str,
        cancel: &CancellationToken,
    ) -> Result<ImageResult, GenerationError> {
        if description.trim().is_empty() {
            return Err(GenerationError::validation(
                "portrait description must not be empty",
            ));
        }
        self.generate_and_wait(&portrait_prompt(description), None, cancel)
            .await
    }
}

/// Turns a terminal task into the caller's result.
fn settle(task_id: &str, task: ImageTask, elapsed: Duration) -> Result<ImageResult, GenerationError> {
    if task.status == TaskStatus::Succeeded {
        let url = task.result_url.filter(|url| !url.is_empty()).ok_or_else(|| {
            GenerationError::validation(format!("task {task_id} succeeded but no image generated"))
        })?;
        info!(
            task_id,
            elapsed_ms = elapsed.as_millis() as u64,
            "image task succeeded"
        );
        return Ok(ImageResult { url });
    }

    let message = task
        .message
        .unwrap_or_else(|| format!("task reported {}", task.status));
    warn!(task_id, message = %message, "image task failed");
    Err(GenerationError::TaskFailed {
        task_id: task_id.to_string(),
        message,
    })
}
