// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asynchronous text-to-image service trait.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::types::{ImageTask, ImageTaskSpec};

/// A remote image synthesis service that runs generation as a task.
#[async_trait]
pub trait ImageSynthesis: Send + Sync + 'static {
    /// Submits a task in asynchronous mode and returns its task id.
    async fn create_task(&self, spec: &ImageTaskSpec) -> Result<String, GenerationError>;

    /// Queries the current state of a task.
    async fn query_task(&self, task_id: &str) -> Result<ImageTask, GenerationError>;
}
