// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image synthesis service with a scripted task lifecycle.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use meetmoment_core::GenerationError;
use meetmoment_core::traits::ImageSynthesis;
use meetmoment_core::types::{ImageTask, ImageTaskSpec, TaskStatus};

/// Task id handed out by [`MockImageService`] unless scripted otherwise.
pub const MOCK_TASK_ID: &str = "mock-task-1";

/// A `PENDING` snapshot.
pub fn pending_task(task_id: &str) -> ImageTask {
    task(task_id, TaskStatus::Pending, None, None)
}

/// A `RUNNING` snapshot.
pub fn running_task(task_id: &str) -> ImageTask {
    task(task_id, TaskStatus::Running, None, None)
}

/// A `SUCCEEDED` snapshot carrying `url`.
pub fn succeeded_task(task_id: &str, url: &str) -> ImageTask {
    task(task_id, TaskStatus::Succeeded, Some(url), None)
}

/// A `FAILED` snapshot carrying `message`.
pub fn failed_task(task_id: &str, message: &str) -> ImageTask {
    task(task_id, TaskStatus::Failed, None, Some(message))
}

fn task(task_id: &str, status: TaskStatus, url: Option<&str>, message: Option<&str>) -> ImageTask {
    ImageTask {
        task_id: task_id.to_string(),
        status,
        result_url: url.map(str::to_string),
        message: message.map(str::to_string),
    }
}

/// A mock image service.
///
/// `create_task` pops from a queue of scripted outcomes and defaults to
/// [`MOCK_TASK_ID`]. `query_task` pops the next scripted snapshot; once the
/// script runs out the task reports `PENDING` forever.
pub struct MockImageService {
    created: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    statuses: Arc<Mutex<VecDeque<Result<ImageTask, GenerationError>>>>,
    specs: Arc<Mutex<Vec<ImageTaskSpec>>>,
    create_count: AtomicUsize,
    query_count: AtomicUsize,
}

impl MockImageService {
    /// Create a mock with empty scripts.
    pub fn new() -> Self {
        Self {
            created: Arc::new(Mutex::new(VecDeque::new())),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            specs: Arc::new(Mutex::new(Vec::new())),
            create_count: AtomicUsize::new(0),
            query_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock whose task walks through `statuses`.
    pub fn with_statuses(statuses: impl IntoIterator<Item = ImageTask>) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(statuses.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Queue the outcome of the next `create_task` call.
    pub async fn push_create(&self, outcome: Result<String, GenerationError>) {
        self.created.lock().await.push_back(outcome);
    }

    /// Queue the outcome of the next `query_task` call.
    pub async fn push_status(&self, outcome: Result<ImageTask, GenerationError>) {
        self.statuses.lock().await.push_back(outcome);
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Every spec submitted so far, in order.
    pub async fn specs(&self) -> Vec<ImageTaskSpec> {
        self.specs.lock().await.clone()
    }
}

impl Default for MockImageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSynthesis for MockImageService {
    async fn create_task(&self, spec: &ImageTaskSpec) -> Result<String, GenerationError> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        self.specs.lock().await.push(spec.clone());
        self.created
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(MOCK_TASK_ID.to_string()))
    }

    async fn query_task(&self, task_id: &str) -> Result<ImageTask, GenerationError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(pending_task(task_id)))
    }
}
