// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for MeetMoment integration tests.
//!
//! Provides scripted stand-ins for the remote services so engine tests run
//! deterministically without network access.
//!
//! # Components
//!
//! - [`MockChatModel`] - Chat model with queued replies, failures, and latency
//! - [`MockImageService`] - Image service with a scripted task status sequence

pub mod mock_chat;
pub mod mock_image;

pub use mock_chat::{MockChatModel, RecordedCall};
pub use mock_image::{
    MOCK_TASK_ID, MockImageService, failed_task, pending_task, running_task, succeeded_task,
};
