// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the MeetMoment generation engine.

use std::time::Duration;

use strum::Display;
use thiserror::Error;

/// The error type shared by the remote clients, the orchestrator, and the
/// image task coordinator.
///
/// Text operations recover from every variant internally; image operations
/// surface each variant to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Client construction or configuration problems (bad header value, bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or request timeout before a status code was received.
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The upstream service answered with a non-success status code.
    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The response body did not parse into the expected shape.
    #[error("malformed reply: {message}")]
    MalformedReply { message: String },

    /// The reply parsed but is semantically unusable.
    #[error("reply failed validation: {message}")]
    Validation { message: String },

    /// The feature has no credential or backing service configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The remote image task reached the `FAILED` state.
    #[error("image task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    /// The image task did not reach a terminal state within the budget.
    #[error("image task {task_id} timed out after {budget:?}")]
    TaskTimeout { task_id: String, budget: Duration },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Coarse classification of a [`GenerationError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Config,
    Transport,
    UpstreamStatus,
    MalformedReply,
    Validation,
    Unavailable,
    TaskFailed,
    TaskTimeout,
    Cancelled,
}

impl GenerationError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationError::Config(_) => FailureKind::Config,
            GenerationError::Transport { .. } => FailureKind::Transport,
            GenerationError::UpstreamStatus { .. } => FailureKind::UpstreamStatus,
            GenerationError::MalformedReply { .. } => FailureKind::MalformedReply,
            GenerationError::Validation { .. } => FailureKind::Validation,
            GenerationError::Unavailable(_) => FailureKind::Unavailable,
            GenerationError::TaskFailed { .. } => FailureKind::TaskFailed,
            GenerationError::TaskTimeout { .. } => FailureKind::TaskTimeout,
            GenerationError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Shorthand for a [`GenerationError::Transport`] without a source.
    pub fn transport(message: impl Into<String>) -> Self {
        GenerationError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`GenerationError::MalformedReply`].
    pub fn malformed(message: impl Into<String>) -> Self {
        GenerationError::MalformedReply {
            message: message.into(),
        }
    }

    /// Shorthand for a [`GenerationError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        GenerationError::Validation {
            message: message.into(),
        }
    }
}
