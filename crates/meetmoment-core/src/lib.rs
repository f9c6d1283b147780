// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the MeetMoment generation engine.
//!
//! This crate provides the request/result data model, the persona table,
//! the error taxonomy, and the traits the engine uses to reach the remote
//! generative service.

pub mod error;
pub mod persona;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FailureKind, GenerationError};
pub use persona::{Persona, PersonaProfile};
pub use traits::{ChatModel, ImageSynthesis};
pub use types::{
    ConversationRequest, ConversationResult, GenerationKind, GenerationRequest,
    GenerationResult, ImageRequest, ImageResult, ImageTask, ImageTaskSpec, ParsedReply,
    ProfileAnalysisRequest, ProfileFields, ProfileScore, TagRequest, TagResult, TaskStatus,
    TokenUsage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_has_all_variants() {
        let _config = GenerationError::Config("test".into());
        let _transport = GenerationError::Transport {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _status = GenerationError::UpstreamStatus {
            status: 500,
            body: "test".into(),
        };
        let _malformed = GenerationError::malformed("test");
        let _validation = GenerationError::validation("test");
        let _unavailable = GenerationError::Unavailable("test".into());
        let _failed = GenerationError::TaskFailed {
            task_id: "t".into(),
            message: "test".into(),
        };
        let _timeout = GenerationError::TaskTimeout {
            task_id: "t".into(),
            budget: std::time::Duration::from_secs(300),
        };
        let _cancelled = GenerationError::Cancelled;
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_chat_model<T: ChatModel>() {}
        fn _assert_image_synthesis<T: ImageSynthesis>() {}
    }

    #[test]
    fn result_serialization_is_tagged() {
        let result = GenerationResult::Image(ImageResult {
            url: "https://img/x.png".into(),
        });
        let json = serde_json::to_value(&result).expect("should serialize");
        assert_eq!(json["kind"], "image");
        assert_eq!(json["url"], "https://img/x.png");
    }
}
