// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text operations never surface remote failures.

use std::sync::Arc;
use std::time::Duration;

use meetmoment_config::model::{GenerationConfig, ImageConfig};
use meetmoment_core::types::{
    ConversationRequest, GenerationRequest, GenerationResult, ProfileAnalysisRequest,
    ProfileFields, TagRequest,
};
use meetmoment_core::{ChatModel, GenerationError, Persona};
use meetmoment_engine::{ContentSource, GenerationEngine, ImageTaskCoordinator};
use meetmoment_test_utils::MockChatModel;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

fn engine_with(chat: MockChatModel) -> GenerationEngine {
    let chat: Arc<dyn ChatModel> = Arc::new(chat);
    GenerationEngine::new(
        Some(chat),
        ImageTaskCoordinator::new(None, ImageConfig::default()),
        &GenerationConfig::default(),
    )
}

fn failure_modes() -> Vec<(&'static str, MockChatModel)> {
    vec![
        ("transport", MockChatModel::unreachable()),
        (
            "upstream status",
            MockChatModel::failing(|| GenerationError::UpstreamStatus {
                status: 503,
                body: "ServiceUnavailable".into(),
            }),
        ),
        (
            "malformed",
            MockChatModel::failing(|| GenerationError::malformed("no choices")),
        ),
        (
            "slow",
            MockChatModel::new().with_latency(Duration::from_secs(120)),
        ),
    ]
}

fn requests() -> Vec<GenerationRequest> {
    vec![
        GenerationRequest::TagExtraction(TagRequest {
            subject: "user-7".into(),
            content: "周末喜欢去咖啡馆看书，偶尔拍照".into(),
        }),
        GenerationRequest::Conversation(ConversationRequest {
            subject: "user-7".into(),
            message: "你今天过得好吗".into(),
            persona: Some("活泼".into()),
            context: Default::default(),
        }),
        GenerationRequest::ProfileAnalysis(ProfileAnalysisRequest {
            subject: "user-7".into(),
            profile: ProfileFields {
                age: 26,
                occupation: "护士".into(),
                bio: "热爱生活，喜欢旅行".into(),
                interests: vec!["旅行".into()],
                photos: vec![],
            },
        }),
    ]
}

#[tokio::test(start_paused = true)]
async fn every_text_operation_survives_every_failure_class() {
    let cancel = CancellationToken::new();
    for (mode, chat) in failure_modes() {
        let engine = engine_with(chat);
        for request in requests() {
            let generated = engine
                .generate(&request, &cancel)
                .await
                .unwrap_or_else(|e| panic!("{mode}: {:?} returned {e}", request.kind()));
            assert_eq!(generated.source, ContentSource::Heuristic, "{mode}");
            match generated.value {
                GenerationResult::Tags(tags) => {
                    assert!(!tags.tags.is_empty(), "{mode}");
                    assert!((0.0..=1.0).contains(&tags.confidence), "{mode}");
                }
                GenerationResult::Conversation(reply) => {
                    assert!(Persona::Lively.replies().contains(&reply.text.as_str()), "{mode}");
                    assert_eq!(reply.source_model, "local-fallback");
                }
                GenerationResult::Profile(score) => {
                    assert!(score.overall <= 100, "{mode}");
                    assert!(score.attractiveness <= 95.0, "{mode}");
                }
                GenerationResult::Image(_) => unreachable!("no image requests"),
            }
        }
    }
}

#[tokio::test]
async fn remote_is_not_retried_after_failure() {
    let chat = Arc::new(MockChatModel::unreachable());
    let dyn_chat: Arc<dyn ChatModel> = chat.clone();
    let engine = GenerationEngine::new(
        Some(dyn_chat),
        ImageTaskCoordinator::new(None, ImageConfig::default()),
        &GenerationConfig::default(),
    );
    let cancel = CancellationToken::new();
    for request in requests() {
        engine.generate(&request, &cancel).await.unwrap();
    }
    assert_eq!(chat.call_count(), 3);
}

#[tokio::test]
async fn seeded_rng_makes_fallback_deterministic() {
    let request = ConversationRequest {
        subject: "user-7".into(),
        message: "hi".into(),
        persona: Some("mature".into()),
        context: Default::default(),
    };
    let cancel = CancellationToken::new();
    let first = engine_with(MockChatModel::unreachable())
        .conversation_with_rng(&request, &cancel, &mut StdRng::seed_from_u64(42))
        .await;
    let second = engine_with(MockChatModel::unreachable())
        .conversation_with_rng(&request, &cancel, &mut StdRng::seed_from_u64(42))
        .await;
    assert_eq!(first.value.text, second.value.text);
}

#[tokio::test]
async fn garbage_tag_reply_uses_reply_text() {
    let engine = engine_with(MockChatModel::with_replies(["abc"]));
    let result = engine
        .tags_with_rng(
            &TagRequest {
                subject: "user-7".into(),
                content: "我喜欢摄影".into(),
            },
            &CancellationToken::new(),
            &mut StdRng::seed_from_u64(1),
        )
        .await;
    assert_eq!(result.source, ContentSource::Heuristic);
    // Extracted from "abc", not from the original content.
    assert_eq!(result.value.tags, vec!["生活", "社交", "娱乐"]);
}
