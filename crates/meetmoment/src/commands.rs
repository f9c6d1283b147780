// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand execution.

use std::time::Duration;

use meetmoment_config::MeetmomentConfig;
use meetmoment_core::GenerationError;
use meetmoment_core::types::{
    ConversationRequest, GenerationRequest, ImageRequest, ProfileAnalysisRequest, ProfileFields,
    TagRequest,
};
use meetmoment_engine::GenerationEngine;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{Commands, ImageCommands};

/// Parses a `key=value` context entry.
pub fn parse_context_entry(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `key=value`, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, GenerationError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| GenerationError::Config(format!("failed to encode output: {e}")))
}

/// Runs one subcommand and returns its JSON output.
///
/// Text subcommands and budget-less image generation go through
/// [`GenerationEngine::generate`]; task operations call the coordinator directly.
pub async fn run(
    command: Commands,
    subject: &str,
    config: &MeetmomentConfig,
    cancel: &CancellationToken,
) -> Result<String, GenerationError> {
    let engine = GenerationEngine::from_config(config)?;
    let subject = subject.to_string();

    let request = match command {
        Commands::Tags { content } => {
            GenerationRequest::TagExtraction(TagRequest { subject, content })
        }
        Commands::Chat {
            message,
            persona,
            context,
        } => GenerationRequest::Conversation(ConversationRequest {
            subject,
            message,
            persona,
            context: context.into_iter().collect(),
        }),
        Commands::Analyze {
            age,
            occupation,
            bio,
            interests,
            photos,
        } => GenerationRequest::ProfileAnalysis(ProfileAnalysisRequest {
            subject,
            profile: ProfileFields {
                age,
                occupation,
                bio,
                interests,
                photos,
            },
        }),
        Commands::Image(ImageCommands::Generate {
            prompt,
            budget_secs: None,
        }) => GenerationRequest::ImageGeneration(ImageRequest { subject, prompt }),
        Commands::Image(ImageCommands::Generate {
            prompt,
            budget_secs: Some(secs),
        }) => {
            let budget = Some(Duration::from_secs(secs));
            let url = engine
                .images()
                .generate_and_wait(&prompt, budget, cancel)
                .await?;
            return to_json(&url);
        }
        Commands::Image(ImageCommands::Create { prompt }) => {
            let task_id = engine.create_image_task(&prompt).await?;
            return to_json(&serde_json::json!({ "task_id": task_id }));
        }
        Commands::Image(ImageCommands::Query { task_id }) => {
            return to_json(&engine.query_task(&task_id).await?);
        }
        Commands::Portrait { description } => {
            return to_json(&engine.generate_portrait(&description, cancel).await?);
        }
    };

    to_json(&engine.generate(&request, cancel).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_entry_splits_on_first_equals() {
        assert_eq!(
            parse_context_entry("topic=a=b").unwrap(),
            ("topic".to_string(), "a=b".to_string())
        );
        assert!(parse_context_entry("novalue").is_err());
        assert!(parse_context_entry("=x").is_err());
    }
}
