// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MeetmomentConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing fast.
pub fn validate_config(config: &MeetmomentConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let ds = &config.dashscope;
    for (key, url) in [
        ("chat_url", &ds.chat_url),
        ("image_url", &ds.image_url),
        ("task_url", &ds.task_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!("dashscope.{key} must be an http(s) URL, got `{url}`"));
        }
    }
    if ds.chat_model.trim().is_empty() {
        fail("dashscope.chat_model must not be empty".to_string());
    }
    if ds.image_model.trim().is_empty() {
        fail("dashscope.image_model must not be empty".to_string());
    }
    if !(0.0..=2.0).contains(&ds.temperature) {
        fail(format!(
            "dashscope.temperature must be within [0, 2], got {}",
            ds.temperature
        ));
    }
    if !(ds.top_p > 0.0 && ds.top_p <= 1.0) {
        fail(format!("dashscope.top_p must be within (0, 1], got {}", ds.top_p));
    }
    if ds.max_tokens == 0 {
        fail("dashscope.max_tokens must be at least 1".to_string());
    }

    let generation = &config.generation;
    if generation.chat_timeout_secs == 0 {
        fail("generation.chat_timeout_secs must be at least 1".to_string());
    }
    // Remote tag replies need at least two valid tags to be accepted.
    if !(2..=8).contains(&generation.max_tags) {
        fail(format!(
            "generation.max_tags must be between 2 and 8, got {}",
            generation.max_tags
        ));
    }

    let image = &config.image;
    if image.poll_interval_secs == 0 {
        fail("image.poll_interval_secs must be at least 1".to_string());
    }
    if image.wait_budget_secs < image.poll_interval_secs {
        fail(format!(
            "image.wait_budget_secs ({}) must not be shorter than image.poll_interval_secs ({})",
            image.wait_budget_secs, image.poll_interval_secs
        ));
    }
    if image.count == 0 {
        fail("image.count must be at least 1".to_string());
    }
    let valid_size = image
        .size
        .split_once('*')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
    if !valid_size {
        fail(format!(
            "image.size must look like `<width>*<height>`, got `{}`",
            image.size
        ));
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "log.level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.log.level
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
