// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the MeetMoment generation engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when `dashscope.api_key` is unset.
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Top-level MeetMoment configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeetmomentConfig {
    /// Remote model service settings.
    #[serde(default)]
    pub dashscope: DashScopeConfig,

    /// Text generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Image task settings.
    #[serde(default)]
    pub image: ImageConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// DashScope (Qwen / Wanx) endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DashScopeConfig {
    /// API credential. `None` falls back to `DASHSCOPE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// OpenAI-compatible chat completion endpoint.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Text-to-image task creation endpoint.
    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Task status endpoint; the task id is appended as a path segment.
    #[serde(default = "default_task_url")]
    pub task_url: String,

    /// Chat model identifier.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Image model identifier.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum tokens per chat reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_url: default_chat_url(),
            image_url: default_image_url(),
            task_url: default_task_url(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl DashScopeConfig {
    /// Resolves the credential: config value, then `DASHSCOPE_API_KEY`.
    ///
    /// Returns `None` when neither is set; callers treat that as
    /// "remote generation unavailable", not as an error.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key
            && !key.trim().is_empty()
        {
            return Some(key.clone());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_chat_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions".to_string()
}

fn default_image_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text2image/image-synthesis".to_string()
}

fn default_task_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/tasks".to_string()
}

fn default_chat_model() -> String {
    "qwen-plus".to_string()
}

fn default_image_model() -> String {
    "wanx2.1-t2i-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_p() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    1000
}

/// Text generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Hard timeout for each chat/analysis call, in seconds.
    #[serde(default = "default_chat_timeout_secs")]
    pub chat_timeout_secs: u64,

    /// Maximum number of tags kept from a remote reply.
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            chat_timeout_secs: default_chat_timeout_secs(),
            max_tags: default_max_tags(),
        }
    }
}

impl GenerationConfig {
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }
}

fn default_chat_timeout_secs() -> u64 {
    60
}

fn default_max_tags() -> usize {
    8
}

/// Image generation and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Seconds between task status queries.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Default overall wait budget for generate-and-wait calls, in seconds.
    #[serde(default = "default_wait_budget_secs")]
    pub wait_budget_secs: u64,

    /// Output resolution, `"<width>*<height>"`.
    #[serde(default = "default_size")]
    pub size: String,

    /// Images per task.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Let the service rewrite the prompt for better results.
    #[serde(default = "default_prompt_extend")]
    pub prompt_extend: bool,

    /// Stamp the service watermark on results.
    #[serde(default)]
    pub watermark: bool,

    /// Fixed seed for reproducible images. `None` lets the service choose.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            wait_budget_secs: default_wait_budget_secs(),
            size: default_size(),
            count: default_count(),
            prompt_extend: default_prompt_extend(),
            watermark: false,
            seed: None,
        }
    }
}

impl ImageConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn wait_budget(&self) -> Duration {
        Duration::from_secs(self.wait_budget_secs)
    }
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_wait_budget_secs() -> u64 {
    300
}

fn default_size() -> String {
    "1024*1024".to_string()
}

fn default_count() -> u32 {
    1
}

fn default_prompt_extend() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
