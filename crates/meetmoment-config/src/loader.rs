// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./meetmoment.toml` > `~/.config/meetmoment/meetmoment.toml`
//! > `/etc/meetmoment/meetmoment.toml` with environment variable overrides via
//! the `MEETMOMENT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MeetmomentConfig;

pub(crate) const LOCAL_CONFIG: &str = "meetmoment.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/meetmoment/meetmoment.toml";
pub(crate) const USER_CONFIG: &str = "meetmoment/meetmoment.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/meetmoment/meetmoment.toml` (system-wide)
/// 3. `~/.config/meetmoment/meetmoment.toml` (user XDG config)
/// 4. `./meetmoment.toml` (local directory)
/// 5. `MEETMOMENT_*` environment variables
pub fn load_config() -> Result<MeetmomentConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MeetmomentConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetmomentConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MeetmomentConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetmomentConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MeetmomentConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join(USER_CONFIG))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Top-level sections that environment keys are mapped into.
const SECTIONS: &[&str] = &["dashscope", "generation", "image", "log"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEETMOMENT_DASHSCOPE_IMAGE_URL` must map to
/// `dashscope.image_url`, not `dashscope.image.url`. Only the leading section
/// name is split off.
fn env_provider() -> Env {
    Env::prefixed("MEETMOMENT_").map(|key| {
        // `key` keeps the env var's original case; only the prefix is stripped.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}
