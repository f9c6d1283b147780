// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic content generation.
//!
//! Pure functions used when the remote model is unreachable or returns
//! unusable output. No I/O, no shared state. Functions that draw random
//! values take the random source as a parameter so callers (and tests)
//! control it.

pub mod profile;
pub mod reply;
pub mod tags;

pub use profile::{
    analyze_profile, profile_attractiveness, profile_completeness, profile_keywords,
    profile_strengths, profile_suggestions,
};
pub use reply::{conversational_reply, FALLBACK_MODEL};
pub use tags::{extract_tags, tag_confidence, GENERIC_TAGS};
