// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation orchestration for MeetMoment.
//!
//! [`GenerationEngine`] runs the fail-soft text operations (tag extraction,
//! persona conversation, profile analysis) and hands image generation to the
//! [`ImageTaskCoordinator`], which creates remote tasks and polls them to
//! completion.

pub mod image;
pub mod orchestrator;
pub mod prompts;
pub mod validation;

pub use image::ImageTaskCoordinator;
pub use orchestrator::{ContentSource, Generated, GenerationEngine};
