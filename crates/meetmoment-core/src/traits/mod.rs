// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the engine and the remote generative service.
//!
//! Both traits use `#[async_trait]` so implementations can be held as
//! `Arc<dyn _>` and swapped for scripted mocks in tests.

pub mod chat;
pub mod image;

pub use chat::ChatModel;
pub use image::ImageSynthesis;
