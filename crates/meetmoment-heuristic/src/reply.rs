// SPDX-FileCopyrightText: 2026 MeetMoment Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned persona replies.

use meetmoment_core::Persona;
use rand::seq::SliceRandom;
use rand::Rng;

/// Model name reported for locally generated replies.
pub const FALLBACK_MODEL: &str = "local-fallback";

/// Picks one canned reply from the persona's pool, uniformly at random.
///
/// The message does not influence the choice; it is accepted so the local
/// path has the same shape as the remote one.
pub fn conversational_reply<R: Rng + ?Sized>(
    _message: &str,
    persona: Persona,
    rng: &mut R,
) -> String {
    persona
        .replies()
        .choose(rng)
        .or_else(|| Persona::Default.replies().first())
        .map(|reply| reply.to_string())
        .unwrap_or_default()
}
