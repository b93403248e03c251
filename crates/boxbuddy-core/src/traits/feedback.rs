// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan feedback (visual flash plus tone).

use std::time::Duration;

/// Descriptor of the presentational cue fired for an accepted decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackCue {
    pub flash: Duration,
    pub tone_hz: f32,
    pub tone: Duration,
}

impl Default for FeedbackCue {
    fn default() -> Self {
        Self {
            flash: Duration::from_millis(200),
            tone_hz: 800.0,
            tone: Duration::from_millis(100),
        }
    }
}

/// Receives one cue per accepted (non-cooldown) decode, regardless of mode.
///
/// Implementations carry no pipeline state and must not block.
pub trait ScanFeedback: Send + Sync {
    fn cue(&self, cue: FeedbackCue);
}

/// Feedback sink that does nothing (headless use).
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl ScanFeedback for SilentFeedback {
    fn cue(&self, _cue: FeedbackCue) {}
}
