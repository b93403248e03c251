// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicUsize, Ordering};

use boxbuddy_core::{FeedbackCue, ScanFeedback};

/// Feedback sink that counts cues.
#[derive(Debug, Default)]
pub struct CountingFeedback {
    cues: AtomicUsize,
}

impl CountingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.cues.load(Ordering::SeqCst)
    }
}

impl ScanFeedback for CountingFeedback {
    fn cue(&self, _cue: FeedbackCue) {
        self.cues.fetch_add(1, Ordering::SeqCst);
    }
}
