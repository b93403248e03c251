// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::Write;

use boxbuddy_core::{FeedbackCue, ScanFeedback};

/// Rings the terminal bell once per accepted decode.
#[derive(Debug, Default)]
pub struct TerminalFeedback;

impl ScanFeedback for TerminalFeedback {
    fn cue(&self, _cue: FeedbackCue) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}
