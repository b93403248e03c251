// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory audio recorder.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use boxbuddy_core::{AudioRecorder, BoxbuddyError};

/// Recorder that hands out `segment-<n>` as the audio of the n-th segment.
#[derive(Debug, Default)]
pub struct MockRecorder {
    recording: AtomicBool,
    deny_microphone: AtomicBool,
    segments: AtomicUsize,
    cancelled: AtomicUsize,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `start` fails as if permission was denied.
    pub fn without_microphone() -> Self {
        let recorder = Self::default();
        recorder.deny_microphone.store(true, Ordering::SeqCst);
        recorder
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Number of segments stopped so far.
    pub fn segments(&self) -> usize {
        self.segments.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioRecorder for MockRecorder {
    async fn start(&self) -> Result<(), BoxbuddyError> {
        if self.deny_microphone.load(Ordering::SeqCst) {
            return Err(BoxbuddyError::recording("microphone permission denied"));
        }
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(BoxbuddyError::recording("recorder already running"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<u8>, BoxbuddyError> {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return Err(BoxbuddyError::recording("recorder is not running"));
        }
        let n = self.segments.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("segment-{n}").into_bytes())
    }

    async fn cancel(&self) {
        if self.recording.swap(false, Ordering::SeqCst) {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }
}
