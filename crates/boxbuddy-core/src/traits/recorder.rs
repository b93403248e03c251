// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audio recorder used by the capture composer.

use async_trait::async_trait;

use crate::error::BoxbuddyError;

/// A microphone-backed recorder producing one audio blob per segment.
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Starts recording. Fails with [`BoxbuddyError::Recording`] when the
    /// microphone is unavailable or permission is denied.
    async fn start(&self) -> Result<(), BoxbuddyError>;

    /// Stops recording and returns the encoded audio.
    async fn stop(&self) -> Result<Vec<u8>, BoxbuddyError>;

    /// Stops recording and throws the audio away.
    async fn cancel(&self);
}
