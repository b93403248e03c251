// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BoxBuddy scan and capture pipeline.

use thiserror::Error;

/// The primary error type used across collaborator traits and pipeline operations.
#[derive(Debug, Error)]
pub enum BoxbuddyError {
    /// Lookup miss. Expected during scanning; drives create-vs-view branching.
    #[error("item not found: {id}")]
    NotFound { id: String },

    /// The service rejected a write. Never retried.
    #[error("rejected by service: {message}")]
    Validation { message: String },

    /// Network unreachable, timeout, aborted connection, or a retryable status.
    #[error("transient network error: {message}")]
    Transient {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Microphone unavailable, permission denied, or the recorder failed.
    #[error("recording error: {message}")]
    Recording {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The photo is not in the available pool (already attached or unknown).
    #[error("photo {photo_id} is not available")]
    PhotoUnavailable { photo_id: String },

    /// A draft operation was attempted with no segment in progress.
    #[error("no capture segment is active")]
    NoActiveSegment,

    /// `begin_segment` was called while a segment is already recording.
    #[error("a capture segment is already active")]
    SegmentActive,

    /// The upload queue worker has stopped and accepts no more bundles.
    #[error("upload queue is closed")]
    QueueClosed,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BoxbuddyError {
    /// Builds a [`BoxbuddyError::Transient`] without an underlying source.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`BoxbuddyError::Recording`] without an underlying source.
    pub fn recording(message: impl Into<String>) -> Self {
        Self::Recording {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Returns true for a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
