// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recorder backed by a pre-recorded audio file.
//!
//! The CLI has no microphone. `start` checks that the file can be read and
//! `stop` returns its bytes as the segment audio.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use boxbuddy_core::{AudioRecorder, BoxbuddyError};
use tracing::debug;

pub struct FileRecorder {
    path: PathBuf,
    recording: AtomicBool,
}

impl FileRecorder {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            recording: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AudioRecorder for FileRecorder {
    async fn start(&self) -> Result<(), BoxbuddyError> {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            BoxbuddyError::Recording {
                message: format!("cannot open {}", self.path.display()),
                source: Some(Box::new(e)),
            }
        })?;
        if !metadata.is_file() {
            return Err(BoxbuddyError::recording(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(BoxbuddyError::recording("recorder already running"));
        }
        debug!(path = %self.path.display(), "recording from file");
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<u8>, BoxbuddyError> {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return Err(BoxbuddyError::recording("recorder is not running"));
        }
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| BoxbuddyError::Recording {
                message: format!("cannot read {}", self.path.display()),
                source: Some(Box::new(e)),
            })
    }

    async fn cancel(&self) {
        self.recording.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn stop_returns_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();
        let recorder = FileRecorder::new(file.path().to_path_buf());

        recorder.start().await.unwrap();
        assert_eq!(recorder.stop().await.unwrap(), b"RIFF....WAVE".to_vec());
        assert!(recorder.stop().await.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_a_recording_error() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = FileRecorder::new(dir.path().join("nope.webm"));
        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, BoxbuddyError::Recording { .. }));
    }

    #[tokio::test]
    async fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = FileRecorder::new(dir.path().to_path_buf());
        assert!(recorder.start().await.is_err());
    }
}
