// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rapid capture: record, attach photos, hand off, repeat.
//!
//! A segment is one recording plus a metadata draft and the photos attached
//! while it runs. Ending a segment freezes the draft into a
//! [`CaptureBundle`], enqueues it for upload and returns the composer to
//! idle straight away; uploads never hold up the next segment. Discarding a
//! segment throws the audio away and puts its photos back into the pool.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use boxbuddy_config::model::CaptureConfig;
use boxbuddy_core::{AudioRecorder, BoxbuddyError, CaptureBundle, PhotoRef};
use chrono::Utc;
use tokio::time::{Instant, Sleep};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::pool::PhotoPool;
use crate::queue::UploadQueue;

/// Default recording ceiling.
pub const DEFAULT_MAX_RECORDING: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Draft {
    started_at: Instant,
    metadata: BTreeMap<String, String>,
    photos: Vec<PhotoRef>,
    ceiling_warned: bool,
}

impl Draft {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            metadata: BTreeMap::new(),
            photos: Vec::new(),
            ceiling_warned: false,
        }
    }
}

/// Composes capture bundles one segment at a time.
pub struct CaptureComposer {
    recorder: Arc<dyn AudioRecorder>,
    pool: Arc<PhotoPool>,
    queue: UploadQueue,
    max_recording: Duration,
    draft: Option<Draft>,
}

impl CaptureComposer {
    pub fn new(
        recorder: Arc<dyn AudioRecorder>,
        pool: Arc<PhotoPool>,
        queue: UploadQueue,
        max_recording: Duration,
    ) -> Self {
        Self {
            recorder,
            pool,
            queue,
            max_recording,
            draft: None,
        }
    }

    pub fn from_config(
        config: &CaptureConfig,
        recorder: Arc<dyn AudioRecorder>,
        pool: Arc<PhotoPool>,
        queue: UploadQueue,
    ) -> Self {
        Self::new(recorder, pool, queue, config.max_recording())
    }

    /// True while a segment is being recorded.
    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    /// Starts recording and opens an empty draft.
    ///
    /// A recorder failure leaves the composer idle.
    pub async fn begin_segment(&mut self) -> Result<(), BoxbuddyError> {
        if self.draft.is_some() {
            return Err(BoxbuddyError::SegmentActive);
        }
        self.recorder.start().await?;
        self.draft = Some(Draft::new());
        debug!("capture segment started");
        Ok(())
    }

    /// Moves `photo` from the pool into the current draft.
    pub async fn attach_photo(&mut self, photo: PhotoRef) -> Result<(), BoxbuddyError> {
        let draft = self.draft.as_mut().ok_or(BoxbuddyError::NoActiveSegment)?;
        self.pool.take(&photo).await?;
        debug!(photo_id = %photo, "photo attached");
        draft.photos.push(photo);
        Ok(())
    }

    /// Sets a draft metadata field, replacing any previous value.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), BoxbuddyError> {
        let draft = self.draft.as_mut().ok_or(BoxbuddyError::NoActiveSegment)?;
        draft.metadata.insert(key.into(), value.into());
        Ok(())
    }

    pub fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.draft.as_ref().map(|d| &d.metadata)
    }

    pub fn attached_photos(&self) -> &[PhotoRef] {
        match &self.draft {
            Some(draft) => &draft.photos,
            None => &[],
        }
    }

    /// Time recorded in the current segment.
    pub fn elapsed(&self) -> Option<Duration> {
        self.draft.as_ref().map(|d| d.started_at.elapsed())
    }

    /// A timer that fires when the current segment reaches the recording
    /// ceiling, or `None` while idle.
    ///
    /// The timer does not borrow the composer, so a caller can select on it
    /// while still attaching photos, then call [`check_ceiling`] to warn.
    ///
    /// [`check_ceiling`]: Self::check_ceiling
    pub fn ceiling_alarm(&self) -> Option<Sleep> {
        let draft = self.draft.as_ref()?;
        let deadline = draft.started_at.checked_add(self.max_recording)?;
        Some(tokio::time::sleep_until(deadline))
    }

    /// Returns true once the recording ceiling is reached.
    ///
    /// The first time it is reached a warning is logged. Recording goes on
    /// until the caller ends or discards the segment. Callers either poll
    /// this or await [`ceiling_alarm`] first.
    ///
    /// [`ceiling_alarm`]: Self::ceiling_alarm
    pub fn check_ceiling(&mut self) -> bool {
        let max_recording = self.max_recording;
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let elapsed = draft.started_at.elapsed();
        if elapsed < max_recording {
            return false;
        }
        if !draft.ceiling_warned {
            draft.ceiling_warned = true;
            warn!(
                elapsed_secs = elapsed.as_secs(),
                max_secs = max_recording.as_secs(),
                "recording ceiling reached, end the segment to keep it"
            );
        }
        true
    }

    /// Stops recording, enqueues the finished bundle and returns a copy.
    ///
    /// The composer is idle afterwards whatever the result. If the recorder
    /// or the queue fails, the attached photos go back to the pool.
    pub async fn end_segment(&mut self) -> Result<CaptureBundle, BoxbuddyError> {
        let draft = self.draft.take().ok_or(BoxbuddyError::NoActiveSegment)?;

        let audio = match self.recorder.stop().await {
            Ok(audio) => audio,
            Err(e) => {
                self.pool.give_back(draft.photos).await;
                return Err(e);
            }
        };

        let bundle = CaptureBundle {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            audio,
            photos: draft.photos,
            metadata: draft.metadata,
        };

        if let Err(e) = self.queue.enqueue(bundle.clone()) {
            self.pool.give_back(bundle.photos).await;
            return Err(e);
        }
        info!(
            bundle_id = %bundle.id,
            photos = bundle.photos.len(),
            audio_bytes = bundle.audio.len(),
            backlog = self.queue.backlog(),
            "capture bundle composed"
        );
        Ok(bundle)
    }

    /// Drops the current segment and returns its photos to the pool.
    ///
    /// Returns false if no segment was active.
    pub async fn discard(&mut self) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        self.recorder.cancel().await;
        let returned = draft.photos.len();
        self.pool.give_back(draft.photos).await;
        debug!(returned, "capture segment discarded");
        true
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxbuddy_test_utils::{MockInventory, MockRecorder};
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    struct Rig {
        composer: CaptureComposer,
        recorder: Arc<MockRecorder>,
        pool: Arc<PhotoPool>,
    }

    async fn rig(recorder: MockRecorder) -> Rig {
        let recorder = Arc::new(recorder);
        let pool = Arc::new(PhotoPool::new());
        for id in ["p1", "p2", "p3"] {
            pool.add(PhotoRef::from(id)).await;
        }
        let service = Arc::new(MockInventory::new());
        let (queue, _worker) =
            UploadQueue::spawn(service, Duration::from_secs(20), CancellationToken::new());
        let composer =
            CaptureComposer::new(recorder.clone(), pool.clone(), queue, DEFAULT_MAX_RECORDING);
        Rig {
            composer,
            recorder,
            pool,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn begin_twice_is_rejected() {
        let mut rig = rig(MockRecorder::new()).await;
        rig.composer.begin_segment().await.unwrap();
        assert!(matches!(
            rig.composer.begin_segment().await,
            Err(BoxbuddyError::SegmentActive)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn recorder_failure_leaves_no_draft() {
        let mut rig = rig(MockRecorder::without_microphone()).await;
        let err = rig.composer.begin_segment().await.unwrap_err();
        assert!(matches!(err, BoxbuddyError::Recording { .. }));
        assert!(!rig.composer.is_active());
        assert!(matches!(
            rig.composer.set_field("name", "x"),
            Err(BoxbuddyError::NoActiveSegment)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn attach_requires_segment_and_available_photo() {
        let mut rig = rig(MockRecorder::new()).await;
        assert!(matches!(
            rig.composer.attach_photo(PhotoRef::from("p1")).await,
            Err(BoxbuddyError::NoActiveSegment)
        ));

        rig.composer.begin_segment().await.unwrap();
        rig.composer.attach_photo(PhotoRef::from("p1")).await.unwrap();
        assert!(matches!(
            rig.composer.attach_photo(PhotoRef::from("p1")).await,
            Err(BoxbuddyError::PhotoUnavailable { .. })
        ));
        assert_eq!(rig.composer.attached_photos(), &[PhotoRef::from("p1")]);
        assert!(!rig.pool.contains(&PhotoRef::from("p1")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn end_segment_freezes_draft_and_resets() {
        let mut rig = rig(MockRecorder::new()).await;
        rig.composer.begin_segment().await.unwrap();
        rig.composer.set_field("name", "Cordless drill").unwrap();
        rig.composer.set_field("quantity", "1").unwrap();
        rig.composer.attach_photo(PhotoRef::from("p2")).await.unwrap();

        let bundle = rig.composer.end_segment().await.unwrap();

        assert_eq!(bundle.audio, b"segment-1".to_vec());
        assert_eq!(bundle.photos, vec![PhotoRef::from("p2")]);
        assert_eq!(bundle.metadata["name"], "Cordless drill");
        assert_eq!(bundle.metadata["quantity"], "1");
        assert!(!rig.composer.is_active());
        assert!(rig.composer.metadata().is_none());
        assert!(rig.composer.attached_photos().is_empty());
        assert!(!rig.recorder.is_recording());

        // The next unit starts from a clean draft.
        rig.composer.begin_segment().await.unwrap();
        assert!(rig.composer.metadata().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn end_without_segment_fails() {
        let mut rig = rig(MockRecorder::new()).await;
        assert!(matches!(
            rig.composer.end_segment().await,
            Err(BoxbuddyError::NoActiveSegment)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn discard_returns_photos_once() {
        let mut rig = rig(MockRecorder::new()).await;
        let mut events = rig.pool.subscribe();

        rig.composer.begin_segment().await.unwrap();
        rig.composer.attach_photo(PhotoRef::from("p1")).await.unwrap();
        rig.composer.attach_photo(PhotoRef::from("p3")).await.unwrap();
        assert_eq!(rig.pool.available().await, vec![PhotoRef::from("p2")]);

        assert!(rig.composer.discard().await);
        assert!(!rig.composer.discard().await);

        assert_eq!(
            rig.pool.available().await,
            vec![
                PhotoRef::from("p2"),
                PhotoRef::from("p1"),
                PhotoRef::from("p3")
            ]
        );
        assert_eq!(rig.recorder.cancelled(), 1);
        assert_eq!(rig.recorder.segments(), 0);

        let mut returned = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, crate::pool::PoolEvent::Returned(_)) {
                returned += 1;
            }
        }
        assert_eq!(returned, 2);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn ceiling_warns_once_and_keeps_recording() {
        let mut rig = rig(MockRecorder::new()).await;
        rig.composer.begin_segment().await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(!rig.composer.check_ceiling());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(rig.composer.check_ceiling());
        assert!(rig.composer.check_ceiling());
        assert!(rig.recorder.is_recording());
        assert!(rig.composer.is_active());
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|line| line.contains("recording ceiling reached"))
                .count()
            {
                1 => Ok(()),
                n => Err(format!("expected one ceiling warning, got {n}")),
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn ceiling_alarm_fires_at_the_limit() {
        let mut rig = rig(MockRecorder::new()).await;
        assert!(rig.composer.ceiling_alarm().is_none());

        rig.composer.begin_segment().await.unwrap();
        let alarm = rig.composer.ceiling_alarm().unwrap();
        rig.composer.attach_photo(PhotoRef::from("p1")).await.unwrap();
        assert!(!rig.composer.check_ceiling());

        alarm.await;
        assert!(rig.composer.elapsed().unwrap() >= DEFAULT_MAX_RECORDING);
        assert!(rig.composer.check_ceiling());
        assert!(rig.recorder.is_recording());

        rig.composer.discard().await;
        assert!(rig.composer.ceiling_alarm().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_queue_returns_photos() {
        let mut rig = rig(MockRecorder::new()).await;
        rig.composer.begin_segment().await.unwrap();
        rig.composer.attach_photo(PhotoRef::from("p1")).await.unwrap();
        rig.composer.queue().shutdown();

        assert!(matches!(
            rig.composer.end_segment().await,
            Err(BoxbuddyError::QueueClosed)
        ));
        assert!(rig.pool.contains(&PhotoRef::from("p1")).await);
        assert!(!rig.composer.is_active());
    }
}
