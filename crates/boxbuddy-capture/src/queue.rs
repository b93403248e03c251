// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strictly ordered background upload of capture bundles.
//!
//! One worker task owns the pending entries and drains them head first.
//! The head is retried after a flat delay on transient failures and stays
//! at the head meanwhile, so nothing behind it is attempted. A rejected
//! bundle is dropped and the worker moves on. With nothing pending the
//! worker parks on the channel and no timer is armed.
//!
//! Producers only touch an unbounded channel, so enqueueing never waits
//! on upload progress.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use boxbuddy_config::model::CaptureConfig;
use boxbuddy_core::{BoxbuddyError, CaptureBundle, CaptureReceipt, InventoryService};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Longest retry delay the worker will arm.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(86_400);

/// One bundle awaiting upload.
#[derive(Debug, Clone)]
pub struct UploadQueueEntry {
    pub bundle: CaptureBundle,
    /// Upload attempts made so far.
    pub attempt: u32,
    /// Earliest time of the next attempt; `None` means immediately.
    pub next_retry_at: Option<Instant>,
}

impl UploadQueueEntry {
    fn new(bundle: CaptureBundle) -> Self {
        Self {
            bundle,
            attempt: 0,
            next_retry_at: None,
        }
    }
}

/// Progress reported for each upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Uploaded {
        bundle_id: Uuid,
        attempts: u32,
        receipt: CaptureReceipt,
    },
    /// A transient failure; the bundle stays at the head of the queue.
    RetryScheduled {
        bundle_id: Uuid,
        attempt: u32,
        delay: Duration,
        reason: String,
    },
    /// The service refused the bundle; it will not be retried.
    Rejected { bundle_id: Uuid, reason: String },
}

/// Handle to the upload worker. Cheap to clone.
#[derive(Clone)]
pub struct UploadQueue {
    incoming: mpsc::UnboundedSender<CaptureBundle>,
    backlog: Arc<watch::Sender<usize>>,
    events: broadcast::Sender<UploadEvent>,
    cancel: CancellationToken,
}

impl UploadQueue {
    /// Spawns the worker on the current runtime.
    ///
    /// The worker exits when `cancel` fires or once every handle is dropped
    /// and nothing is pending. `retry_delay` is capped at [`MAX_RETRY_DELAY`].
    pub fn spawn(
        service: Arc<dyn InventoryService>,
        retry_delay: Duration,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (incoming, rx) = mpsc::unbounded_channel();
        let (backlog, _) = watch::channel(0usize);
        let backlog = Arc::new(backlog);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let worker = UploadWorker {
            service,
            retry_delay: retry_delay.min(MAX_RETRY_DELAY),
            incoming: rx,
            pending: VecDeque::new(),
            backlog: backlog.clone(),
            events: events.clone(),
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(worker.run());

        (
            Self {
                incoming,
                backlog,
                events,
                cancel,
            },
            handle,
        )
    }

    /// Spawns the worker with the `[capture]` retry delay.
    pub fn from_config(
        config: &CaptureConfig,
        service: Arc<dyn InventoryService>,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn(service, config.retry_delay(), cancel)
    }

    /// Hands a bundle to the worker. Never waits on uploads.
    pub fn enqueue(&self, bundle: CaptureBundle) -> Result<(), BoxbuddyError> {
        if self.cancel.is_cancelled() {
            return Err(BoxbuddyError::QueueClosed);
        }
        let bundle_id = bundle.id;
        // Count before sending so the worker never decrements first.
        self.backlog.send_modify(|n| *n += 1);
        if self.incoming.send(bundle).is_err() {
            self.backlog.send_modify(|n| *n = n.saturating_sub(1));
            return Err(BoxbuddyError::QueueClosed);
        }
        debug!(%bundle_id, "bundle enqueued");
        Ok(())
    }

    /// Bundles enqueued but not yet uploaded or rejected.
    pub fn backlog(&self) -> usize {
        *self.backlog.borrow()
    }

    pub fn watch_backlog(&self) -> watch::Receiver<usize> {
        self.backlog.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// Stops the worker. In-flight attempts finish; nothing else is tried.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct UploadWorker {
    service: Arc<dyn InventoryService>,
    retry_delay: Duration,
    incoming: mpsc::UnboundedReceiver<CaptureBundle>,
    pending: VecDeque<UploadQueueEntry>,
    backlog: Arc<watch::Sender<usize>>,
    events: broadcast::Sender<UploadEvent>,
    cancel: CancellationToken,
}

impl UploadWorker {
    async fn run(mut self) {
        debug!("upload worker started");
        loop {
            if self.pending.is_empty() {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => break,
                    next = self.incoming.recv() => match next {
                        Some(bundle) => self.pending.push_back(UploadQueueEntry::new(bundle)),
                        None => {
                            debug!("all queue handles dropped");
                            break;
                        }
                    },
                }
            }
            while let Ok(bundle) = self.incoming.try_recv() {
                self.pending.push_back(UploadQueueEntry::new(bundle));
            }

            if let Some(at) = self.pending.front().and_then(|e| e.next_retry_at) {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => break,
                    () = tokio::time::sleep_until(at) => {}
                }
            }
            if self.cancel.is_cancelled() {
                break;
            }
            self.attempt_head().await;
        }

        self.incoming.close();
        let mut remaining = self.pending.len();
        while self.incoming.try_recv().is_ok() {
            remaining += 1;
        }
        if remaining > 0 {
            warn!(remaining, "upload worker stopped with bundles still pending");
        } else {
            debug!("upload worker stopped");
        }
    }

    async fn attempt_head(&mut self) {
        let Some(entry) = self.pending.front_mut() else {
            return;
        };
        entry.attempt += 1;
        let bundle_id = entry.bundle.id;

        let result = self.service.submit_capture(&entry.bundle).await;
        match result {
            Ok(receipt) => {
                let attempts = entry.attempt;
                self.pending.pop_front();
                info!(%bundle_id, attempts, record_id = ?receipt.id, "capture uploaded");
                self.publish(UploadEvent::Uploaded {
                    bundle_id,
                    attempts,
                    receipt,
                });
                self.decrement_backlog();
            }
            Err(e) if e.is_transient() => {
                entry.next_retry_at = Some(Instant::now() + self.retry_delay);
                let attempt = entry.attempt;
                warn!(
                    %bundle_id,
                    attempt,
                    delay_secs = self.retry_delay.as_secs(),
                    error = %e,
                    "capture upload failed, will retry"
                );
                self.publish(UploadEvent::RetryScheduled {
                    bundle_id,
                    attempt,
                    delay: self.retry_delay,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                self.pending.pop_front();
                warn!(%bundle_id, error = %e, "capture rejected, dropping bundle");
                self.publish(UploadEvent::Rejected {
                    bundle_id,
                    reason: e.to_string(),
                });
                self.decrement_backlog();
            }
        }
    }

    fn decrement_backlog(&self) {
        self.backlog.send_modify(|n| *n = n.saturating_sub(1));
    }

    fn publish(&self, event: UploadEvent) {
        let _ = self.events.send(event);
    }
}
