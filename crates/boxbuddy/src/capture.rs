// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `boxbuddy capture` command implementation.
//!
//! Composes a single bundle from an audio file, the given photos and draft
//! fields, then stays around until the upload queue has drained. Transient
//! failures are retried until the upload succeeds or the user interrupts.

use std::path::PathBuf;
use std::sync::Arc;

use boxbuddy_capture::{CaptureComposer, PhotoPool, UploadEvent, UploadQueue};
use boxbuddy_client::HttpInventoryClient;
use boxbuddy_config::model::BoxbuddyConfig;
use boxbuddy_core::{BoxbuddyError, PhotoRef};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::recorder::FileRecorder;
use crate::shutdown::install_signal_handler;

pub async fn run_capture(
    config: &BoxbuddyConfig,
    audio: PathBuf,
    photos: Vec<String>,
    fields: Vec<(String, String)>,
) -> Result<(), BoxbuddyError> {
    let service = Arc::new(HttpInventoryClient::from_config(config)?);
    let cancel = install_signal_handler();
    let (queue, worker) = UploadQueue::from_config(&config.capture, service, cancel.clone());
    let mut events = queue.subscribe();

    let pool = Arc::new(PhotoPool::new());
    for photo in &photos {
        pool.add(PhotoRef::from(photo.as_str())).await;
    }
    let mut composer = CaptureComposer::from_config(
        &config.capture,
        Arc::new(FileRecorder::new(audio)),
        pool,
        queue.clone(),
    );

    composer.begin_segment().await?;
    if let Err(e) = fill_draft(&mut composer, photos, fields).await {
        composer.discard().await;
        return Err(e);
    }
    let bundle = composer.end_segment().await?;
    println!(
        "bundle {} queued ({} photo(s), {} audio bytes)",
        bundle.id,
        bundle.photos.len(),
        bundle.audio.len()
    );

    let mut rejected = None;
    let mut backlog = queue.watch_backlog();
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(event) => report(&event, &mut rejected),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed upload events"),
                Err(RecvError::Closed) => break,
            },
            drained = backlog.wait_for(|n| *n == 0) => {
                if drained.is_err() {
                    warn!("upload worker exited early");
                }
                break;
            }
        }
    }
    while let Ok(event) = events.try_recv() {
        report(&event, &mut rejected);
    }

    let pending = queue.backlog();
    cancel.cancel();
    if let Err(e) = worker.await {
        warn!(error = %e, "upload worker panicked");
    }

    if let Some(message) = rejected {
        return Err(BoxbuddyError::Validation { message });
    }
    if pending > 0 {
        return Err(BoxbuddyError::transient(format!(
            "interrupted with {pending} bundle(s) not uploaded"
        )));
    }
    Ok(())
}

async fn fill_draft(
    composer: &mut CaptureComposer,
    photos: Vec<String>,
    fields: Vec<(String, String)>,
) -> Result<(), BoxbuddyError> {
    for (key, value) in fields {
        composer.set_field(key, value)?;
    }
    for photo in photos {
        composer.attach_photo(PhotoRef(photo)).await?;
    }
    Ok(())
}

fn report(event: &UploadEvent, rejected: &mut Option<String>) {
    match event {
        UploadEvent::Uploaded {
            bundle_id,
            attempts,
            receipt,
        } => match &receipt.id {
            Some(record) => println!("bundle {bundle_id} uploaded as {record} ({attempts} attempt(s))"),
            None => println!("bundle {bundle_id} uploaded ({attempts} attempt(s))"),
        },
        UploadEvent::RetryScheduled {
            bundle_id,
            attempt,
            delay,
            reason,
        } => eprintln!(
            "bundle {bundle_id}: attempt {attempt} failed ({reason}), retrying in {}s",
            delay.as_secs()
        ),
        UploadEvent::Rejected { bundle_id, reason } => {
            eprintln!("bundle {bundle_id} rejected: {reason}");
            *rejected = Some(reason.clone());
        }
    }
}
