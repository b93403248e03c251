// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `boxbuddy scan` command implementation.
//!
//! Reads one decoded payload per line from stdin, as a wedge scanner or a
//! decoder pipe would deliver them, and prints what each one did. A line of
//! the form `:mode view` or `:mode place-in` switches the session mode.

use std::sync::Arc;

use boxbuddy_client::HttpInventoryClient;
use boxbuddy_config::model::BoxbuddyConfig;
use boxbuddy_core::{BoxbuddyError, DecodeEvent, NavigationIntent, ScanMode};
use boxbuddy_scan::{IgnoreReason, ScanOutcome, ScanSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::feedback::TerminalFeedback;
use crate::shutdown::install_signal_handler;

const MODE_COMMAND: &str = ":mode";

pub async fn run_scan(config: &BoxbuddyConfig, mode: ScanMode) -> Result<(), BoxbuddyError> {
    let service = Arc::new(HttpInventoryClient::from_config(config)?);
    let session = ScanSession::from_config(&config.scan, service, Arc::new(TerminalFeedback))?;
    session.set_mode(mode).await;
    info!(mode = %mode, base_url = %config.service.base_url, "scan session ready");

    let cancel = install_signal_handler();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => line
                .map_err(|e| BoxbuddyError::Internal(format!("failed to read stdin: {e}")))?,
        };
        let Some(line) = line else {
            break;
        };
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }

        if let Some(requested) = payload.strip_prefix(MODE_COMMAND) {
            match requested.trim().parse::<ScanMode>() {
                Ok(mode) => {
                    session.set_mode(mode).await;
                    println!("mode: {mode}");
                }
                Err(_) => eprintln!("unknown mode `{}` (use view or place-in)", requested.trim()),
            }
            continue;
        }

        let outcome = session.on_event(&DecodeEvent::now(payload)).await;
        if let Some(line) = describe(&outcome) {
            println!("{line}");
        }
    }

    cancel.cancel();
    Ok(())
}

/// One line of output per outcome; suppressed repeats print nothing.
fn describe(outcome: &ScanOutcome) -> Option<String> {
    let line = match outcome {
        ScanOutcome::Suppressed => return None,
        ScanOutcome::Ignored(IgnoreReason::NotOurs) => "ignored: not one of our labels".to_string(),
        ScanOutcome::Ignored(IgnoreReason::NotFound) => "ignored: no record for label".to_string(),
        ScanOutcome::Navigate(NavigationIntent::Detail { id }) => format!("open {id}"),
        ScanOutcome::Navigate(NavigationIntent::Create { prefill_id }) => {
            format!("create {prefill_id}")
        }
        ScanOutcome::Holding(item) => format!("holding {} ({})", item.name, item.id),
        ScanOutcome::Stored { item, container } => {
            format!("stored {} in {}, holding {}", item.name, container.name, container.name)
        }
        ScanOutcome::Discarded => "discarded: mode changed".to_string(),
        ScanOutcome::Failed { notice } => format!("failed: {notice}"),
    };
    Some(line)
}
