// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the seams of the scan and capture pipelines.
//!
//! Network-facing collaborators use `#[async_trait]` so they can be held as
//! `Arc<dyn ...>` by the session and the upload worker.

pub mod feedback;
pub mod inventory;
pub mod recorder;

pub use feedback::{FeedbackCue, ScanFeedback, SilentFeedback};
pub use inventory::InventoryService;
pub use recorder::AudioRecorder;
