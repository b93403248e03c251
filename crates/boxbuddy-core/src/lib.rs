// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the BoxBuddy scan and capture pipeline.
//!
//! This crate provides the error taxonomy, shared domain types, and the
//! collaborator traits (remote service, recorder, feedback) that the scan
//! session and the capture pipeline are built against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BoxbuddyError;
pub use types::{
    CaptureBundle, CaptureReceipt, DecodeEvent, ItemRecord, ItemRef, NavigationIntent, PhotoRef,
    ScanMode,
};

pub use traits::{AudioRecorder, FeedbackCue, InventoryService, ScanFeedback, SilentFeedback};
