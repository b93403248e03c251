// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rapid capture pipeline for BoxBuddy.
//!
//! - [`CaptureComposer`] records segments and freezes them into bundles
//! - [`PhotoPool`] holds captured photos not yet attached to a bundle
//! - [`UploadQueue`] uploads bundles in creation order in the background

pub mod composer;
pub mod pool;
pub mod queue;

pub use composer::{CaptureComposer, DEFAULT_MAX_RECORDING};
pub use pool::{PhotoPool, PoolEvent};
pub use queue::{MAX_RETRY_DELAY, UploadEvent, UploadQueue, UploadQueueEntry};
