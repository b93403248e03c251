// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the BoxBuddy pipeline.
//!
//! Provides deterministic collaborators:
//! - [`MockInventory`]: scripted inventory service that records every call
//! - [`MockRecorder`]: in-memory audio recorder
//! - [`CountingFeedback`]: counts feedback cues

pub mod mock_feedback;
pub mod mock_inventory;
pub mod mock_recorder;

pub use mock_feedback::CountingFeedback;
pub use mock_inventory::{MockFailure, MockInventory};
pub use mock_recorder::MockRecorder;

use boxbuddy_core::ItemRef;

/// A plain (non-container) item fixture.
pub fn item(id: &str, name: &str) -> ItemRef {
    ItemRef {
        id: id.to_string(),
        name: name.to_string(),
        is_container: false,
    }
}

/// A container fixture.
pub fn container(id: &str, name: &str) -> ItemRef {
    ItemRef {
        id: id.to_string(),
        name: name.to_string(),
        is_container: true,
    }
}
