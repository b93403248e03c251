// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan-driven dispatch for the BoxBuddy label scanner.
//!
//! This crate provides:
//! - [`CooldownFilter`]: per-payload suppression of repeated decodes
//! - [`IdentifierExtractor`]: recognizes our short links and bare ids
//! - [`PlacementChain`]: the two-scan item-into-container protocol
//! - [`ScanSession`]: routes decodes by mode and owns the session state

pub mod cooldown;
pub mod identifier;
pub mod place_in;
pub mod session;

pub use cooldown::CooldownFilter;
pub use identifier::IdentifierExtractor;
pub use place_in::{ChainState, ChainStep, PlacementChain};
pub use session::{IgnoreReason, ScanOutcome, ScanSession, ScanStatus};
