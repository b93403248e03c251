// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter for the BoxBuddy inventory service.
//!
//! [`HttpInventoryClient`] implements [`boxbuddy_core::InventoryService`]
//! over the REST API and maps HTTP outcomes onto the shared error taxonomy.

pub mod client;
pub mod types;

pub use client::HttpInventoryClient;
