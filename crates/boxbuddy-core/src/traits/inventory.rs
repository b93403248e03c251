// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote inventory service contract.

use async_trait::async_trait;

use crate::error::BoxbuddyError;
use crate::types::{CaptureBundle, CaptureReceipt, ItemRef};

/// The remote inventory service consumed by the scan and capture pipelines.
///
/// Implementations must map failures onto the shared taxonomy: a lookup miss
/// is [`BoxbuddyError::NotFound`], a rejected write is
/// [`BoxbuddyError::Validation`], and anything worth retrying is
/// [`BoxbuddyError::Transient`].
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// `GET /items/{id}`.
    async fn get_item(&self, id: &str) -> Result<ItemRef, BoxbuddyError>;

    /// `POST /items/{item_id}/store/{container_id}`: re-parents the item.
    async fn store_item(&self, item_id: &str, container_id: &str) -> Result<(), BoxbuddyError>;

    /// `POST /captures`: submits audio, metadata, and photo references.
    async fn submit_capture(&self, bundle: &CaptureBundle) -> Result<CaptureReceipt, BoxbuddyError>;

    /// `POST /gallery/image/{photo_id}/assign/{item_id}`.
    async fn assign_photo(&self, photo_id: &str, item_id: &str) -> Result<(), BoxbuddyError>;
}
