// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the scan and capture pipelines.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// A raw payload surfaced by the camera-based symbol reader.
///
/// The decoder emits one event per recognized frame, so the same payload
/// arrives many times per second while a label stays in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    pub payload: String,
    pub observed_at: std::time::Instant,
}

impl DecodeEvent {
    /// Creates an event observed now.
    pub fn now(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            observed_at: std::time::Instant::now(),
        }
    }
}

/// Operating mode of a scanning session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Scan to open (or create) the record behind a label.
    #[default]
    View,
    /// Scan an item, then a container, to place one inside the other.
    PlaceIn,
}

/// Reference to an item record as seen by the scanning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
    pub is_container: bool,
}

/// Item record as returned by `GET /items/{id}`.
///
/// The service names the identifier `uuid` and marks containers either with
/// an explicit `isContainer` flag or with a `type` of `CONTAINER`/`LOCATION`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "isContainer")]
    pub is_container: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Identifier of the container currently holding this item.
    #[serde(default, rename = "locationEntityUUID")]
    pub location_id: Option<String>,
}

impl From<ItemRecord> for ItemRef {
    fn from(record: ItemRecord) -> Self {
        let is_container = record.is_container.unwrap_or_else(|| {
            record.kind.as_deref().is_some_and(|kind| {
                kind.eq_ignore_ascii_case("container") || kind.eq_ignore_ascii_case("location")
            })
        });
        Self {
            id: record.id,
            name: record.name,
            is_container,
        }
    }
}

/// Opaque reference to an already-captured image resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoRef(pub String);

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One voice note plus its attached photos, ready for upload.
///
/// Immutable once handed to the upload queue.
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureBundle {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub audio: Vec<u8>,
    pub photos: Vec<PhotoRef>,
    /// Free-form draft fields (name, description, quantity, container, ...).
    pub metadata: BTreeMap<String, String>,
}

impl fmt::Debug for CaptureBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBundle")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("audio_bytes", &self.audio.len())
            .field("photos", &self.photos)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Response body of an accepted `POST /captures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaptureReceipt {
    /// Identifier of the record created from the capture, when reported.
    #[serde(default, alias = "uuid")]
    pub id: Option<String>,
}

/// Navigation request surfaced to the UI by the view handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Open the detail view of an existing record.
    Detail { id: String },
    /// Open the create form pre-filled with a not-yet-registered identifier.
    Create { prefill_id: String },
}
