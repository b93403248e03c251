// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inventory service for deterministic testing.
//!
//! `MockInventory` implements `InventoryService` over an in-memory item map
//! with scripted failures, and records every call so tests can assert on
//! command order without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use boxbuddy_core::{BoxbuddyError, CaptureBundle, CaptureReceipt, InventoryService, ItemRef};
use tokio::sync::{Mutex, Notify};
use tracing::debug;

/// A failure the mock can be scripted to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Transient,
    Validation(String),
    NotFound,
}

impl MockFailure {
    fn into_error(self, id: &str) -> BoxbuddyError {
        match self {
            MockFailure::Transient => BoxbuddyError::transient("connection reset by peer"),
            MockFailure::Validation(message) => BoxbuddyError::Validation { message },
            MockFailure::NotFound => BoxbuddyError::NotFound { id: id.to_string() },
        }
    }
}

/// A scripted, call-recording inventory service.
///
/// Items not registered with [`MockInventory::add_item`] are `NotFound`.
/// Scripted failures are consumed in FIFO order; once a script is empty the
/// call succeeds.
#[derive(Default)]
pub struct MockInventory {
    items: Mutex<HashMap<String, ItemRef>>,
    lookup_failures: Mutex<VecDeque<MockFailure>>,
    store_failures: Mutex<VecDeque<MockFailure>>,
    submit_failures: Mutex<VecDeque<Option<MockFailure>>>,
    lookups: Mutex<Vec<String>>,
    stores: Mutex<Vec<(String, String)>>,
    submissions: Mutex<Vec<CaptureBundle>>,
    assignments: Mutex<Vec<(String, String)>>,
    lookup_gate: Mutex<Option<Arc<Notify>>>,
    lookup_started: Notify,
    store_gate: Mutex<Option<Arc<Notify>>>,
    store_started: Notify,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock pre-loaded with `items`.
    pub async fn with_items(items: impl IntoIterator<Item = ItemRef>) -> Self {
        let mock = Self::new();
        for item in items {
            mock.add_item(item).await;
        }
        mock
    }

    pub async fn add_item(&self, item: ItemRef) {
        self.items.lock().await.insert(item.id.clone(), item);
    }

    /// The next lookup fails with `failure`.
    pub async fn fail_next_lookup(&self, failure: MockFailure) {
        self.lookup_failures.lock().await.push_back(failure);
    }

    /// The next store command fails with `failure`.
    pub async fn fail_next_store(&self, failure: MockFailure) {
        self.store_failures.lock().await.push_back(failure);
    }

    /// Appends upload attempt results: `None` accepts, `Some` fails.
    pub async fn script_submissions(&self, results: impl IntoIterator<Item = Option<MockFailure>>) {
        self.submit_failures.lock().await.extend(results);
    }

    /// Makes lookups block until the returned gate is notified.
    pub async fn pause_lookups(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.lookup_gate.lock().await = Some(gate.clone());
        gate
    }

    /// Resolves once a lookup has started (and is possibly paused).
    pub async fn lookup_started(&self) {
        self.lookup_started.notified().await;
    }

    /// Makes store commands block until the returned gate is notified.
    pub async fn pause_stores(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.store_gate.lock().await = Some(gate.clone());
        gate
    }

    pub async fn store_started(&self) {
        self.store_started.notified().await;
    }

    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.lock().await.clone()
    }

    /// `(item_id, container_id)` of every successful store command.
    pub async fn stores(&self) -> Vec<(String, String)> {
        self.stores.lock().await.clone()
    }

    /// Every upload attempt, successful or not, in call order.
    pub async fn submissions(&self) -> Vec<CaptureBundle> {
        self.submissions.lock().await.clone()
    }

    /// Value of metadata field `key` for every upload attempt, in call order.
    pub async fn submitted_field(&self, key: &str) -> Vec<String> {
        self.submissions
            .lock()
            .await
            .iter()
            .map(|b| b.metadata.get(key).cloned().unwrap_or_default())
            .collect()
    }

    pub async fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.lock().await.clone()
    }
}

#[async_trait]
impl InventoryService for MockInventory {
    async fn get_item(&self, id: &str) -> Result<ItemRef, BoxbuddyError> {
        self.lookups.lock().await.push(id.to_string());
        self.lookup_started.notify_one();

        let gate = self.lookup_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(failure) = self.lookup_failures.lock().await.pop_front() {
            debug!(item_id = id, ?failure, "scripted lookup failure");
            return Err(failure.into_error(id));
        }
        self.items
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| BoxbuddyError::NotFound { id: id.to_string() })
    }

    async fn store_item(&self, item_id: &str, container_id: &str) -> Result<(), BoxbuddyError> {
        self.store_started.notify_one();
        let gate = self.store_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(failure) = self.store_failures.lock().await.pop_front() {
            debug!(item_id, container_id, ?failure, "scripted store failure");
            return Err(failure.into_error(container_id));
        }
        self.stores
            .lock()
            .await
            .push((item_id.to_string(), container_id.to_string()));
        Ok(())
    }

    async fn submit_capture(&self, bundle: &CaptureBundle) -> Result<CaptureReceipt, BoxbuddyError> {
        self.submissions.lock().await.push(bundle.clone());
        match self.submit_failures.lock().await.pop_front().flatten() {
            Some(failure) => Err(failure.into_error(&bundle.id.to_string())),
            None => Ok(CaptureReceipt {
                id: Some(bundle.id.to_string()),
            }),
        }
    }

    async fn assign_photo(&self, photo_id: &str, item_id: &str) -> Result<(), BoxbuddyError> {
        self.assignments
            .lock()
            .await
            .push((photo_id.to_string(), item_id.to_string()));
        Ok(())
    }
}
