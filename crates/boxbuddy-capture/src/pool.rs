// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pool of captured photos not yet attached to any bundle.
//!
//! The composer is the only writer that takes photos out of the pool.
//! Other views (a gallery, a photo picker) observe changes through
//! [`PhotoPool::subscribe`] instead of reading shared state behind the
//! composer's back.

use boxbuddy_core::{BoxbuddyError, PhotoRef};
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// A change to the available photo pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A freshly captured photo became available.
    Added(PhotoRef),
    /// A photo was attached to a draft.
    Taken(PhotoRef),
    /// A discarded draft handed the photo back.
    Returned(PhotoRef),
}

/// Ordered set of photos available for attachment.
pub struct PhotoPool {
    available: Mutex<Vec<PhotoRef>>,
    events: broadcast::Sender<PoolEvent>,
}

impl Default for PhotoPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoPool {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            available: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Adds a photo. Returns false if it was already in the pool.
    pub async fn add(&self, photo: PhotoRef) -> bool {
        let mut available = self.available.lock().await;
        if available.contains(&photo) {
            return false;
        }
        available.push(photo.clone());
        self.publish(PoolEvent::Added(photo));
        true
    }

    /// Removes `photo` from the pool for attachment to a draft.
    pub async fn take(&self, photo: &PhotoRef) -> Result<(), BoxbuddyError> {
        let mut available = self.available.lock().await;
        let Some(index) = available.iter().position(|p| p == photo) else {
            return Err(BoxbuddyError::PhotoUnavailable {
                photo_id: photo.to_string(),
            });
        };
        available.remove(index);
        self.publish(PoolEvent::Taken(photo.clone()));
        Ok(())
    }

    /// Puts photos back at the end of the pool, in the given order.
    pub async fn give_back(&self, photos: Vec<PhotoRef>) {
        let mut available = self.available.lock().await;
        for photo in photos {
            if available.contains(&photo) {
                continue;
            }
            available.push(photo.clone());
            self.publish(PoolEvent::Returned(photo));
        }
    }

    /// Snapshot of the available photos, oldest first.
    pub async fn available(&self) -> Vec<PhotoRef> {
        self.available.lock().await.clone()
    }

    pub async fn contains(&self, photo: &PhotoRef) -> bool {
        self.available.lock().await.contains(photo)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: PoolEvent) {
        // No subscribers is fine.
        if self.events.send(event).is_err() {
            debug!("photo pool change with no observers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> PhotoRef {
        PhotoRef::from(id)
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let pool = PhotoPool::new();
        assert!(pool.add(photo("p1")).await);
        assert!(!pool.add(photo("p1")).await);
        assert_eq!(pool.available().await, vec![photo("p1")]);
    }

    #[tokio::test]
    async fn take_removes_and_second_take_fails() {
        let pool = PhotoPool::new();
        pool.add(photo("p1")).await;
        pool.add(photo("p2")).await;

        pool.take(&photo("p1")).await.unwrap();
        assert_eq!(pool.available().await, vec![photo("p2")]);

        let err = pool.take(&photo("p1")).await.unwrap_err();
        assert!(matches!(err, BoxbuddyError::PhotoUnavailable { photo_id } if photo_id == "p1"));
    }

    #[tokio::test]
    async fn give_back_appends_in_order_without_duplicates() {
        let pool = PhotoPool::new();
        pool.add(photo("p3")).await;
        pool.give_back(vec![photo("p1"), photo("p3"), photo("p2")]).await;
        assert_eq!(
            pool.available().await,
            vec![photo("p3"), photo("p1"), photo("p2")]
        );
    }

    #[tokio::test]
    async fn observers_see_every_change() {
        let pool = PhotoPool::new();
        let mut events = pool.subscribe();

        pool.add(photo("p1")).await;
        pool.take(&photo("p1")).await.unwrap();
        pool.give_back(vec![photo("p1")]).await;

        assert_eq!(events.recv().await.unwrap(), PoolEvent::Added(photo("p1")));
        assert_eq!(events.recv().await.unwrap(), PoolEvent::Taken(photo("p1")));
        assert_eq!(events.recv().await.unwrap(), PoolEvent::Returned(photo("p1")));
    }
}
