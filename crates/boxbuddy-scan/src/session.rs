// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan mode routing for one active scanning session.
//!
//! [`ScanSession`] owns the mode, the place-in chain, and the cooldown
//! filter. Every decode goes through the cooldown first (in arrival order),
//! fires one feedback cue, and is then handled by the view or place-in
//! handler. Handling is serialized: a decode waits for the previous one to
//! finish, so a place-in transition is never interleaved with another.
//!
//! Mode switches do not cancel in-flight lookups. Each switch bumps a
//! generation counter instead, and a handler whose generation is no longer
//! current drops its result ([`ScanOutcome::Discarded`]).

use std::sync::Arc;

use boxbuddy_config::model::ScanConfig;
use boxbuddy_core::{
    BoxbuddyError, DecodeEvent, FeedbackCue, InventoryService, ItemRef, NavigationIntent,
    ScanFeedback, ScanMode,
};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cooldown::CooldownFilter;
use crate::identifier::IdentifierExtractor;
use crate::place_in::{ChainStep, PlacementChain};

/// Why a decode was dropped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The payload is not one of our labels.
    NotOurs,
    /// The identifier has no record (place-in mode only).
    NotFound,
}

/// Result of handling one decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Same payload seen within its cooldown window.
    Suppressed,
    Ignored(IgnoreReason),
    /// View mode resolved the label.
    Navigate(NavigationIntent),
    /// Place-in mode now holds this record.
    Holding(ItemRef),
    /// `item` was stored into `container`, which is now held.
    Stored { item: ItemRef, container: ItemRef },
    /// The mode changed while the decode was being handled.
    Discarded,
    /// A lookup or store failed; state is unchanged and a notice is shown.
    Failed { notice: String },
}

/// Snapshot for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStatus {
    pub mode: ScanMode,
    pub holding: Option<ItemRef>,
    /// Last single-shot notice (e.g. a failed store), cleared on mode switch.
    pub notice: Option<String>,
}

struct SessionState {
    mode: ScanMode,
    generation: u64,
    chain: PlacementChain,
    notice: Option<String>,
    cooldown: CooldownFilter,
}

/// Routes decoded payloads to the handler for the current mode.
pub struct ScanSession {
    service: Arc<dyn InventoryService>,
    feedback: Arc<dyn ScanFeedback>,
    extractor: IdentifierExtractor,
    state: Mutex<SessionState>,
    /// Held for the whole handling of one decode.
    dispatch: Mutex<()>,
}

impl ScanSession {
    /// Creates a session in [`ScanMode::View`] with an empty chain.
    pub fn new(
        service: Arc<dyn InventoryService>,
        feedback: Arc<dyn ScanFeedback>,
        extractor: IdentifierExtractor,
        cooldown: CooldownFilter,
    ) -> Self {
        Self {
            service,
            feedback,
            extractor,
            state: Mutex::new(SessionState {
                mode: ScanMode::View,
                generation: 0,
                chain: PlacementChain::new(),
                notice: None,
                cooldown,
            }),
            dispatch: Mutex::new(()),
        }
    }

    /// Creates a session from the `[scan]` config section.
    pub fn from_config(
        config: &ScanConfig,
        service: Arc<dyn InventoryService>,
        feedback: Arc<dyn ScanFeedback>,
    ) -> Result<Self, BoxbuddyError> {
        let extractor = IdentifierExtractor::new(&config.short_link_host)
            .map_err(|e| BoxbuddyError::Config(format!("invalid scan.short_link_host: {e}")))?;
        let cooldown = CooldownFilter::new(config.cooldown(), config.cooldown_grace());
        Ok(Self::new(service, feedback, extractor, cooldown))
    }

    pub async fn mode(&self) -> ScanMode {
        self.state.lock().await.mode
    }

    pub async fn status(&self) -> ScanStatus {
        let state = self.state.lock().await;
        ScanStatus {
            mode: state.mode,
            holding: state.chain.holding().cloned(),
            notice: state.notice.clone(),
        }
    }

    /// Switches mode, clearing the place-in chain and any notice.
    ///
    /// Returns false if the session was already in `mode`.
    pub async fn set_mode(&self, mode: ScanMode) -> bool {
        let mut state = self.state.lock().await;
        if state.mode == mode {
            return false;
        }
        state.mode = mode;
        state.generation += 1;
        state.chain.clear();
        state.notice = None;
        info!(mode = %mode, "scan mode switched");
        true
    }

    /// Handles one event from the decoder, using its observation time for
    /// the cooldown.
    pub async fn on_event(&self, event: &DecodeEvent) -> ScanOutcome {
        self.dispatch(&event.payload, Instant::from_std(event.observed_at))
            .await
    }

    /// Handles one decoded payload observed now.
    pub async fn on_decoded(&self, payload: &str) -> ScanOutcome {
        self.dispatch(payload, Instant::now()).await
    }

    async fn dispatch(&self, payload: &str, observed_at: Instant) -> ScanOutcome {
        let (mode, generation) = {
            let mut state = self.state.lock().await;
            if !state.cooldown.should_dispatch(payload, observed_at) {
                return ScanOutcome::Suppressed;
            }
            (state.mode, state.generation)
        };
        self.feedback.cue(FeedbackCue::default());

        let _dispatch = self.dispatch.lock().await;
        if !self.is_current(generation).await {
            debug!(payload, "decode queued across a mode switch, dropped");
            return ScanOutcome::Discarded;
        }

        match mode {
            ScanMode::View => self.handle_view(payload, generation).await,
            ScanMode::PlaceIn => self.handle_place_in(payload, generation).await,
        }
    }

    async fn handle_view(&self, payload: &str, generation: u64) -> ScanOutcome {
        let Some(id) = self.extractor.extract(payload) else {
            debug!(payload, "not one of our labels");
            return ScanOutcome::Ignored(IgnoreReason::NotOurs);
        };

        let intent = match self.service.get_item(id).await {
            Ok(item) => NavigationIntent::Detail { id: item.id },
            Err(BoxbuddyError::NotFound { .. }) => {
                debug!(item_id = id, "no record yet, offering create");
                NavigationIntent::Create {
                    prefill_id: id.to_string(),
                }
            }
            Err(e) => return self.fail(generation, e).await,
        };

        if !self.is_current(generation).await {
            return ScanOutcome::Discarded;
        }
        ScanOutcome::Navigate(intent)
    }

    async fn handle_place_in(&self, payload: &str, generation: u64) -> ScanOutcome {
        let Some(id) = self.extractor.extract(payload) else {
            debug!(payload, "not one of our labels");
            return ScanOutcome::Ignored(IgnoreReason::NotOurs);
        };

        let scanned = match self.service.get_item(id).await {
            Ok(item) => item,
            Err(BoxbuddyError::NotFound { .. }) => {
                debug!(item_id = id, "place-in scan has no record, ignored");
                return ScanOutcome::Ignored(IgnoreReason::NotFound);
            }
            Err(e) => return self.fail(generation, e).await,
        };

        let step = {
            let state = self.state.lock().await;
            if state.generation != generation {
                return ScanOutcome::Discarded;
            }
            state.chain.plan(scanned)
        };

        match step {
            ChainStep::Hold(item) => {
                let mut state = self.state.lock().await;
                if state.generation != generation {
                    return ScanOutcome::Discarded;
                }
                debug!(item_id = item.id.as_str(), "holding");
                state.chain.hold(item.clone());
                ScanOutcome::Holding(item)
            }
            ChainStep::Store { item, container } => {
                if let Err(e) = self.service.store_item(&item.id, &container.id).await {
                    return self.fail(generation, e).await;
                }
                info!(
                    item_id = item.id.as_str(),
                    container_id = container.id.as_str(),
                    "item stored into container"
                );

                let mut state = self.state.lock().await;
                if state.generation != generation {
                    return ScanOutcome::Discarded;
                }
                state.chain.hold(container.clone());
                ScanOutcome::Stored { item, container }
            }
        }
    }

    async fn fail(&self, generation: u64, error: BoxbuddyError) -> ScanOutcome {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return ScanOutcome::Discarded;
        }
        warn!(error = %error, mode = %state.mode, "scan handling failed");
        let notice = error.to_string();
        state.notice = Some(notice.clone());
        ScanOutcome::Failed { notice }
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.state.lock().await.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxbuddy_test_utils::{container, item, CountingFeedback, MockInventory};
    use std::time::Duration;
    use tracing_test::traced_test;

    async fn session_with(items: Vec<ItemRef>) -> ScanSession {
        let service = Arc::new(MockInventory::with_items(items).await);
        ScanSession::new(
            service,
            Arc::new(CountingFeedback::new()),
            IdentifierExtractor::new("c0h.de").unwrap(),
            CooldownFilter::new(Duration::from_secs(5), Duration::from_secs(5)),
        )
    }

    #[tokio::test]
    async fn starts_in_view_mode_with_empty_status() {
        let session = session_with(vec![]).await;
        assert_eq!(
            session.status().await,
            ScanStatus {
                mode: ScanMode::View,
                holding: None,
                notice: None,
            }
        );
    }

    #[tokio::test]
    async fn decoder_events_route_like_payloads() {
        let session = session_with(vec![item("a-1", "Drill")]).await;
        let outcome = session.on_event(&DecodeEvent::now("c0h.de/a-1")).await;
        assert_eq!(
            outcome,
            ScanOutcome::Navigate(NavigationIntent::Detail { id: "a-1".into() })
        );
    }

    #[tokio::test]
    async fn mode_switch_bumps_generation_once() {
        let session = session_with(vec![]).await;
        assert!(session.set_mode(ScanMode::PlaceIn).await);
        assert!(!session.set_mode(ScanMode::PlaceIn).await);
        assert_eq!(session.state.lock().await.generation, 1);
        assert!(!session.is_current(0).await);
        assert!(session.is_current(1).await);
    }

    #[tokio::test]
    async fn from_config_defaults_to_view_mode() {
        let service = Arc::new(MockInventory::new());
        let session =
            ScanSession::from_config(&ScanConfig::default(), service, Arc::new(CountingFeedback::new()))
                .unwrap();
        assert_eq!(session.mode().await, ScanMode::View);
    }

    #[tokio::test]
    #[traced_test]
    async fn store_is_logged() {
        let session = session_with(vec![item("a-1", "Drill"), container("c-1", "Box")]).await;
        session.set_mode(ScanMode::PlaceIn).await;

        session.on_decoded("c0h.de/a-1").await;
        let outcome = session.on_decoded("c0h.de/c-1").await;

        assert!(matches!(outcome, ScanOutcome::Stored { .. }));
        assert!(logs_contain("item stored into container"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_notice_is_cleared_by_mode_switch() {
        let service = Arc::new(MockInventory::new());
        service
            .fail_next_lookup(boxbuddy_test_utils::MockFailure::Transient)
            .await;
        let session = ScanSession::new(
            service,
            Arc::new(CountingFeedback::new()),
            IdentifierExtractor::new("c0h.de").unwrap(),
            CooldownFilter::default(),
        );

        let outcome = session.on_decoded("c0h.de/abc-123").await;
        assert!(matches!(outcome, ScanOutcome::Failed { .. }));
        assert!(logs_contain("scan handling failed"));
        assert!(session.status().await.notice.is_some());

        session.set_mode(ScanMode::PlaceIn).await;
        assert!(session.status().await.notice.is_none());
    }
}
