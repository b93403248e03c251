// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-payload cooldown for a continuously decoding camera.
//!
//! A code that stays in frame is decoded many times per second. The filter
//! lets the first decode through and suppresses the same payload until its
//! cooldown expires. Expired entries are swept on every call, so no timer
//! is needed.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Default suppression window.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Default time an expired entry lingers before it is purged.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Window and grace are clamped to this so expiry arithmetic cannot overflow.
pub const MAX_WINDOW: Duration = Duration::from_secs(86_400);

/// Suppresses repeated dispatch of the same payload within a window.
///
/// Holds at most one entry per distinct payload.
#[derive(Debug, Clone)]
pub struct CooldownFilter {
    window: Duration,
    grace: Duration,
    expires_at: HashMap<String, Instant>,
}

impl Default for CooldownFilter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DEFAULT_GRACE)
    }
}

impl CooldownFilter {
    pub fn new(window: Duration, grace: Duration) -> Self {
        Self {
            window: window.min(MAX_WINDOW),
            grace: grace.min(MAX_WINDOW),
            expires_at: HashMap::new(),
        }
    }

    /// Returns true if `payload` should be dispatched at `now`.
    ///
    /// An accepted payload is suppressed until `now + window`. Suppressed
    /// calls have no side effect besides the sweep.
    pub fn should_dispatch(&mut self, payload: &str, now: Instant) -> bool {
        self.sweep(now);

        if let Some(expires_at) = self.expires_at.get(payload)
            && now < *expires_at
        {
            return false;
        }

        self.expires_at.insert(payload.to_string(), now + self.window);
        true
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.expires_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expires_at.is_empty()
    }

    fn sweep(&mut self, now: Instant) {
        let grace = self.grace;
        self.expires_at
            .retain(|_, expires_at| now <= *expires_at + grace);
    }
}
