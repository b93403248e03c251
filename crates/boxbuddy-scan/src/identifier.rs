// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of item identifiers from decoded label payloads.
//!
//! Printed labels encode `<host>/<id>?c=<code>`; older labels and
//! hand-typed codes carry the bare id. Anything else is not ours.

use regex::Regex;

/// Canonical 8-4-4-4-12 hex identifier, matched against the whole payload.
const RAW_ID_PATTERN: &str =
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// Pulls a stable identifier out of a decoded payload.
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    short_link: Regex,
    raw_id: Regex,
}

impl IdentifierExtractor {
    /// Builds an extractor for short links on `host` (e.g. `c0h.de`).
    pub fn new(host: &str) -> Result<Self, regex::Error> {
        let short_link = Regex::new(&format!(r"(?i){}/([0-9a-f-]+)", regex::escape(host)))?;
        let raw_id = Regex::new(RAW_ID_PATTERN)?;
        Ok(Self { short_link, raw_id })
    }

    /// Returns the identifier embedded in `payload`, or `None` if the payload
    /// is not one of our labels.
    pub fn extract<'a>(&self, payload: &'a str) -> Option<&'a str> {
        if let Some(captures) = self.short_link.captures(payload) {
            return captures.get(1).map(|m| m.as_str());
        }
        let trimmed = payload.trim();
        self.raw_id.is_match(trimmed).then_some(trimmed)
    }
}
