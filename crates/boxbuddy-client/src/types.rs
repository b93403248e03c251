// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for inventory service error bodies.

use serde::Deserialize;

/// Error body returned by the service on rejected requests.
///
/// The API is not consistent about the field name, so every known spelling
/// is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable message, if any field was present.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).or(self.detail)
    }
}

/// Extract a message from an error response body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| body.trim().to_string())
}
