// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the inventory REST API.
//!
//! Provides [`HttpInventoryClient`] which handles URL construction, multipart
//! capture uploads, and classification of failures into
//! not-found / validation / transient.

use std::time::Duration;

use async_trait::async_trait;
use boxbuddy_config::BoxbuddyConfig;
use boxbuddy_core::types::ItemRecord;
use boxbuddy_core::{BoxbuddyError, CaptureBundle, CaptureReceipt, InventoryService, ItemRef};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::types::error_message;

/// HTTP client for the inventory service.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: Url,
    audio_mime: String,
}

impl HttpInventoryClient {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration, audio_mime: &str) -> Result<Self, BoxbuddyError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BoxbuddyError::Config(format!("invalid service base URL `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BoxbuddyError::Config(format!(
                "service base URL `{base_url}` cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BoxbuddyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            audio_mime: audio_mime.to_string(),
        })
    }

    /// Creates a client from the `[service]` and `[capture]` config sections.
    pub fn from_config(config: &BoxbuddyConfig) -> Result<Self, BoxbuddyError> {
        Self::new(
            &config.service.base_url,
            config.service.timeout(),
            &config.capture.audio_mime,
        )
    }

    /// Returns the service root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BoxbuddyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BoxbuddyError::Config("service base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_empty(&self, url: Url) -> Result<(), BoxbuddyError> {
        let response = self.client.post(url).send().await.map_err(send_error)?;
        let status = response.status();
        debug!(status = %status, "POST response received");
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }

    fn capture_form(&self, bundle: &CaptureBundle) -> Result<Form, BoxbuddyError> {
        let audio = Part::bytes(bundle.audio.clone())
            .file_name(format!("{}.{}", bundle.id, audio_extension(&self.audio_mime)))
            .mime_str(&self.audio_mime)
            .map_err(|e| BoxbuddyError::Config(format!("invalid audio MIME type: {e}")))?;
        let metadata = serde_json::to_string(&bundle.metadata)
            .map_err(|e| BoxbuddyError::Internal(format!("failed to encode metadata: {e}")))?;
        let photo_ids: Vec<&str> = bundle.photos.iter().map(|p| p.0.as_str()).collect();
        let photo_ids = serde_json::to_string(&photo_ids)
            .map_err(|e| BoxbuddyError::Internal(format!("failed to encode photo ids: {e}")))?;

        Ok(Form::new()
            .text("capture_id", bundle.id.to_string())
            .text("created_at", bundle.created_at.to_rfc3339())
            .text("metadata", metadata)
            .text("photo_ids", photo_ids)
            .part("audio", audio))
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn get_item(&self, id: &str) -> Result<ItemRef, BoxbuddyError> {
        let url = self.endpoint(&["items", id])?;
        let response = self.client.get(url).send().await.map_err(send_error)?;
        let status = response.status();
        debug!(status = %status, item_id = id, "item lookup response received");

        if status == StatusCode::NOT_FOUND {
            return Err(BoxbuddyError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let body = response.text().await.map_err(send_error)?;
        let record: ItemRecord = serde_json::from_str(&body)
            .map_err(|e| BoxbuddyError::Internal(format!("failed to parse item record: {e}")))?;
        Ok(record.into())
    }

    async fn store_item(&self, item_id: &str, container_id: &str) -> Result<(), BoxbuddyError> {
        let url = self.endpoint(&["items", item_id, "store", container_id])?;
        self.post_empty(url).await
    }

    async fn submit_capture(&self, bundle: &CaptureBundle) -> Result<CaptureReceipt, BoxbuddyError> {
        let url = self.endpoint(&["captures"])?;
        let form = self.capture_form(bundle)?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;
        let status = response.status();
        debug!(status = %status, capture_id = %bundle.id, "capture upload response received");

        let body = response.text().await.map_err(send_error)?;
        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(CaptureReceipt::default());
        }
        // An accepted upload whose body we cannot read is still accepted.
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable capture receipt");
            CaptureReceipt::default()
        }))
    }

    async fn assign_photo(&self, photo_id: &str, item_id: &str) -> Result<(), BoxbuddyError> {
        let url = self.endpoint(&["gallery", "image", photo_id, "assign", item_id])?;
        self.post_empty(url).await
    }
}

/// Any failure to complete the HTTP exchange is worth retrying.
fn send_error(e: reqwest::Error) -> BoxbuddyError {
    let kind = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "service unreachable"
    } else {
        "connection aborted"
    };
    warn!(error = %e, kind, "HTTP exchange failed");
    BoxbuddyError::Transient {
        message: format!("{kind}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Maps a non-success status to the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> BoxbuddyError {
    let message = format!("service returned {status}: {}", error_message(body));
    if is_transient_status(status) {
        warn!(status = %status, "transient service failure");
        BoxbuddyError::Transient {
            message,
            source: None,
        }
    } else {
        BoxbuddyError::Validation { message }
    }
}

/// Returns true for status codes that indicate transient errors worth retrying.
fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || matches!(
            status,
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS
        )
}

fn audio_extension(mime: &str) -> &str {
    match mime {
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        _ => "webm",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use boxbuddy_core::PhotoRef;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ITEM: &str = "11111111-1111-1111-1111-111111111111";
    const BOX: &str = "22222222-2222-2222-2222-222222222222";

    fn test_client(base_url: &str) -> HttpInventoryClient {
        HttpInventoryClient::new(base_url, Duration::from_secs(5), "audio/webm").unwrap()
    }

    fn test_bundle() -> CaptureBundle {
        let mut metadata = BTreeMap::new();
        metadata.insert("name".to_string(), "Cordless drill".to_string());
        metadata.insert("quantity".to_string(), "1".to_string());
        CaptureBundle {
            id: uuid::Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            audio: b"RIFF-fake-audio".to_vec(),
            photos: vec![PhotoRef::from("photo-a"), PhotoRef::from("photo-b")],
            metadata,
        }
    }

    #[tokio::test]
    async fn get_item_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/items/{ITEM}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": ITEM,
                "name": "Toolbox",
                "type": "CONTAINER"
            })))
            .mount(&server)
            .await;

        let item = test_client(&server.uri()).get_item(ITEM).await.unwrap();
        assert_eq!(item.id, ITEM);
        assert_eq!(item.name, "Toolbox");
        assert!(item.is_container);
    }

    #[tokio::test]
    async fn get_item_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/items/{ITEM}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).get_item(ITEM).await.unwrap_err();
        assert!(matches!(err, BoxbuddyError::NotFound { ref id } if id == ITEM), "got: {err}");
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/items/{ITEM}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": ITEM,
                "name": "Lamp"
            })))
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/api/", server.uri()));
        assert_eq!(client.get_item(ITEM).await.unwrap().name, "Lamp");
    }

    #[tokio::test]
    async fn store_item_posts_to_store_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/items/{ITEM}/store/{BOX}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri()).store_item(ITEM, BOX).await.unwrap();
    }

    #[tokio::test]
    async fn store_item_rejection_is_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/items/{ITEM}/store/{BOX}")))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "target is not a container"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).store_item(ITEM, BOX).await.unwrap_err();
        assert!(matches!(err, BoxbuddyError::Validation { .. }));
        assert!(err.to_string().contains("target is not a container"), "got: {err}");
    }

    #[tokio::test]
    async fn submit_capture_sends_multipart_and_reads_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/captures"))
            .and(body_string_contains("Cordless drill"))
            .and(body_string_contains("photo-b"))
            .and(body_string_contains("RIFF-fake-audio"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"uuid": ITEM})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = test_client(&server.uri())
            .submit_capture(&test_bundle())
            .await
            .unwrap();
        assert_eq!(receipt.id.as_deref(), Some(ITEM));
    }

    #[tokio::test]
    async fn submit_capture_422_is_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/captures"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(serde_json::json!({"message": "audio too short"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .submit_capture(&test_bundle())
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("audio too short"), "got: {err}");
    }

    #[tokio::test]
    async fn submit_capture_503_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/captures"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .submit_capture(&test_bundle())
            .await
            .unwrap_err();
        assert!(err.is_transient(), "got: {err}");
    }

    #[tokio::test]
    async fn unreachable_service_is_transient() {
        // Nothing listens on port 1.
        let err = test_client("http://127.0.0.1:1").get_item(ITEM).await.unwrap_err();
        assert!(err.is_transient(), "got: {err}");
    }

    #[tokio::test]
    async fn slow_response_times_out_as_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/items/{ITEM}")))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client =
            HttpInventoryClient::new(&server.uri(), Duration::from_millis(100), "audio/webm").unwrap();
        let err = client.get_item(ITEM).await.unwrap_err();
        assert!(err.is_transient(), "got: {err}");
    }

    #[tokio::test]
    async fn assign_photo_hits_gallery_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/gallery/image/photo-a/assign/{ITEM}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .assign_photo("photo-a", ITEM)
            .await
            .unwrap();
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpInventoryClient::new("not a url", Duration::from_secs(1), "audio/webm").unwrap_err();
        assert!(matches!(err, BoxbuddyError::Config(_)));
    }

    #[test]
    fn status_classification() {
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_transient_status(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!is_transient_status(StatusCode::CONFLICT));
    }
}
