// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `boxbuddy lookup` and `boxbuddy assign` command implementations.

use boxbuddy_client::HttpInventoryClient;
use boxbuddy_config::model::BoxbuddyConfig;
use boxbuddy_core::{BoxbuddyError, InventoryService};
use boxbuddy_scan::IdentifierExtractor;

pub async fn run_lookup(
    config: &BoxbuddyConfig,
    payload: &str,
    json: bool,
) -> Result<(), BoxbuddyError> {
    let extractor = IdentifierExtractor::new(&config.scan.short_link_host)
        .map_err(|e| BoxbuddyError::Config(format!("invalid scan.short_link_host: {e}")))?;
    let id = extractor
        .extract(payload)
        .ok_or_else(|| BoxbuddyError::Validation {
            message: format!("`{payload}` is not one of our labels"),
        })?;

    let client = HttpInventoryClient::from_config(config)?;
    let item = client.get_item(id).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&item)
            .map_err(|e| BoxbuddyError::Internal(format!("failed to render item: {e}")))?;
        println!("{rendered}");
    } else {
        let kind = if item.is_container { "container" } else { "item" };
        println!("{} ({kind}) {}", item.name, item.id);
    }
    Ok(())
}

pub async fn run_assign(
    config: &BoxbuddyConfig,
    photo_id: &str,
    item_id: &str,
) -> Result<(), BoxbuddyError> {
    let client = HttpInventoryClient::from_config(config)?;
    client.assign_photo(photo_id, item_id).await?;
    println!("photo {photo_id} assigned to {item_id}");
    Ok(())
}
