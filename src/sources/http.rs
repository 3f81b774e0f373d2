//! Thin HTTP helpers shared by the source adapters.

use crate::error::{PickemError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Fetch a URL and return the raw body bytes. Non-2xx statuses are errors so
/// candidate ladders can record the reason and move on.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    debug!(url, "fetching bytes");
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    Ok(body.to_vec())
}

/// Fetch a URL and parse the body as JSON. A non-JSON body becomes
/// [`PickemError::MalformedPayload`] carrying the URL, so the caller can
/// treat it as a failed candidate rather than a crash.
pub async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    debug!(url, "fetching json");
    let response = client.get(url).send().await?.error_for_status()?;
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|err| PickemError::malformed(url, "JSON", err.to_string()))
}
