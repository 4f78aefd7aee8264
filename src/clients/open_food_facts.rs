//! Open Food Facts lookup for product metadata by GTIN.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::MetadataConfig;

/// Upstream product-facts source. The metadata handler only cares about
/// "facts for this GTIN, or nothing".
#[async_trait]
pub trait FoodFactsGateway: Send + Sync {
    async fn fetch(&self, gtin: &str) -> Result<Option<String>>;
}

pub struct OpenFoodFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build metadata HTTP client")?;

        Ok(Self {
            http,
            base_url: config.food_facts_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FoodFactsGateway for OpenFoodFactsClient {
    async fn fetch(&self, gtin: &str) -> Result<Option<String>> {
        let url = format!("{}/{gtin}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Open Food Facts request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = response
            .error_for_status()
            .context("Open Food Facts returned an error status")?
            .json()
            .await
            .context("Open Food Facts returned invalid JSON")?;

        // status == 1 means the product is known.
        if body.get("status").and_then(Value::as_i64) != Some(1) {
            debug!(gtin, "Open Food Facts has no product for GTIN");
            return Ok(None);
        }

        Ok(body.get("product").map(Value::to_string))
    }
}
