//! HTTP client for the SENASA RENSPA REST API.
//!
//! Two layers:
//!
//! - `try_*` methods issue one request and return a typed [`RegistryError`]
//!   on any failure.
//! - [`RegistryClient::fetch_properties_by_taxpayer`] and
//!   [`RegistryClient::fetch_property_detail`] never fail. Errors are logged
//!   and the caller gets whatever was collected before the failure. A short or
//!   empty result therefore does not prove the taxpayer has no properties.

use std::collections::HashSet;
use std::time::Duration;

use renspa_core::{AppConfig, PropertyId, PropertyRecord, TaxpayerId};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::RegistryError;
use crate::normalize::normalize_item;
use crate::pacing::RequestPacer;
use crate::pagination::OffsetPager;
use crate::retry::retry_with_backoff;
use crate::types::{ListingPage, RegistryItem};

const LIST_ENDPOINT: &str = "consultaPorCuit";
const DETAIL_ENDPOINT: &str = "consultaPorNumero";

/// Connection and pacing settings for [`RegistryClient`].
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Listing pages are heavier than detail lookups, so they get longer.
    pub list_timeout: Duration,
    pub detail_timeout: Duration,
    pub page_size: u32,
    pub max_pages: usize,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            base_url: renspa_core::config::DEFAULT_API_BASE_URL.to_owned(),
            user_agent: "renspa/0.1 (property-geometry)".to_owned(),
            list_timeout: Duration::from_secs(15),
            detail_timeout: Duration::from_secs(10),
            page_size: 10,
            max_pages: 500,
            inter_request_delay_ms: 500,
            max_retries: 0,
            retry_backoff_base_ms: 1_000,
        }
    }
}

impl RegistryClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
            list_timeout: Duration::from_secs(config.list_timeout_secs),
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
            page_size: config.page_size,
            max_pages: config.max_pages,
            inter_request_delay_ms: config.inter_request_delay_ms,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }

    /// Same settings pointed at another base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }
}

/// Client for the RENSPA registry.
pub struct RegistryClient {
    client: Client,
    list_url: Url,
    detail_url: Url,
    config: RegistryClientConfig,
    pacer: RequestPacer,
}

impl RegistryClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RegistryError::InvalidBaseUrl`] if
    /// `config.base_url` is not a valid URL.
    pub fn new(config: RegistryClientConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Ensure exactly one trailing slash so `join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let invalid = |e: &dyn std::fmt::Display| RegistryError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(&e))?;
        let list_url = base.join(LIST_ENDPOINT).map_err(|e| invalid(&e))?;
        let detail_url = base.join(DETAIL_ENDPOINT).map_err(|e| invalid(&e))?;

        Ok(Self {
            client,
            list_url,
            detail_url,
            pacer: RequestPacer::new(config.inter_request_delay_ms),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RegistryClientConfig {
        &self.config
    }

    /// Waits out the inter-request delay.
    pub async fn pause(&self) {
        self.pacer.pause().await;
    }

    /// Fetches one listing page for `cuit` starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Http`] on network failure or timeout.
    /// - [`RegistryError::UnexpectedStatus`] on a non-2xx response.
    /// - [`RegistryError::Deserialize`] if the body is not the expected envelope.
    pub async fn try_fetch_listing_page(
        &self,
        cuit: &TaxpayerId,
        offset: u32,
    ) -> Result<ListingPage, RegistryError> {
        let url = self.listing_url(cuit, offset);
        self.get_json(&url, self.config.list_timeout).await
    }

    /// Fetches the detail entry for one property.
    ///
    /// Returns `Ok(None)` when the registry answers with no usable item.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_fetch_listing_page`].
    pub async fn try_fetch_detail(
        &self,
        renspa: &PropertyId,
    ) -> Result<Option<PropertyRecord>, RegistryError> {
        let url = self.detail_url(renspa);
        let page: ListingPage = self.get_json(&url, self.config.detail_timeout).await?;
        let context = format!("{DETAIL_ENDPOINT}(numero={renspa})");
        Ok(page
            .decode_items(&context)
            .iter()
            .find_map(normalize_item))
    }

    /// Collects every registry entry listed under `cuit`, in page order.
    ///
    /// Pages are requested at offsets `0, page_size, 2 × page_size, …` until a
    /// page is empty, `hasMore` is false, or the page cap is reached. The
    /// inter-request delay follows every page. On the first failed page the
    /// walk stops and the entries gathered so far are returned. Repeated
    /// RENSPA numbers keep their first occurrence.
    pub async fn fetch_properties_by_taxpayer(&self, cuit: &TaxpayerId) -> Vec<PropertyRecord> {
        let mut pager = OffsetPager::new(self.config.page_size, self.config.max_pages);
        let mut seen: HashSet<PropertyId> = HashSet::new();
        let mut records = Vec::new();

        while let Some(offset) = pager.next_offset() {
            let result = self.try_fetch_listing_page(cuit, offset).await;
            self.pause().await;

            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        cuit = %cuit,
                        offset,
                        collected = records.len(),
                        error = %e,
                        "listing page failed; returning partial results"
                    );
                    pager.abort();
                    break;
                }
            };

            let has_more = page.has_more();
            let raw_count = page.item_count();
            let context = format!("{LIST_ENDPOINT}(cuit={cuit}, offset={offset})");
            let items: Vec<RegistryItem> = page.decode_items(&context);
            pager.record_page(raw_count, has_more);
            tracing::debug!(cuit = %cuit, offset, items = items.len(), has_more, "listing page fetched");

            for record in items.iter().filter_map(normalize_item) {
                if seen.insert(record.property_id.clone()) {
                    records.push(record);
                } else {
                    tracing::debug!(cuit = %cuit, renspa = %record.property_id, "duplicate listing entry skipped");
                }
            }
        }

        if pager.hit_page_limit() {
            tracing::warn!(
                cuit = %cuit,
                max_pages = self.config.max_pages,
                "page limit reached; listing may be incomplete"
            );
        }

        records
    }

    /// Looks up one property by RENSPA number.
    ///
    /// Returns `None` on any failure or when the registry has no entry; the
    /// failure is logged, never returned.
    pub async fn fetch_property_detail(&self, renspa: &PropertyId) -> Option<PropertyRecord> {
        match self.try_fetch_detail(renspa).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(renspa = %renspa, error = %e, "detail lookup failed");
                None
            }
        }
    }

    fn listing_url(&self, cuit: &TaxpayerId, offset: u32) -> Url {
        let mut url = self.list_url.clone();
        url.query_pairs_mut()
            .append_pair("cuit", cuit.as_str())
            .append_pair("offset", &offset.to_string());
        url
    }

    fn detail_url(&self, renspa: &PropertyId) -> Url {
        let mut url = self.detail_url.clone();
        url.query_pairs_mut().append_pair("numero", renspa.as_str());
        url
    }

    /// Sends a GET with the given timeout, requires a 2xx status and decodes
    /// the body, retrying transient failures per the configured policy.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<T, RegistryError> {
        retry_with_backoff(
            self.config.max_retries,
            self.config.retry_backoff_base_ms,
            || async move {
                let response = self
                    .client
                    .get(url.clone())
                    .timeout(timeout)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(RegistryError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| RegistryError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
