//! HTTP client for retailer catalog endpoints.

use std::time::Duration;

use kurv_core::AppConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::IngestError;
use crate::rate_limit::retry_with_backoff;

/// Fallback wait reported for a 429 without a usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Catalog responses come either wrapped as `{"products": [...]}` or as a
/// bare array of records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Wrapped {
        #[serde(default)]
        products: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl CatalogPayload {
    fn into_records(self) -> Vec<Value> {
        match self {
            CatalogPayload::Wrapped { products } | CatalogPayload::Bare(products) => products,
        }
    }
}

/// HTTP client for a retailer's `GET {base_url}/products` endpoint.
///
/// Responses are returned as raw JSON records; decoding into a schema family
/// happens in [`crate::normalize`]. 429 and network failures are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct RetailerClient {
    client: Client,
    api_token: Option<String>,
    max_retries: u32,
    backoff_base_secs: u64,
    page_limit: u32,
}

impl RetailerClient {
    /// Creates a client with the given timeout, `User-Agent`, optional bearer
    /// token, retry policy, and page size.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        api_token: Option<String>,
        max_retries: u32,
        backoff_base_secs: u64,
        page_limit: u32,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_token,
            max_retries,
            backoff_base_secs,
            page_limit,
        })
    }

    /// Builds a client from the `fetch_*` settings of [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, IngestError> {
        Self::new(
            config.fetch_request_timeout_secs,
            &config.fetch_user_agent,
            config.retailer_api_token.clone(),
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_secs,
            config.fetch_page_limit,
        )
    }

    /// Fetches one page of raw product records from `base_url`.
    ///
    /// # Errors
    ///
    /// - [`IngestError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`IngestError::RateLimited`] on HTTP 429 once retries are exhausted.
    /// - [`IngestError::NotFound`] on HTTP 404 (not retried).
    /// - [`IngestError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`IngestError::Http`] on network failure once retries are exhausted.
    /// - [`IngestError::Deserialize`] if the body is not a catalog payload.
    pub async fn fetch_catalog(
        &self,
        retailer_id: &str,
        base_url: &str,
        query: Option<&str>,
    ) -> Result<Vec<Value>, IngestError> {
        let url = Self::records_url(retailer_id, base_url, self.page_limit, query)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(token) = &self.api_token {
                    request = request.bearer_auth(token);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(IngestError::RateLimited {
                        retailer: retailer_id.to_owned(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(IngestError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(IngestError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                let payload = serde_json::from_str::<CatalogPayload>(&body).map_err(|e| {
                    IngestError::Deserialize {
                        context: format!("catalog from {retailer_id}"),
                        source: e,
                    }
                })?;

                let records = payload.into_records();
                tracing::debug!(retailer = retailer_id, count = records.len(), "fetched catalog page");
                Ok(records)
            }
        })
        .await
    }

    /// Builds `{base_url}/products?limit=N[&q=...]`.
    ///
    /// A trailing slash on `base_url` is ignored and any path prefix is
    /// kept, so `https://api.example/v2/` yields `https://api.example/v2/products`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidBaseUrl`] if the result is not a valid URL.
    fn records_url(
        retailer_id: &str,
        base_url: &str,
        limit: u32,
        query: Option<&str>,
    ) -> Result<String, IngestError> {
        let base = format!("{}/products", base_url.trim().trim_end_matches('/'));
        let mut url = reqwest::Url::parse(&base).map_err(|e| IngestError::InvalidBaseUrl {
            retailer: retailer_id.to_owned(),
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", q);
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
