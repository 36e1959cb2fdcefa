//! Record sources and the multi-retailer collection fan-out.

use std::collections::HashMap;
use std::future::Future;

use futures::stream::{self, StreamExt};
use kurv_core::{CanonicalProduct, RetailerConfig};
use serde_json::Value;

use crate::client::RetailerClient;
use crate::error::IngestError;
use crate::normalize::normalize_records;

/// Anything that can produce raw product records for a retailer.
pub trait RecordSource {
    fn fetch_records(
        &self,
        retailer: &RetailerConfig,
        query: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Value>, IngestError>> + Send;
}

impl RecordSource for RetailerClient {
    async fn fetch_records(
        &self,
        retailer: &RetailerConfig,
        query: Option<&str>,
    ) -> Result<Vec<Value>, IngestError> {
        let base_url = retailer
            .base_url
            .as_deref()
            .ok_or_else(|| IngestError::MissingBaseUrl {
                retailer: retailer.id.clone(),
            })?;
        self.fetch_catalog(&retailer.id, base_url, query).await
    }
}

/// Fixed records per retailer id, for offline runs and tests. The query is
/// ignored; unknown retailers yield no records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: HashMap<String, Vec<Value>>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(mut self, retailer_id: impl Into<String>, records: Vec<Value>) -> Self {
        self.records.entry(retailer_id.into()).or_default().extend(records);
        self
    }
}

impl RecordSource for StaticSource {
    async fn fetch_records(
        &self,
        retailer: &RetailerConfig,
        _query: Option<&str>,
    ) -> Result<Vec<Value>, IngestError> {
        Ok(self.records.get(&retailer.id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRetailer {
    pub retailer_id: String,
    pub reason: String,
}

/// Result of a collection run: every normalized product from the retailers
/// that answered, plus the ones that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub products: Vec<CanonicalProduct>,
    pub failed_retailers: Vec<FailedRetailer>,
    /// Number of retailers the run was asked to collect from.
    pub retailer_count: usize,
}

impl Collection {
    /// `true` when every requested retailer failed. A retailer that answered
    /// with zero records did not fail.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.retailer_count > 0 && self.failed_retailers.len() == self.retailer_count
    }
}

/// Fetches and normalizes records from every retailer, at most
/// `max_concurrent` at a time.
///
/// A failing retailer is logged and listed in
/// [`Collection::failed_retailers`]; the others are unaffected. Products
/// keep the order of `retailers`, then the order each source returned.
pub async fn collect_products<S: RecordSource>(
    source: &S,
    retailers: &[RetailerConfig],
    query: Option<&str>,
    max_concurrent: usize,
) -> Collection {
    let mut results: Vec<(usize, &RetailerConfig, Result<Vec<Value>, IngestError>)> =
        stream::iter(retailers.iter().enumerate())
            .map(|(idx, retailer)| async move {
                (idx, retailer, source.fetch_records(retailer, query).await)
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;
    results.sort_by_key(|(idx, _, _)| *idx);

    let mut collection = Collection {
        retailer_count: retailers.len(),
        ..Collection::default()
    };
    for (_, retailer, result) in results {
        match result {
            Ok(records) => {
                let products = normalize_records(records, &retailer.id, retailer.schema);
                tracing::debug!(
                    retailer = %retailer.id,
                    schema = %retailer.schema,
                    count = products.len(),
                    "normalized retailer records"
                );
                collection.products.extend(products);
            }
            Err(e) => {
                tracing::warn!(
                    retailer = %retailer.id,
                    error = %e,
                    "retailer fetch failed; skipping"
                );
                collection.failed_retailers.push(FailedRetailer {
                    retailer_id: retailer.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if !collection.failed_retailers.is_empty() {
        tracing::warn!(
            failed_retailers = collection.failed_retailers.len(),
            total_retailers = retailers.len(),
            "some retailers failed during collection"
        );
    }

    collection
}
