//! Developer detail aggregation
//!
//! Fetches a developer's summary list, then looks up full details for every
//! app concurrently. Lookups are independent: each one yields its own result
//! and the batch is awaited as a whole. Two merge policies:
//! - `only_readable_details`: drop failed lookups, count them in `failed`
//! - `best_effort_details`: keep the summary record for failed lookups,
//!   count them in `fallbacks`

use futures::future::join_all;
use gp_common::CatalogOptions;
use gp_provider::{CatalogProvider, ProviderError};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ReadableDetails {
    pub apps: Vec<Value>,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestEffortDetails {
    pub apps: Vec<Value>,
    pub fallbacks: usize,
}

/// Lookup locale for the per-app calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub lang: String,
    pub country: String,
}

impl Locale {
    /// Take `lang`/`country` from the query, falling back to the given defaults
    pub fn resolve(query: &CatalogOptions, default_lang: &str, default_country: &str) -> Self {
        Self {
            lang: query.get("lang").unwrap_or(default_lang).to_string(),
            country: query.get("country").unwrap_or(default_country).to_string(),
        }
    }
}

pub struct DeveloperAggregator<'a> {
    provider: &'a dyn CatalogProvider,
    locale: Locale,
}

impl<'a> DeveloperAggregator<'a> {
    pub fn new(provider: &'a dyn CatalogProvider, locale: Locale) -> Self {
        Self { provider, locale }
    }

    /// Summary-level app list for a developer.
    ///
    /// Anything other than a JSON array is treated as an empty list.
    pub async fn summaries(&self, dev_id: &str, query: &CatalogOptions) -> Result<Vec<Value>, ProviderError> {
        let options = query
            .clone()
            .with("devId", dev_id)
            .with("lang", self.locale.lang.as_str())
            .with("country", self.locale.country.as_str())
            .with("fullDetail", "false");

        match self.provider.developer(&options).await? {
            Value::Array(apps) => Ok(apps),
            other => {
                debug!(dev_id, kind = json_kind(&other), "Developer summary is not a list");
                Ok(Vec::new())
            }
        }
    }

    /// One detail lookup per summary entry, results in summary order.
    pub async fn lookup_details(&self, summaries: &[Value]) -> Vec<Result<Value, ProviderError>> {
        let lookups = summaries.iter().map(|summary| self.lookup_one(summary));
        join_all(lookups).await
    }

    async fn lookup_one(&self, summary: &Value) -> Result<Value, ProviderError> {
        let Some(app_id) = summary.get("appId").and_then(Value::as_str) else {
            let e = ProviderError::invalid_request("Summary entry has no appId");
            warn!(error = %e, "App detail lookup skipped");
            return Err(e);
        };

        let options = CatalogOptions::new()
            .with("appId", app_id)
            .with("lang", self.locale.lang.as_str())
            .with("country", self.locale.country.as_str());

        self.provider.app(&options).await.map_err(|e| {
            warn!(app_id, error = %e, "App detail lookup failed");
            e
        })
    }

    pub async fn only_readable_details(
        &self,
        dev_id: &str,
        query: &CatalogOptions,
    ) -> Result<ReadableDetails, ProviderError> {
        let summaries = self.summaries(dev_id, query).await?;
        if summaries.is_empty() {
            return Ok(ReadableDetails { apps: Vec::new(), failed: 0 });
        }

        let results = self.lookup_details(&summaries).await;
        let details = keep_readable(results);

        info!(
            dev_id,
            total = summaries.len(),
            failed = details.failed,
            "Aggregated readable developer details"
        );
        Ok(details)
    }

    pub async fn best_effort_details(
        &self,
        dev_id: &str,
        query: &CatalogOptions,
    ) -> Result<BestEffortDetails, ProviderError> {
        let summaries = self.summaries(dev_id, query).await?;
        if summaries.is_empty() {
            return Ok(BestEffortDetails { apps: Vec::new(), fallbacks: 0 });
        }

        let results = self.lookup_details(&summaries).await;
        let details = merge_with_fallback(summaries, results);

        info!(
            dev_id,
            total = details.apps.len(),
            fallbacks = details.fallbacks,
            "Aggregated best-effort developer details"
        );
        Ok(details)
    }
}

/// Keep successful lookups in order, count the rest.
pub fn keep_readable(results: Vec<Result<Value, ProviderError>>) -> ReadableDetails {
    let mut details = ReadableDetails { apps: Vec::with_capacity(results.len()), failed: 0 };

    for result in results {
        match result {
            Ok(app) => details.apps.push(app),
            Err(_) => details.failed += 1,
        }
    }

    details
}

/// Pair each summary with its lookup result, substituting the summary on failure.
pub fn merge_with_fallback(
    summaries: Vec<Value>,
    results: Vec<Result<Value, ProviderError>>,
) -> BestEffortDetails {
    let mut details = BestEffortDetails { apps: Vec::with_capacity(summaries.len()), fallbacks: 0 };

    for (summary, result) in summaries.into_iter().zip(results) {
        match result {
            Ok(app) => details.apps.push(app),
            Err(_) => {
                details.fallbacks += 1;
                details.apps.push(summary);
            }
        }
    }

    details
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
