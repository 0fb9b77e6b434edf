use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::pagination::PageLinks;

/// List response with optional pagination links
#[derive(Debug, Serialize, ToSchema)]
pub struct ListEnvelope {
    /// Entities in provider order
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Value>,
    /// Previous page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Next page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl ListEnvelope {
    pub fn new(results: Vec<Value>) -> Self {
        Self { results, prev: None, next: None }
    }

    pub fn with_links(results: Vec<Value>, links: PageLinks) -> Self {
        Self { results, prev: links.prev, next: links.next }
    }
}

/// Search-term suggestion
#[derive(Debug, Serialize, ToSchema)]
pub struct Suggestion {
    pub term: String,
    /// Search URL for this term
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionList {
    pub results: Vec<Suggestion>,
}

/// Root discovery document
#[derive(Debug, Serialize, ToSchema)]
pub struct DiscoveryResponse {
    pub apps: String,
    pub developers: String,
    pub categories: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeveloperBundle {
    #[serde(rename = "devId")]
    pub dev_id: String,
    /// Raw provider list
    #[schema(value_type = Object)]
    pub apps: Value,
}

/// Developer apps with failed detail lookups dropped
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadableDetailsBundle {
    #[serde(rename = "devId")]
    pub dev_id: String,
    #[schema(value_type = Vec<Object>)]
    pub apps: Vec<Value>,
    /// Number of detail lookups that failed
    pub failed: usize,
}

/// Developer apps with summary records standing in for failed lookups
#[derive(Debug, Serialize, ToSchema)]
pub struct BestEffortBundle {
    #[serde(rename = "devId")]
    pub dev_id: String,
    #[schema(value_type = Vec<Object>)]
    pub apps: Vec<Value>,
    /// Number of summary records used in place of details
    pub fallbacks: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// 400 body for the developer collection without an id
#[derive(Debug, Serialize, ToSchema)]
pub struct MissingDeveloperBody {
    pub message: String,
    pub example: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// UP or LIVE
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
