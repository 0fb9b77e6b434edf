//! Store Catalog API
//!
//! REST facade over a `CatalogProvider`:
//! - api: axum router, handlers and OpenAPI document
//! - links: absolute URL synthesis from the incoming request
//! - pagination: offset/count and page-cursor prev/next links
//! - aggregator: per-app detail fan-out for developer bundles
//! - enrich: navigation links added to app records
//! - error: every handler error maps to 400 `{message}`
//! - extract: path/query extractors that reject with `ApiError`

pub mod aggregator;
pub mod api;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod links;
pub mod pagination;

pub use api::{create_router, ApiSettings, AppState};
pub use error::ApiError;
pub use links::LinkBuilder;

pub type Result<T> = std::result::Result<T, ApiError>;
