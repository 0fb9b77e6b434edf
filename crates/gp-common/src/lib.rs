//! Store Catalog API - shared building blocks
//!
//! - `logging`: tracing subscriber setup (text or JSON output)
//! - `options`: ordered query/option map forwarded to the catalog provider

pub mod logging;
pub mod options;

pub use options::CatalogOptions;
