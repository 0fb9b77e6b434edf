//! Catalog Provider
//!
//! The API never scrapes the store itself. Every lookup goes through a
//! `CatalogProvider`; the production implementation (`HttpCatalogProvider`)
//! forwards each operation to a scraper bridge service over HTTP.

use async_trait::async_trait;
use gp_common::CatalogOptions;
use serde_json::Value;
use std::fmt;

pub mod error;
pub mod http;

pub use error::ProviderError;
pub use http::{HttpCatalogProvider, HttpProviderConfig};

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Operations exposed by the catalog provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    Suggest,
    List,
    App,
    Similar,
    DataSafety,
    Permissions,
    Reviews,
    Developer,
    Categories,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Suggest => "suggest",
            Operation::List => "list",
            Operation::App => "app",
            Operation::Similar => "similar",
            Operation::DataSafety => "datasafety",
            Operation::Permissions => "permissions",
            Operation::Reviews => "reviews",
            Operation::Developer => "developer",
            Operation::Categories => "categories",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External catalog provider.
///
/// Implementors only supply `fetch`; the named operations are thin wrappers.
/// Results are either a single record or an ordered list, passed through as JSON.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch(&self, operation: Operation, options: &CatalogOptions) -> Result<Value>;

    async fn search(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Search, options).await
    }

    async fn suggest(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Suggest, options).await
    }

    async fn list(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::List, options).await
    }

    async fn app(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::App, options).await
    }

    async fn similar(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Similar, options).await
    }

    async fn datasafety(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::DataSafety, options).await
    }

    async fn permissions(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Permissions, options).await
    }

    async fn reviews(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Reviews, options).await
    }

    async fn developer(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Developer, options).await
    }

    async fn categories(&self, options: &CatalogOptions) -> Result<Value> {
        self.fetch(Operation::Categories, options).await
    }
}
