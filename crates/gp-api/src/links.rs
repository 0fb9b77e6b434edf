//! Absolute URL synthesis
//!
//! Links are built as `scheme://host` + mount path + subpath, where scheme and
//! host come from the incoming request (forwarding headers first).

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use gp_common::CatalogOptions;

use crate::api::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";
const FALLBACK_HOST: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    scheme: String,
    host: String,
    mount_path: String,
}

impl LinkBuilder {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, mount_path: &str) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            mount_path: mount_path.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve scheme and host for a request.
    pub fn from_headers(headers: &HeaderMap, fallback_scheme: &str, mount_path: &str) -> Self {
        let scheme = first_value(headers, FORWARDED_PROTO).unwrap_or(fallback_scheme);
        let host = first_value(headers, FORWARDED_HOST)
            .or_else(|| first_value(headers, header::HOST.as_str()))
            .unwrap_or(FALLBACK_HOST);

        Self::new(scheme, host, mount_path)
    }

    /// Absolute URL of `subpath` under the mount path
    pub fn url(&self, subpath: &str) -> String {
        format!(
            "{}://{}{}/{}",
            self.scheme,
            self.host,
            self.mount_path,
            subpath.trim_start_matches('/')
        )
    }

    /// Absolute URL with an encoded query string; no `?` when `query` is empty
    pub fn url_with_query(&self, subpath: &str, query: &CatalogOptions) -> String {
        let base = self.url(subpath);
        if query.is_empty() {
            base
        } else {
            format!("{}?{}", base, query.to_query_string())
        }
    }
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for LinkBuilder {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut links = LinkBuilder::from_headers(
            &parts.headers,
            &state.settings.public_scheme,
            &state.settings.mount_path,
        );

        // Absolute-form request targets carry the authority in the URI
        if parts.headers.get(header::HOST).is_none() && parts.headers.get(FORWARDED_HOST).is_none() {
            if let Some(authority) = parts.uri.authority() {
                links.host = authority.to_string();
            }
        }

        Ok(links)
    }
}
