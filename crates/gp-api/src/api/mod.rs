//! Store Catalog HTTP API
//!
//! Catalog routes (mounted under the configured base path):
//! - discovery document
//! - app search / suggestions / paginated listing on one path
//! - app detail and its similar, data safety, permissions and reviews
//! - developer bundles (raw, readable-only, best-effort)
//! - categories
//!
//! Plus health probes and the OpenAPI document at the server root.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gp_common::CatalogOptions;
use gp_config::AppConfig;
use gp_provider::{CatalogProvider, Operation};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::aggregator::{DeveloperAggregator, Locale};
use crate::enrich::{app_with_links, apps_with_links};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::links::LinkBuilder;
use crate::pagination::{offset_cursors, page_cursors};

pub mod model;

use model::{
    BestEffortBundle, DeveloperBundle, DiscoveryResponse, ErrorBody, HealthResponse, ListEnvelope,
    MissingDeveloperBody, ReadableDetailsBundle, Suggestion, SuggestionList,
};

/// Developer id used in the example URL of the missing-id response
pub const EXAMPLE_DEVELOPER_ID: &str = "Mojang";

/// Mount path the `#[utoipa::path]` annotations are written against
const DOC_MOUNT_PATH: &str = "/api";

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Mount path without trailing slash, "" for the root
    pub mount_path: String,
    /// Link scheme when no X-Forwarded-Proto header is sent
    pub public_scheme: String,
    pub default_lang: String,
    pub default_country: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            mount_path: "/api".to_string(),
            public_scheme: "http".to_string(),
            default_lang: "en".to_string(),
            default_country: "us".to_string(),
        }
    }
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            mount_path: config.mount_path().to_string(),
            public_scheme: config.http.public_scheme.clone(),
            default_lang: config.defaults.lang.clone(),
            default_country: config.defaults.country.clone(),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CatalogProvider>,
    pub settings: Arc<ApiSettings>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Catalog API",
        version = "0.1.0",
        description = "REST facade over a store catalog provider"
    ),
    paths(
        index_handler,
        apps_handler,
        app_detail_handler,
        similar_handler,
        datasafety_handler,
        permissions_handler,
        reviews_handler,
        developer_handler,
        readable_details_handler,
        best_effort_details_handler,
        missing_developer_handler,
        categories_handler,
        health_handler,
        liveness_probe,
    ),
    components(schemas(
        ListEnvelope,
        Suggestion,
        SuggestionList,
        DiscoveryResponse,
        DeveloperBundle,
        ReadableDetailsBundle,
        BestEffortBundle,
        ErrorBody,
        MissingDeveloperBody,
        HealthResponse,
    )),
    tags(
        (name = "apps", description = "App search, listing and detail"),
        (name = "developers", description = "Developer app bundles"),
        (name = "catalog", description = "Discovery and categories"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

/// OpenAPI document with catalog paths moved under `mount_path`
pub fn openapi_for_mount(mount_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = std::mem::take(&mut doc.paths.paths);

    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DOC_MOUNT_PATH) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                let mounted = format!("{mount_path}{rest}");
                (if mounted.is_empty() { "/".to_string() } else { mounted }, item)
            }
            _ => (path, item),
        })
        .collect();

    doc
}

/// Create the full router: catalog routes, health probes and Swagger UI
pub fn create_router(provider: Arc<dyn CatalogProvider>, settings: ApiSettings) -> Router {
    let mount_path = settings.mount_path.trim_end_matches('/').to_string();
    let state = AppState {
        provider,
        settings: Arc::new(ApiSettings { mount_path: mount_path.clone(), ..settings }),
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", openapi_for_mount(&mount_path)))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_probe))
        .merge(catalog_routes(&mount_path))
        .with_state(state)
}

/// Catalog routes with the mount path prefixed. Collections answer with and
/// without a trailing slash.
fn catalog_routes(mount: &str) -> Router<AppState> {
    let at = |path: &str| format!("{mount}{path}");

    let mut router = Router::new()
        .route(&at("/"), get(index_handler))
        .route(&at("/apps"), get(apps_handler))
        .route(&at("/apps/"), get(apps_handler))
        .route(&at("/apps/:app_id"), get(app_detail_handler))
        .route(&at("/apps/:app_id/similar"), get(similar_handler))
        .route(&at("/apps/:app_id/datasafety"), get(datasafety_handler))
        .route(&at("/apps/:app_id/permissions"), get(permissions_handler))
        .route(&at("/apps/:app_id/reviews"), get(reviews_handler))
        .route(&at("/developers"), get(missing_developer_handler))
        .route(&at("/developers/"), get(missing_developer_handler))
        .route(&at("/developers/:dev_id"), get(developer_handler))
        .route(&at("/developers/:dev_id/"), get(developer_handler))
        .route(&at("/developers_only_readable_details/:dev_id"), get(readable_details_handler))
        .route(&at("/developers_only_readable_details/:dev_id/"), get(readable_details_handler))
        .route(&at("/developers_best_effort_details/:dev_id"), get(best_effort_details_handler))
        .route(&at("/developers_best_effort_details/:dev_id/"), get(best_effort_details_handler))
        .route(&at("/categories"), get(categories_handler))
        .route(&at("/categories/"), get(categories_handler));

    if !mount.is_empty() {
        router = router.route(mount, get(index_handler));
    }

    router
}

// ============================================================================
// Helpers
// ============================================================================

/// Which `/apps/` branch a query selects, in priority order q > suggest > list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppsRequest {
    Search { term: String },
    Suggest { term: String },
    List,
}

impl AppsRequest {
    pub fn from_query(query: &CatalogOptions) -> Self {
        if let Some(term) = query.get("q") {
            AppsRequest::Search { term: term.to_string() }
        } else if let Some(term) = query.get("suggest") {
            AppsRequest::Suggest { term: term.to_string() }
        } else {
            AppsRequest::List
        }
    }
}

/// Entities of a list-shaped response. Paged responses carrying a `data`
/// array are unwrapped.
fn list_of(operation: Operation, value: Value) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut record) => match record.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::UnexpectedShape { operation }),
        },
        _ => Err(ApiError::UnexpectedShape { operation }),
    }
}

/// Lists are wrapped in an envelope, records go out as they are
fn envelope_or_record(value: Value, links: Option<&LinkBuilder>) -> Response {
    match value {
        Value::Array(results) => {
            let results = match links {
                Some(links) => apps_with_links(results, links),
                None => results,
            };
            Json(ListEnvelope::new(results)).into_response()
        }
        record => Json(record).into_response(),
    }
}

fn encoded(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

// ============================================================================
// Catalog Endpoints
// ============================================================================

/// Discovery document with links to the collections
#[utoipa::path(
    get,
    path = "/api/",
    tag = "catalog",
    responses(
        (status = 200, description = "Collection links", body = DiscoveryResponse)
    )
)]
async fn index_handler(links: LinkBuilder) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        apps: links.url("apps"),
        developers: links.url("developers"),
        categories: links.url("categories"),
    })
}

/// Search (`q`), suggestions (`suggest`) or the paginated listing
#[utoipa::path(
    get,
    path = "/api/apps/",
    tag = "apps",
    params(
        ("q" = Option<String>, Query, description = "Full-text search term"),
        ("suggest" = Option<String>, Query, description = "Prefix to suggest search terms for"),
        ("num" = Option<i64>, Query, description = "Listing page size (default 60)"),
        ("start" = Option<i64>, Query, description = "Listing offset (default 0)"),
    ),
    responses(
        (status = 200, description = "Search results or listing page", body = ListEnvelope),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn apps_handler(
    State(state): State<AppState>,
    links: LinkBuilder,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Response, ApiError> {
    match AppsRequest::from_query(&query) {
        AppsRequest::Search { term } => {
            debug!(term = %term, "Searching apps");
            let options = query.with("term", term);
            let results = list_of(Operation::Search, state.provider.search(&options).await?)?;
            Ok(Json(ListEnvelope::new(apps_with_links(results, &links))).into_response())
        }
        AppsRequest::Suggest { term } => {
            let options = CatalogOptions::new().with("term", term);
            let terms = list_of(Operation::Suggest, state.provider.suggest(&options).await?)?;

            let results = terms
                .into_iter()
                .map(|entry| {
                    let term = match entry {
                        Value::String(term) => term,
                        other => other.to_string(),
                    };
                    let url = links.url_with_query("apps/", &CatalogOptions::new().with("q", term.as_str()));
                    Suggestion { term, url }
                })
                .collect();

            Ok(Json(SuggestionList { results }).into_response())
        }
        AppsRequest::List => {
            let results = list_of(Operation::List, state.provider.list(&query).await?)?;
            let page_links = offset_cursors(&query).into_links(&links, "apps/");
            let results = apps_with_links(results, &links);
            Ok(Json(ListEnvelope::with_links(results, page_links)).into_response())
        }
    }
}

/// App detail
#[utoipa::path(
    get,
    path = "/api/apps/{appId}",
    tag = "apps",
    params(("appId" = String, Path, description = "Store app id, e.g. com.mojang.minecraftpe")),
    responses(
        (status = 200, description = "App detail record"),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn app_detail_handler(
    State(state): State<AppState>,
    links: LinkBuilder,
    ApiPath(app_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Json<Value>, ApiError> {
    let app = state.provider.app(&query.with("appId", app_id)).await?;
    Ok(Json(app_with_links(app, &links)))
}

/// Apps similar to the given one
#[utoipa::path(
    get,
    path = "/api/apps/{appId}/similar",
    tag = "apps",
    params(("appId" = String, Path, description = "Store app id")),
    responses(
        (status = 200, description = "Similar apps", body = ListEnvelope),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn similar_handler(
    State(state): State<AppState>,
    links: LinkBuilder,
    ApiPath(app_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Response, ApiError> {
    let value = state.provider.similar(&query.with("appId", app_id)).await?;
    Ok(envelope_or_record(value, Some(&links)))
}

/// Data safety section of an app
#[utoipa::path(
    get,
    path = "/api/apps/{appId}/datasafety",
    tag = "apps",
    params(("appId" = String, Path, description = "Store app id")),
    responses(
        (status = 200, description = "Data safety entries or record", body = ListEnvelope),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn datasafety_handler(
    State(state): State<AppState>,
    ApiPath(app_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Response, ApiError> {
    let value = state.provider.datasafety(&query.with("appId", app_id)).await?;
    Ok(envelope_or_record(value, None))
}

/// Permissions requested by an app
#[utoipa::path(
    get,
    path = "/api/apps/{appId}/permissions",
    tag = "apps",
    params(("appId" = String, Path, description = "Store app id")),
    responses(
        (status = 200, description = "Permissions", body = ListEnvelope),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn permissions_handler(
    State(state): State<AppState>,
    ApiPath(app_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Response, ApiError> {
    let value = state.provider.permissions(&query.with("appId", app_id)).await?;
    Ok(envelope_or_record(value, None))
}

/// Paginated reviews; `next` is offered while the current page has results
#[utoipa::path(
    get,
    path = "/api/apps/{appId}/reviews",
    tag = "apps",
    params(
        ("appId" = String, Path, description = "Store app id"),
        ("page" = Option<i64>, Query, description = "Page number (default 0)"),
    ),
    responses(
        (status = 200, description = "Review page", body = ListEnvelope),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn reviews_handler(
    State(state): State<AppState>,
    links: LinkBuilder,
    ApiPath(app_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let options = query.clone().with("appId", app_id.as_str());
    let results = list_of(Operation::Reviews, state.provider.reviews(&options).await?)?;

    let subpath = format!("apps/{}/reviews", encoded(&app_id));
    let page_links = page_cursors(&query, results.is_empty()).into_links(&links, &subpath);

    Ok(Json(ListEnvelope::with_links(results, page_links)))
}

// ============================================================================
// Developer Endpoints
// ============================================================================

/// Apps published by a developer, as returned by the provider
#[utoipa::path(
    get,
    path = "/api/developers/{devId}/",
    tag = "developers",
    params(("devId" = String, Path, description = "Developer id or name")),
    responses(
        (status = 200, description = "Developer bundle", body = DeveloperBundle),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn developer_handler(
    State(state): State<AppState>,
    ApiPath(dev_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Json<DeveloperBundle>, ApiError> {
    let apps = state
        .provider
        .developer(&query.with("devId", dev_id.as_str()))
        .await?;
    Ok(Json(DeveloperBundle { dev_id, apps }))
}

/// Full details for every developer app, failed lookups dropped
#[utoipa::path(
    get,
    path = "/api/developers_only_readable_details/{devId}/",
    tag = "developers",
    params(
        ("devId" = String, Path, description = "Developer id or name"),
        ("lang" = Option<String>, Query, description = "Language (default en)"),
        ("country" = Option<String>, Query, description = "Country (default us)"),
    ),
    responses(
        (status = 200, description = "Readable details", body = ReadableDetailsBundle),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn readable_details_handler(
    State(state): State<AppState>,
    ApiPath(dev_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Json<ReadableDetailsBundle>, ApiError> {
    let locale = Locale::resolve(&query, &state.settings.default_lang, &state.settings.default_country);
    let details = DeveloperAggregator::new(state.provider.as_ref(), locale)
        .only_readable_details(&dev_id, &query)
        .await?;

    Ok(Json(ReadableDetailsBundle {
        dev_id,
        apps: details.apps,
        failed: details.failed,
    }))
}

/// Full details for every developer app, summary records for failed lookups
#[utoipa::path(
    get,
    path = "/api/developers_best_effort_details/{devId}/",
    tag = "developers",
    params(
        ("devId" = String, Path, description = "Developer id or name"),
        ("lang" = Option<String>, Query, description = "Language (default en)"),
        ("country" = Option<String>, Query, description = "Country (default us)"),
    ),
    responses(
        (status = 200, description = "Best-effort details", body = BestEffortBundle),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn best_effort_details_handler(
    State(state): State<AppState>,
    ApiPath(dev_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CatalogOptions>,
) -> Result<Json<BestEffortBundle>, ApiError> {
    let locale = Locale::resolve(&query, &state.settings.default_lang, &state.settings.default_country);
    let details = DeveloperAggregator::new(state.provider.as_ref(), locale)
        .best_effort_details(&dev_id, &query)
        .await?;

    Ok(Json(BestEffortBundle {
        dev_id,
        apps: details.apps,
        fallbacks: details.fallbacks,
    }))
}

/// The developer collection cannot be listed; answers with an example URL
#[utoipa::path(
    get,
    path = "/api/developers/",
    tag = "developers",
    responses(
        (status = 400, description = "Developer id missing", body = MissingDeveloperBody)
    )
)]
async fn missing_developer_handler(links: LinkBuilder) -> (StatusCode, Json<MissingDeveloperBody>) {
    let example = links.url(&format!("developers/{}", encoded(EXAMPLE_DEVELOPER_ID)));

    (
        StatusCode::BAD_REQUEST,
        Json(MissingDeveloperBody {
            message: "Please specify a developer id.".to_string(),
            example,
        }),
    )
}

/// Store categories
#[utoipa::path(
    get,
    path = "/api/categories/",
    tag = "catalog",
    responses(
        (status = 200, description = "Category list"),
        (status = 400, description = "Provider error", body = ErrorBody)
    )
)]
async fn categories_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.provider.categories(&CatalogOptions::new()).await?;
    Ok(Json(categories))
}

// ============================================================================
// Health Endpoints
// ============================================================================

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is live", body = HealthResponse)
    )
)]
async fn liveness_probe() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "LIVE".to_string(),
        version: None,
    })
}
