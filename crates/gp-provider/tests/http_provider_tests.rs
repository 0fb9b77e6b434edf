//! HttpCatalogProvider tests against a wiremock scraper bridge.

use std::time::Duration;

use gp_common::CatalogOptions;
use gp_provider::{CatalogProvider, HttpCatalogProvider, HttpProviderConfig, ProviderError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> HttpCatalogProvider {
    HttpCatalogProvider::new(HttpProviderConfig::with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_app_lookup_forwards_options_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .and(query_param("appId", "com.mojang.minecraftpe"))
        .and(query_param("lang", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appId": "com.mojang.minecraftpe",
            "title": "Minecraft",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = CatalogOptions::new()
        .with("appId", "com.mojang.minecraftpe")
        .with("lang", "es");

    let app = provider_for(&mock_server).app(&options).await.unwrap();
    assert_eq!(app["title"], "Minecraft");
}

#[tokio::test]
async fn test_list_preserves_provider_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"appId": "c"}, {"appId": "a"}, {"appId": "b"}
        ])))
        .mount(&mock_server)
        .await;

    let list = provider_for(&mock_server)
        .list(&CatalogOptions::new())
        .await
        .unwrap();

    let ids: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|app| app["appId"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_search_term_with_spaces_reaches_bridge() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("term", "panda bear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = CatalogOptions::new().with("term", "panda bear");
    let results = provider_for(&mock_server).search(&options).await.unwrap();
    assert_eq!(results, json!([]));
}

#[tokio::test]
async fn test_error_status_becomes_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "App not found (404)"})),
        )
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .app(&CatalogOptions::new().with("appId", "missing.app"))
        .await
        .unwrap_err();

    match &err {
        ProviderError::Upstream { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "App not found (404)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "App not found (404)");
}

#[tokio::test]
async fn test_non_json_success_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&mock_server)
        .await;

    let err = provider_for(&mock_server)
        .categories(&CatalogOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_slow_bridge_times_out_as_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/developer"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = HttpProviderConfig {
        base_url: mock_server.uri(),
        timeout: Duration::from_millis(50),
        connect_timeout: Duration::from_millis(50),
    };
    let provider = HttpCatalogProvider::new(config).unwrap();

    let err = provider
        .developer(&CatalogOptions::new().with("devId", "DxCo"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}
