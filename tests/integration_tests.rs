use httpmock::prelude::*;
use release_dashboard::app::runner::{self, ViewRequest};
use release_dashboard::{
    Column, DashboardConfig, RecordSource, RemoteSource, Row, SortDirection,
};
use std::sync::Arc;
use std::time::Duration;

fn config_for(endpoint: String) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.source.endpoint = Some(endpoint);
    config
}

fn remote(config: &DashboardConfig) -> Arc<dyn RecordSource> {
    Arc::new(RemoteSource::from_config(config).unwrap())
}

#[tokio::test]
async fn test_end_to_end_single_record() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/default/release-dashboard-api")
            .json_body(serde_json::json!({"env": "prod"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{
                "deployment-name": "svc1",
                "namespace": "ns1",
                "main-container-images": ["img:a", "img:b"],
                "init-container-images": "img:c"
            }]));
    });

    let config = config_for(server.url("/default/release-dashboard-api"));
    let request = ViewRequest {
        cluster: Some("prod".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(
        snapshot.rows,
        vec![Row {
            deployment_name: "svc1".to_string(),
            namespace: "ns1".to_string(),
            main_container_images: "img:a, img:b".to_string(),
            side_container_images: "img:c".to_string(),
        }]
    );
    assert_eq!(snapshot.page_count, 1);
    assert_eq!(snapshot.page_index, 0);
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert!(snapshot.fetched_at.is_some());
}

#[tokio::test]
async fn test_end_to_end_server_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/failed");
        then.status(500);
    });

    let config = config_for(server.url("/failed"));
    let request = ViewRequest {
        cluster: Some("prod".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(snapshot.error.as_deref(), Some("HTTP error! status: 500"));
    assert_eq!(snapshot.total_rows, 0);
    assert_eq!(snapshot.page_count, 1);
    assert!(snapshot.rows.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_end_to_end_malformed_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200)
            .json_body(serde_json::json!({"deployments": []}));
    });

    let config = config_for(server.url("/"));
    let request = ViewRequest {
        cluster: Some("stg".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    assert_eq!(snapshot.error.as_deref(), Some("Invalid response format"));
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_end_to_end_search_sort_and_page() {
    let records: Vec<serde_json::Value> = (0..45)
        .map(|i| {
            serde_json::json!({
                "deployment-name": format!("svc-{:02}", i),
                "namespace": if i % 3 == 0 { "payments" } else { "platform" },
                "main-container-images": [format!("registry/svc-{:02}:1.{}", i, i % 4)],
                "init-container-images": ["istio/proxyv2:1.19"]
            })
        })
        .collect();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(serde_json::Value::Array(records));
    });

    let config = config_for(server.url("/"));
    let request = ViewRequest {
        cluster: Some("prod".to_string()),
        search: Some("PLATFORM".to_string()),
        sort: Some(Column::DeploymentName),
        descending: true,
        page: Some("2".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    // 30 platform rows, newest names first, second page holds the last 10.
    assert_eq!(snapshot.total_rows, 45);
    assert_eq!(snapshot.filtered_rows, 30);
    assert_eq!(snapshot.page_count, 2);
    assert_eq!(snapshot.page_index, 1);
    assert_eq!(snapshot.sort.direction, SortDirection::Descending);
    assert_eq!(snapshot.rows.len(), 10);
    assert!(snapshot.rows.iter().all(|r| r.namespace == "platform"));
    assert_eq!(snapshot.rows.last().unwrap().deployment_name, "svc-01");
}

#[tokio::test]
async fn test_out_of_range_page_clamps() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(serde_json::json!([
            {"deployment-name": "a"},
            {"deployment-name": "b"}
        ]));
    });

    let config = config_for(server.url("/"));
    let request = ViewRequest {
        cluster: Some("dev".to_string()),
        page: Some("99".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    assert_eq!(snapshot.page_index, 0);
    assert_eq!(snapshot.rows.len(), 2);
}

#[tokio::test]
async fn test_no_cluster_means_no_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(serde_json::json!([]));
    });

    let config = config_for(server.url("/"));
    let request = ViewRequest {
        cluster: Some("   ".to_string()),
        search: Some("anything".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    api_mock.assert_hits(0);
    assert!(snapshot.cluster.is_none());
    assert_eq!(snapshot.page_count, 1);
}

#[tokio::test]
async fn test_request_timeout_is_a_fetch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/slow");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!([]));
    });

    let mut config = config_for(server.url("/slow"));
    config.source.timeout_seconds = Some(1);
    let request = ViewRequest {
        cluster: Some("prod".to_string()),
        ..ViewRequest::default()
    };

    let snapshot = runner::run_once(&config, remote(&config), &request)
        .await
        .unwrap();

    assert!(snapshot.error.is_some());
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/").header("x-dashboard-team", "platform");
        then.status(200).json_body(serde_json::json!([]));
    });

    let mut config = config_for(server.url("/"));
    config
        .source
        .headers
        .insert("X-Dashboard-Team".to_string(), "platform".to_string());

    let source = RemoteSource::from_config(&config).unwrap();
    let records = source.fetch("prod").await.unwrap();

    api_mock.assert();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_interactive_quit_does_not_wait_for_slow_fetch() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/hanging");
        then.status(200)
            .delay(Duration::from_secs(6))
            .json_body(serde_json::json!([]));
    });

    // No request timeout configured.
    let config = config_for(server.url("/hanging"));
    let mut output: Vec<u8> = Vec::new();
    let input: &[u8] = b"cluster prod\nquit\n";

    let started = std::time::Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        runner::run_interactive(&config, remote(&config), input, &mut output),
    )
    .await;

    assert!(result.is_ok(), "quit blocked for {:?}", started.elapsed());
    result.unwrap().unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(api_mock.hits() <= 1);
}
