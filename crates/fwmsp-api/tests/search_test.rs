// Fan-out search aggregator tests: partial failures stay partial.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwmsp_api::types::SearchEntity;
use fwmsp_api::{MspClient, SearchOutcome};

async fn setup() -> (MockServer, MspClient) {
    let server = MockServer::start().await;
    let client = MspClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_search_all_merges_entity_types() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/devices"))
        .and(query_param("query", "office"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "mac:aa", "name": "Office printer" }],
            "count": 1
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/alarms"))
        .and(query_param("query", "office"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "aid": 1, "message": "Office alert" },
                { "aid": 2, "message": "Office alert 2" }
            ],
            "count": 2
        })))
        .mount(&server)
        .await;

    let report = client
        .search_all(
            "office",
            &[SearchEntity::Devices, SearchEntity::Alarms],
            Some(10),
            None,
        )
        .await;

    assert_eq!(report.total, 3);
    assert_eq!(report.results.len(), 2);
    match report.results.get("devices") {
        Some(SearchOutcome::Hits { count, results, .. }) => {
            assert_eq!(*count, 1);
            assert_eq!(results.len(), 1);
        }
        other => panic!("expected hits for devices, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_partial_failure_is_isolated() {
    let (server, client) = setup().await;

    // Devices sub-request blows up; alarms still succeeds.
    Mock::given(method("GET"))
        .and(path("/v2/devices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/alarms"))
        .and(query_param("query", "badstuff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "aid": 7, "message": "hit" }],
            "count": 1
        })))
        .mount(&server)
        .await;

    let report = client
        .search_all(
            "badstuff",
            &[SearchEntity::Devices, SearchEntity::Alarms],
            None,
            None,
        )
        .await;

    // Total counts successful types only.
    assert_eq!(report.total, 1);
    assert!(matches!(
        report.results.get("devices"),
        Some(SearchOutcome::Failed { .. })
    ));
    match report.results.get("alarms") {
        Some(SearchOutcome::Hits { count, results, .. }) => {
            assert_eq!(*count, 1);
            assert_eq!(results.len(), 1);
        }
        other => panic!("expected hits for alarms, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_count_falls_back_to_result_len() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/rules"))
        .and(query_param("query", "block"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "r1" }, { "id": "r2" }]
        })))
        .mount(&server)
        .await;

    let report = client
        .search_all("block", &[SearchEntity::Rules], None, None)
        .await;

    assert_eq!(report.total, 2);
}
