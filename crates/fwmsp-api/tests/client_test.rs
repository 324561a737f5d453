// Integration tests for `MspClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwmsp_api::types::{
    Alarm, BoxInfo, Device, ListQuery, ListResponse, Rule, RuleCreateUpdate, RuleTarget,
    TargetList, TargetListCreateUpdate, TrendPoint, TrendType,
};
use fwmsp_api::{Error, MspClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MspClient) {
    let server = MockServer::start().await;
    let client = MspClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_boxes() {
    let (server, client) = setup().await;

    let body = json!({
        "results": [
            { "gid": "box-1", "name": "Office Firewalla", "model": "Gold Plus", "online": true },
            { "gid": "box-2", "name": "Lab", "model": "Purple", "online": false },
        ],
        "count": 2
    });

    Mock::given(method("GET"))
        .and(path("/v2/boxes"))
        .and(query_param_is_missing("group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page: ListResponse<BoxInfo> = client.list_boxes(None).await.unwrap();

    assert_eq!(page.count, Some(2));
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].name.as_deref(), Some("Office Firewalla"));
    assert_eq!(page.results[0].online, Some(true));
    assert_eq!(page.results[1].gid.as_deref(), Some("box-2"));
}

#[tokio::test]
async fn test_list_alarms_with_query_params() {
    let (server, client) = setup().await;

    let body = json!({
        "results": [
            { "gid": "box-1", "aid": 101, "type": 1, "message": "Suspicious traffic" },
        ],
        "count": 1,
        "nextCursor": "abc123"
    });

    Mock::given(method("GET"))
        .and(path("/v2/alarms"))
        .and(query_param("query", "status:active"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("cursor"))
        .and(query_param_is_missing("groupBy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let query = ListQuery {
        query: Some("status:active".into()),
        limit: Some(50),
        ..ListQuery::default()
    };
    let page: ListResponse<Alarm> = client.list_alarms(&query).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].aid, Some(101));
    assert_eq!(page.next_cursor.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_get_alarm_compound_path() {
    let (server, client) = setup().await;

    let body = json!({ "gid": "box-1", "aid": 42, "type": 9, "message": "Gaming late" });

    Mock::given(method("GET"))
        .and(path("/v2/alarms/box-1/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let alarm = client.get_alarm("box-1", 42).await.unwrap();

    assert_eq!(alarm.aid, Some(42));
    assert_eq!(alarm.alarm_type, Some(9));
}

#[tokio::test]
async fn test_delete_alarm() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/alarms/box-1/42"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.delete_alarm("box-1", 42).await.unwrap();
}

#[tokio::test]
async fn test_create_rule_body_omits_absent_fields() {
    let (server, client) = setup().await;

    let req = RuleCreateUpdate {
        action: Some("block".into()),
        target: Some(RuleTarget {
            target_type: Some("domain".into()),
            value: Some("example.com".into()),
            dns_only: None,
        }),
        ..RuleCreateUpdate::default()
    };

    let response = json!({
        "id": "rule-9",
        "action": "block",
        "status": "active",
        "target": { "type": "domain", "value": "example.com" }
    });

    Mock::given(method("POST"))
        .and(path("/v2/rules"))
        .and(body_json(json!({
            "action": "block",
            "target": { "type": "domain", "value": "example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let rule: Rule = client.create_rule(&req).await.unwrap();

    assert_eq!(rule.id.as_deref(), Some("rule-9"));
    assert_eq!(rule.status.as_deref(), Some("active"));
}

#[tokio::test]
async fn test_pause_and_resume_rule() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/rules/rule-9/pause"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/rules/rule-9/resume"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.pause_rule("rule-9").await.unwrap();
    client.resume_rule("rule-9").await.unwrap();
}

#[tokio::test]
async fn test_create_target_list() {
    let (server, client) = setup().await;

    let req = TargetListCreateUpdate {
        name: Some("Ad servers".into()),
        targets: Some(vec!["10.0.0.1".into(), "10.0.0.2".into()]),
        ..TargetListCreateUpdate::default()
    };

    let response = json!({
        "id": "tl-1",
        "name": "Ad servers",
        "targets": ["10.0.0.1", "10.0.0.2"]
    });

    Mock::given(method("POST"))
        .and(path("/v2/target-lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let list: TargetList = client.create_target_list(&req).await.unwrap();

    assert_eq!(list.targets.len(), 2);
    assert_eq!(list.owner, None);
}

#[tokio::test]
async fn test_list_devices_with_box_filter() {
    let (server, client) = setup().await;

    let body = json!({
        "results": [
            { "id": "mac:aa", "name": "Laptop", "ip": "192.168.1.20", "online": true },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/devices"))
        .and(query_param("box", "box-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page: ListResponse<Device> = client.list_devices(Some("box-1"), None).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert!(page.results[0].is_online());
    assert_eq!(page.count, None);
}

#[tokio::test]
async fn test_get_trends_typed_path() {
    let (server, client) = setup().await;

    let body = json!({
        "results": [
            { "ts": 1_700_000_000i64, "value": 12.0 },
            { "ts": 1_700_086_400i64, "value": 15.0 },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v2/trends/flows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page: ListResponse<TrendPoint> = client.get_trends(TrendType::Flows, None).await.unwrap();

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].ts, Some(1_700_000_000));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_boxes(None).await;

    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/alarms/box-1/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "No such alarm" })))
        .mount(&server)
        .await;

    let result = client.get_alarm("box-1", 999).await;

    match result {
        Err(Error::NotFound { ref message }) => assert_eq!(message, "No such alarm"),
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_400_validation_message_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v2/rules"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "target.value is required" })),
        )
        .mount(&server)
        .await;

    let result = client.create_rule(&RuleCreateUpdate::default()).await;

    match result {
        Err(Error::Validation { ref message }) => assert_eq!(message, "target.value is required"),
        other => panic!("expected Validation, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_generic_msp() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_boxes(None).await;

    match result {
        Err(Error::Msp { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Msp error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_with_multibyte_text_is_deserialization_error() {
    let (server, client) = setup().await;

    // 199 ASCII bytes followed by two-byte characters, so a naive
    // 200-byte cutoff would land inside a character.
    let mut body = "a".repeat(199);
    body.push_str(&"é".repeat(20));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.list_boxes(None).await;

    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains("body preview"));
        }
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}
