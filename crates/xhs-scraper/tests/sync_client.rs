//! HTTP sync client tests against a local `wiremock` server.
//!
//! Every failure mode must come back as a failed `SyncOutcome`, never an
//! error — sync is a separate failure domain from the scrape.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xhs_core::{AuthorProfile, AuthorRecord, NoteDetail};
use xhs_scraper::{DisabledSync, HttpSync, SyncSink};

fn sample_record() -> AuthorRecord {
    AuthorRecord::assemble(
        AuthorProfile {
            user_name: "Alice".to_owned(),
            user_id: "alice123".to_owned(),
            subscribers: "12".to_owned(),
            followers: "3400".to_owned(),
            likes: "1.2万".to_owned(),
        },
        vec!["first note".to_owned()],
        vec![NoteDetail {
            title: "first note".to_owned(),
            desc: "body".to_owned(),
            like: "7".to_owned(),
            collect: "1".to_owned(),
        }],
        "https://www.xiaohongshu.com/user/profile/alice123",
    )
}

#[tokio::test]
async fn posts_the_camel_case_record_and_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/xhs"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "userName": "Alice",
            "userId": "alice123",
            "allTitles": ["first note"],
            "top10Notes": [{ "title": "first note", "collect": "1" }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "received": true })))
        .expect(1)
        .mount(&server)
        .await;

    let sync = HttpSync::new(format!("{}/webhook/xhs", server.uri()), 5).unwrap();
    let outcome = sync.submit(&sample_record()).await;

    assert!(outcome.success, "outcome: {outcome:?}");
    assert_eq!(outcome.error, None);
}

#[tokio::test]
async fn non_2xx_status_is_a_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sync = HttpSync::new(server.uri(), 5).unwrap();
    let outcome = sync.submit(&sample_record()).await;

    assert!(!outcome.success);
    let error = outcome.error.unwrap();
    assert!(error.contains("HTTP 500"), "error: {error}");
}

#[tokio::test]
async fn unreadable_response_body_is_a_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let sync = HttpSync::new(server.uri(), 5).unwrap();
    let outcome = sync.submit(&sample_record()).await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn disabled_sync_reports_the_unconfigured_wire_value() {
    let outcome = DisabledSync.submit(&sample_record()).await;

    assert!(!outcome.success);
    // Downstream consumers match on the exact string.
    assert_eq!(outcome.error.as_deref(), Some("未配置API地址"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failed_outcome() {
    // Bind-then-drop leaves a port nothing is listening on.
    let server = MockServer::start().await;
    let dead_endpoint = server.uri();
    drop(server);

    let sync = HttpSync::new(dead_endpoint, 1).unwrap();
    let outcome = sync.submit(&sample_record()).await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}
