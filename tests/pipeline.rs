//! End-to-end runs: HTTP feed (wiremock) → pipeline → result file.
//!
//! Each test gets its own mock server and temp directory. Page requests are
//! matched on their exact JSON body so the cursor sequence is checked too.

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tag_news_archive::api::HttpFeedSource;
use tag_news_archive::error::FetchError;
use tag_news_archive::fetcher::{Fetcher, StopReason};
use tag_news_archive::models::FeedRequest;
use tag_news_archive::outputs::writer::SinkWriter;
use tag_news_archive::pacing::NoDelay;
use tag_news_archive::pipeline::{Pipeline, RunReport};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TAG: &str = "krizis-na-ukraine";

fn request_body(cursor: Option<i64>) -> serde_json::Value {
    json!({"tagSlug": TAG, "limit": 2, "lastTimestamp": cursor})
}

fn news(id: i64, date: i64) -> serde_json::Value {
    json!({
        "id": id,
        "mark": "world",
        "title": format!("Story {id}"),
        "link": format!("https://example.com/{id}"),
        "date": date
    })
}

async fn mount_page(server: &MockServer, cursor: Option<i64>, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/userApi/tagNews"))
        .and(body_json(request_body(cursor)))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn run(server: &MockServer, output: &Path) -> RunReport {
    let endpoint = format!("{}/userApi/tagNews", server.uri()).parse().unwrap();
    let source = HttpFeedSource::new(endpoint, Duration::from_secs(5)).unwrap();
    Pipeline::from_parts(
        Fetcher::new(source, NoDelay, FeedRequest::first_page(TAG, 2)),
        SinkWriter::new(output).with_timezone(Utc),
        2,
    )
    .run()
    .await
}

#[tokio::test]
async fn test_walks_feed_until_list_end() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        ResponseTemplate::new(200).set_body_json(json!({
            "tagNews": [news(1, 7200), news(2, 3600)],
            "timestamp": 9000,
            "listEnd": false
        })),
    )
    .await;
    mount_page(
        &server,
        Some(3600),
        ResponseTemplate::new(200).set_body_json(json!({
            "tagNews": [news(3, 1800)],
            "timestamp": 9001,
            "listEnd": true
        })),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("result.txt");
    let report = run(&server, &output).await;

    assert!(report.is_complete());
    assert_eq!(report.fetch.pages, 2);
    assert_eq!(report.records(), 3);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "1970-01-01T02:00:00 Story 1 <https://example.com/1>\n\
         1970-01-01T01:00:00 Story 2 <https://example.com/2>\n\
         1970-01-01T12:30:00 Story 3 <https://example.com/3>\n"
    );
}

#[tokio::test]
async fn test_server_error_ends_run_with_partial_archive() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        ResponseTemplate::new(200).set_body_json(json!({
            "tagNews": [news(1, 7200), news(2, 3600)],
            "listEnd": false
        })),
    )
    .await;
    mount_page(&server, Some(3600), ResponseTemplate::new(500)).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("result.txt");
    let report = run(&server, &output).await;

    assert!(!report.is_complete());
    assert!(matches!(
        report.fetch.stop,
        StopReason::Failed(FetchError::Status(500))
    ));
    assert_eq!(std::fs::read_to_string(&output).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn test_malformed_page_is_decode_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        ResponseTemplate::new(200).set_body_string("{\"tagNews\": [truncated"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("result.txt");
    let report = run(&server, &output).await;

    assert!(matches!(report.fetch.error(), Some(FetchError::Decode(_))));
    assert_eq!(report.records(), 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[tokio::test]
async fn test_empty_feed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        ResponseTemplate::new(200).set_body_json(json!({"tagNews": [], "listEnd": true})),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("archive/result.txt");
    let report = run(&server, &output).await;

    assert!(report.is_complete());
    assert!(matches!(report.fetch.stop, StopReason::Exhausted));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}
