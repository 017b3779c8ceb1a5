//! Behavior-driven tests for fetching the feed
//!
//! These tests verify HOW the fetch behaves against a live local HTTP server:
//! successful bodies flow into ingestion, transient failures are retried, and
//! a run gives up after the configured number of attempts.

use std::io::Cursor;
use std::time::Duration;

use citypulse_core::{
    fetch_body, AggregationStore, FetchConfig, FetchError, LineProcessor, ParseSummary,
    ReqwestHttpClient, RetryConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = concat!(
    r#"{"age":78,"name":"Eli","city":"Austin","friends":[{"name":"Robert","hobbies":["Travel"]}]}"#,
    "\n",
    r#"{"age":48,"name":"Evy","city":"Austin","friends":[]}"#,
    "\n",
);

/// Mounts the replies so that each answers one request, in order.
async fn serve(replies: Vec<ResponseTemplate>) -> MockServer {
    let server = MockServer::start().await;
    for reply in replies {
        Mock::given(method("GET"))
            .and(path("/people"))
            .respond_with(reply)
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }
    server
}

async fn hits(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .len()
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/people", server.uri())
}

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::with_client(
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client builds"),
    )
}

fn config(max_attempts: u32) -> FetchConfig {
    FetchConfig {
        timeout_ms: 5_000,
        retry: RetryConfig::fixed(Duration::from_millis(10), max_attempts),
    }
}

fn ingest(body: Vec<u8>) -> (AggregationStore, ParseSummary) {
    let mut store = AggregationStore::new();
    let summary = LineProcessor::new(&mut store)
        .process_reader(Cursor::new(body))
        .expect("in-memory body is readable");
    (store, summary)
}

#[tokio::test]
async fn fetched_feed_is_ingested() {
    // Given: an endpoint serving two Austin records
    let server = serve(vec![ResponseTemplate::new(200).set_body_string(FEED)]).await;

    // When: the feed is fetched and ingested
    let body = fetch_body(&client(), &endpoint(&server), &config(3))
        .await
        .expect("fetch succeeds");
    let (store, summary) = ingest(body);

    // Then
    assert_eq!(hits(&server).await, 1);
    assert_eq!(summary.valid, 2);
    assert_eq!(store.city("Austin").map(|c| c.person_count()), Some(2));
}

#[tokio::test]
async fn invalid_utf8_in_the_body_rejects_only_that_line() {
    // Given: the second record's name is not UTF-8
    let mut feed = Vec::new();
    feed.extend_from_slice(br#"{"age":1,"name":"Eli","city":"Austin","friends":[]}"#);
    feed.extend_from_slice(b"\n");
    feed.extend_from_slice(b"{\"age\":2,\"name\":\"\xff\xfe\",\"city\":\"Austin\",\"friends\":[]}\n");
    let server = serve(vec![ResponseTemplate::new(200).set_body_bytes(feed)]).await;

    // When
    let body = fetch_body(&client(), &endpoint(&server), &config(1))
        .await
        .expect("fetch succeeds");
    let (store, summary) = ingest(body);

    // Then: the bytes arrive untouched and the broken line is invalid
    assert_eq!(summary, ParseSummary { valid: 1, invalid: 1 });
    assert_eq!(store.name_counts().len(), 1);
    assert_eq!(store.name_count("Eli"), 1);
    assert_eq!(store.city("Austin").map(|c| c.person_count()), Some(1));
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    // Given: the endpoint fails twice before answering
    let server = serve(vec![
        ResponseTemplate::new(500),
        ResponseTemplate::new(503),
        ResponseTemplate::new(200).set_body_string(FEED),
    ])
    .await;

    // When
    let body = fetch_body(&client(), &endpoint(&server), &config(3))
        .await
        .expect("third attempt succeeds");

    // Then
    assert_eq!(hits(&server).await, 3);
    assert_eq!(body, FEED.as_bytes());
}

#[tokio::test]
async fn client_error_statuses_count_as_failed_attempts() {
    // Given: the endpoint keeps answering 404
    let server = serve(vec![
        ResponseTemplate::new(404).set_body_string("missing"),
        ResponseTemplate::new(404).set_body_string("missing"),
    ])
    .await;

    // When
    let error = fetch_body(&client(), &endpoint(&server), &config(2))
        .await
        .expect_err("never succeeds");

    // Then: both attempts were made and the last status is reported
    assert_eq!(hits(&server).await, 2);
    match error {
        FetchError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 2);
            assert_eq!(last.message(), "HTTP error: 404");
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_exhausts_attempts() {
    // Given: a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = listener.local_addr().expect("addr");
    drop(listener);

    // When
    let error = fetch_body(&client(), &format!("http://{address}/"), &config(2))
        .await
        .expect_err("connection refused");

    // Then
    assert!(matches!(error, FetchError::Exhausted { attempts: 2, .. }));
    assert!(error.last_error().retryable());
}
