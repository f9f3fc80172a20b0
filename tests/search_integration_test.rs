//! End-to-end search tests: coordinator, service, transport and mapper against
//! a mock export API

use mockito::{Matcher, Server};
use rollcall::adapters::export_api::{RegistrationService, RegistrationSource};
use rollcall::config::ClientConfig;
use rollcall::core::export::{ExportCoordinator, SearchFilter, SearchOptions};
use rollcall::domain::{EventId, ExportApiError, ExportQuery, RegistrationRecord, RollcallError};
use std::sync::Arc;
use tokio::sync::watch;

const REGISTRANTS: &str = "/export/registrants/42.json";

fn config(address: &str) -> Arc<ClientConfig> {
    Arc::new(
        ClientConfig::builder(address)
            .token("token")
            .retry_max(1)
            .retry_backoff_base_ms(0)
            .page_size(2)
            .default_event_id(42)
            .build()
            .unwrap(),
    )
}

fn coordinator(address: &str) -> ExportCoordinator {
    let (_tx, rx) = watch::channel(false);
    ExportCoordinator::new(config(address), rx).unwrap()
}

fn event() -> EventId {
    EventId::new(42).unwrap()
}

const PAGE_ONE: &str = r#"{
    "registrants": [
        {"registrationId": "r1", "email": "alice@example.org", "fullName": "Alice"},
        {"registration_id": 2, "person": {"email": "bob@example.org", "full_name": "Bob"}}
    ],
    "next": "2"
}"#;

const PAGE_TWO: &str = r#"{
    "results": [
        {"registrationId": "r3", "eventId": 42, "checkedIn": true}
    ],
    "paging": {"next": null}
}"#;

async fn two_page_server() -> (mockito::ServerGuard, mockito::Mock, mockito::Mock) {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::Exact("limit=2".into()))
        .with_status(200)
        .with_body(PAGE_ONE)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::Exact("limit=2&page=2".into()))
        .with_status(200)
        .with_body(PAGE_TWO)
        .expect(1)
        .create_async()
        .await;
    (server, first, second)
}

#[tokio::test]
async fn test_full_export_over_two_pages() {
    let (server, first, second) = two_page_server().await;
    let coordinator = coordinator(&server.url());
    let mut records: Vec<RegistrationRecord> = Vec::new();

    let summary = coordinator
        .execute_query(SearchFilter::new(), SearchOptions::default(), |record| {
            records.push(record);
            true
        })
        .await
        .unwrap();

    let ids: Vec<&str> = records.iter().map(|r| r.registration_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "2", "r3"]);
    assert_eq!(records[1].email.as_deref(), Some("bob@example.org"));
    assert_eq!(records[1].full_name.as_deref(), Some("Bob"));
    assert_eq!(records[2].checked_in, Some(true));
    assert!(records.iter().all(|r| r.event_id == event()));
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.records_delivered, 3);

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_email_filter_matches_person_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::UrlEncoded("email".into(), "BOB@example.org".into()))
        .with_status(200)
        .with_body(PAGE_ONE.replace(r#""next": "2""#, r#""next": null"#))
        .expect(1)
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    let mut ids = Vec::new();
    let summary = coordinator
        .execute_query(
            SearchFilter::new().email("BOB@example.org"),
            SearchOptions::default(),
            |record| {
                ids.push(record.registration_id);
                true
            },
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["2"]);
    assert_eq!(summary.records_filtered, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_point_lookup_stops_on_match() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::UrlEncoded("registration_id".into(), "r1".into()))
        .with_status(200)
        .with_body(PAGE_ONE)
        .expect(1)
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    let mut ids = Vec::new();
    coordinator
        .execute_query(
            SearchFilter::new().registration_id("r1"),
            SearchOptions::default(),
            |record| {
                ids.push(record.registration_id);
                true
            },
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["r1"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_point_lookup_miss_is_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"registrants": []}"#)
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    let err = coordinator
        .execute_query(
            SearchFilter::new().registration_id("missing"),
            SearchOptions::default(),
            |_| true,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RollcallError::NotFound(ref id) if id == "missing"));
}

#[tokio::test]
async fn test_consumer_stop_prevents_second_fetch() {
    let (server, first, second) = two_page_server().await;
    let coordinator = coordinator(&server.url());

    let summary = coordinator
        .search(ExportQuery::new(event()).limit(Some(2)), |_| false)
        .await
        .unwrap();

    assert!(summary.stopped_by_consumer);
    assert_eq!(summary.records_delivered, 1);
    first.assert_async().await;
    assert!(!second.matched_async().await);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_format() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", REGISTRANTS)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let coordinator = coordinator(&server.url());
    let err = coordinator
        .search(ExportQuery::new(event()), |_| true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RollcallError::ExportApi(ExportApiError::InvalidFormat(_))
    ));
}

#[tokio::test]
async fn test_service_fetch_maps_single_page() {
    let (server, first, _second) = two_page_server().await;
    let service = RegistrationService::from_config(&config(&server.url()), None).unwrap();

    let page = service
        .fetch_registrations(&ExportQuery::new(event()).limit(Some(2)))
        .await
        .unwrap();

    assert_eq!(page.records().len(), 2);
    assert_eq!(page.next_page_token(), Some("2"));
    first.assert_async().await;
}

#[tokio::test]
async fn test_connection_probe() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/export/categories.json")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    coordinator(&server.url()).test_connection().await.unwrap();
    ok.assert_async().await;
}

#[tokio::test]
async fn test_connection_probe_rejected_credentials() {
    let mut server = Server::new_async().await;
    let _denied = server
        .mock("GET", "/export/categories.json")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let err = coordinator(&server.url()).test_connection().await.unwrap_err();
    assert!(matches!(
        err,
        RollcallError::ExportApi(ExportApiError::Unauthorized { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_missing_event_id_is_invalid_input() {
    let config = Arc::new(
        ClientConfig::builder("https://events.example.org")
            .token("token")
            .build()
            .unwrap(),
    );
    let (_tx, rx) = watch::channel(false);
    let coordinator = ExportCoordinator::new(config, rx).unwrap();

    let err = coordinator
        .execute_query(SearchFilter::new(), SearchOptions::default(), |_| true)
        .await
        .unwrap_err();
    assert!(matches!(err, RollcallError::InvalidInput(_)));
}
