//! Tests for the portal API module

use super::*;
use crate::error::Error;
use crate::models::ScheduleStatus;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> PortalClient {
    let config = ApiClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();
    PortalClient::with_config(config)
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_api_client_config_default() {
    let config = ApiClientConfig::default();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_api_client_config_builder() {
    let config = ApiClientConfig::builder()
        .base_url("https://backend.test")
        .timeout(Duration::from_secs(5))
        .max_retries(1)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(2),
        )
        .header("X-Portal", "ricescan")
        .user_agent("test-agent/1.0")
        .no_rate_limit()
        .build();

    assert_eq!(config.base_url, "https://backend.test");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 1);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(
        config.default_headers.get("X-Portal"),
        Some(&"ricescan".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_backoff_delays() {
    let client = |backoff_type| {
        ApiClient::with_config(
            ApiClientConfig::builder()
                .backoff(
                    backoff_type,
                    Duration::from_millis(100),
                    Duration::from_millis(500),
                )
                .no_rate_limit()
                .build(),
        )
    };

    let constant = client(BackoffType::Constant);
    assert_eq!(constant.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(constant.backoff_delay(4), Duration::from_millis(100));

    let linear = client(BackoffType::Linear);
    assert_eq!(linear.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(linear.backoff_delay(2), Duration::from_millis(300));

    let exponential = client(BackoffType::Exponential);
    assert_eq!(exponential.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(exponential.backoff_delay(2), Duration::from_millis(400));
    // Capped at the configured maximum
    assert_eq!(exponential.backoff_delay(10), Duration::from_millis(500));
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_envelope_success_into_result() {
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": true, "data": [1, 2, 3], "count": 3})).unwrap();
    assert_eq!(response.into_result().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_envelope_failure_into_result() {
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": false, "message": "Farmer not found"})).unwrap();
    let err = response.into_result().unwrap_err();
    assert!(matches!(err, Error::Api { ref message } if message == "Farmer not found"));
}

#[test]
fn test_envelope_failure_falls_back_to_error_field() {
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": false, "error": "boom"})).unwrap();
    let err = response.into_result().unwrap_err();
    assert!(matches!(err, Error::Api { ref message } if message == "boom"));
}

#[test]
fn test_envelope_success_without_data_is_error() {
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": true})).unwrap();
    assert!(response.into_result().is_err());
}

#[test]
fn test_envelope_into_unit_ignores_payload() {
    let ok: ApiResponse<crate::types::JsonValue> =
        serde_json::from_value(json!({"success": true, "message": "Deleted"})).unwrap();
    assert!(ok.into_unit().is_ok());

    let failed: ApiResponse<crate::types::JsonValue> =
        serde_json::from_value(json!({"success": false, "message": "Nope"})).unwrap();
    assert!(failed.into_unit().is_err());
}

#[test]
fn test_envelope_into_listing() {
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": true, "data": [1, 2], "count": 20})).unwrap();
    let listing = response.into_listing().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing.total(), 20);

    // Without a server count, fall back to the received length
    let response: ApiResponse<Vec<u32>> =
        serde_json::from_value(json!({"success": true, "data": [1, 2]})).unwrap();
    assert_eq!(response.into_listing().unwrap().total(), 2);
}

#[test]
fn test_listing_into_pager() {
    let listing = Listing {
        items: (1..=23).collect::<Vec<u32>>(),
        count: Some(23),
    };
    let pager = listing.into_pager(10);
    assert_eq!(pager.total_pages(), 3);
    assert_eq!(pager.current_slice().len(), 10);
}

// ============================================================================
// Transport Tests
// ============================================================================

#[tokio::test]
async fn test_client_retries_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/farmers"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/farmers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "count": 0
        })))
        .mount(&server)
        .await;

    let listing = test_client(&server).farmers().get_all().await.unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_client_404_is_http_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/farmers/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .farmers()
        .get_by_id("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_client_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/farmers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server).farmers().get_all().await;
    assert!(result.is_err());
}

// ============================================================================
// Resource Tests
// ============================================================================

#[tokio::test]
async fn test_farmers_get_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/farmers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "f1", "pcicid": "PCIC-001", "fname": "Juan", "lname": "Dela Cruz"},
                {"id": "f2", "pcicid": "PCIC-002", "fname": "Maria", "lname": "Santos"}
            ],
            "count": 2
        })))
        .mount(&server)
        .await;

    let listing = test_client(&server).farmers().get_all().await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing.items[0].full_name(), "Juan Dela Cruz");
}

#[tokio::test]
async fn test_farmers_create_sends_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/farmers"))
        .and(body_json(json!({
            "pcicid": "PCIC-003",
            "password": "secret",
            "fname": "Pedro",
            "lname": "Reyes"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"id": "f3", "pcicid": "PCIC-003", "fname": "Pedro", "lname": "Reyes"}
        })))
        .mount(&server)
        .await;

    let farmer = test_client(&server)
        .farmers()
        .create(&NewFarmer {
            pcicid: "PCIC-003".to_string(),
            password: "secret".to_string(),
            fname: "Pedro".to_string(),
            mname: None,
            lname: "Reyes".to_string(),
            contact: None,
            address: None,
        })
        .await
        .unwrap();

    assert_eq!(farmer.id, "f3");
}

#[tokio::test]
async fn test_farmers_delete_uses_pcicid() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/farmers/PCIC-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Farmer deleted"
        })))
        .mount(&server)
        .await;

    test_client(&server)
        .farmers()
        .delete("PCIC-001")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_schedules_get_by_status_filters_locally() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "s1", "farmer_id": "f1", "admin_id": "a1",
                 "scheduled_date": "2025-06-10T08:00:00Z", "status": "pending"},
                {"id": "s2", "farmer_id": "f2", "admin_id": "a1",
                 "scheduled_date": "2025-06-11T08:00:00Z", "status": "done"},
                {"id": "s3", "farmer_id": "f3", "admin_id": "a1",
                 "scheduled_date": "2025-06-12T08:00:00Z", "status": "pending"}
            ],
            "count": 3
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let pending = client
        .schedules()
        .get_by_status(ScheduleStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);

    let stats = client.schedules().stats().await.unwrap();
    assert_eq!((stats.total, stats.pending, stats.done), (3, 2, 1));
}

#[tokio::test]
async fn test_schedules_mark_as_done() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/schedules/s1/done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Schedule updated"
        })))
        .mount(&server)
        .await;

    test_client(&server)
        .schedules()
        .mark_as_done("s1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_schedules_link_evidence_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/schedules/link-evidence"))
        .and(body_json(json!({"farmerId": "f1", "scheduleId": "s1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    test_client(&server)
        .schedules()
        .link_evidence("f1", "s1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_evidence_get_unlinked_with_farmer_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/evidence/unlinked/all"))
        .and(query_param("farmerId", "f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "count": 0
        })))
        .mount(&server)
        .await;

    let listing = test_client(&server)
        .evidence()
        .get_unlinked(Some("f1"))
        .await
        .unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_evidence_delete_for_farmer_deletes_each() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/evidence/farmer/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "e1", "farmer_id": "f1", "image_url": "https://cdn.test/e1.jpg",
                 "captured_at": "2025-06-01T09:00:00Z"},
                {"id": "e2", "farmer_id": "f1", "image_url": "https://cdn.test/e2.jpg",
                 "captured_at": "2025-06-02T09:00:00Z"}
            ],
            "count": 2
        })))
        .mount(&server)
        .await;

    for id in ["e1", "e2"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/evidence/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let deleted = test_client(&server)
        .evidence()
        .delete_for_farmer("f1")
        .await
        .unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn test_evidence_download_image() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photos/e1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let evidence: crate::models::Evidence = serde_json::from_value(json!({
        "id": "e1",
        "farmer_id": "f1",
        "image_url": format!("{}/photos/e1.jpg", server.uri()),
        "captured_at": "2025-06-01T09:00:00Z"
    }))
    .unwrap();

    let bytes = test_client(&server)
        .evidence()
        .download_image(&evidence)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), &[0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_diseases_search_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/diseases"))
        .and(query_param("search", "blast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": "d1", "name": "Rice blast"}],
            "count": 1
        })))
        .mount(&server)
        .await;

    let listing = test_client(&server).diseases().search("blast").await.unwrap();
    assert_eq!(listing.items[0].name, "Rice blast");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_auth_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"identifier": "PCIC-001", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userType": "farmer",
            "userId": "f1",
            "user": {"fname": "Juan", "pcicid": "PCIC-001"}
        })))
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .auth()
        .login("PCIC-001", "secret")
        .await
        .unwrap();

    assert_eq!(outcome.user_id, "f1");
    assert_eq!(outcome.display_name(), "Juan");
}

#[tokio::test]
async fn test_auth_login_rejection_becomes_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .auth()
        .login("PCIC-001", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth { ref message } if message == "Invalid credentials"));
}
