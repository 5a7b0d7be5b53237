//! Integration tests for the Datadog client using wiremock.
//!
//! These tests verify request shape, authentication headers and status
//! mapping of the PagerDuty integration endpoint.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use datadog_pagerduty::api::{IntegrationApi, IntegrationRequest, ServiceRequest};
use datadog_pagerduty::{ApiError, DatadogClient, DatadogConfig};

const ENDPOINT: &str = "/api/v1/integration/pagerduty";

// =============================================================================
// Test Helpers
// =============================================================================

fn create_client(server: &MockServer) -> DatadogClient {
    let config = DatadogConfig::new("test-api-key", "test-app-key")
        .unwrap()
        .with_host(server.uri())
        .unwrap();
    DatadogClient::new(config).unwrap()
}

fn two_service_request() -> IntegrationRequest {
    IntegrationRequest {
        subdomain: "testdomain".to_string(),
        api_token: Some("*****".to_string()),
        schedules: vec!["https://testdomain.pagerduty.com/schedules#PX1".to_string()],
        services: vec![
            ServiceRequest {
                service_name: "test_service".to_string(),
                service_key: "*****".to_string(),
            },
            ServiceRequest {
                service_name: "test_service_2".to_string(),
                service_key: "*****".to_string(),
            },
        ],
    }
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn test_get_sends_auth_headers_and_decodes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(header("DD-API-KEY", "test-api-key"))
        .and(header("DD-APPLICATION-KEY", "test-app-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [
                {"service_name": "test_service", "service_key": "*****"},
                {"service_name": "test_service_2", "service_key": "*****"}
            ],
            "subdomain": "testdomain",
            "schedules": ["https://testdomain.pagerduty.com/schedules#PX1"],
            "api_token": "*****"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = create_client(&server).get_integration().await.unwrap();

    assert_eq!(doc.subdomain.as_deref(), Some("testdomain"));
    assert_eq!(doc.api_token.as_deref(), Some("*****"));
    assert_eq!(doc.schedules.as_ref().map(Vec::len), Some(1));
    assert_eq!(doc.services.len(), 2);
    assert_eq!(
        doc.services[1].service_name.as_deref(),
        Some("test_service_2")
    );
}

#[tokio::test]
async fn test_get_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"errors": ["Integration not found"]})),
        )
        .mount(&server)
        .await;

    let err = create_client(&server).get_integration().await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("404 Not Found"));
    assert!(err.to_string().contains("Integration not found"));
}

#[tokio::test]
async fn test_get_server_error_is_not_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = create_client(&server).get_integration().await.unwrap_err();

    assert!(!err.is_not_found());
    assert!(matches!(err, ApiError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_get_invalid_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = create_client(&server).get_integration().await.unwrap_err();
    assert!(matches!(err, ApiError::Serialization(_)));
}

#[tokio::test]
async fn test_get_null_services() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"subdomain": "testdomain", "services": null})),
        )
        .mount(&server)
        .await;

    let doc = create_client(&server).get_integration().await.unwrap();
    assert!(doc.services.is_empty());
    assert!(doc.schedules.is_none());
}

// =============================================================================
// Create / Update
// =============================================================================

#[tokio::test]
async fn test_create_posts_full_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("DD-API-KEY", "test-api-key"))
        .and(body_json(json!({
            "services": [
                {"service_name": "test_service", "service_key": "*****"},
                {"service_name": "test_service_2", "service_key": "*****"}
            ],
            "subdomain": "testdomain",
            "schedules": ["https://testdomain.pagerduty.com/schedules#PX1"],
            "api_token": "*****"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    create_client(&server)
        .create_integration(two_service_request())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_omits_absent_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_json(json!({
            "services": [],
            "subdomain": "testdomain",
            "schedules": []
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let req = IntegrationRequest {
        subdomain: "testdomain".to_string(),
        ..Default::default()
    };
    create_client(&server).create_integration(req).await.unwrap();
}

#[tokio::test]
async fn test_create_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"errors": ["Invalid subdomain"]})))
        .mount(&server)
        .await;

    let err = create_client(&server)
        .create_integration(two_service_request())
        .await
        .unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid subdomain");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_uses_put() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    create_client(&server)
        .update_integration(two_service_request())
        .await
        .unwrap();
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ENDPOINT))
        .and(header("DD-APPLICATION-KEY", "test-app-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    create_client(&server).delete_integration().await.unwrap();
}

#[tokio::test]
async fn test_delete_absent_integration_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not Found"]})))
        .expect(1)
        .mount(&server)
        .await;

    let err = create_client(&server).delete_integration().await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_forbidden() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": ["Forbidden"]})))
        .mount(&server)
        .await;

    let err = create_client(&server).delete_integration().await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 403, .. }));
}
