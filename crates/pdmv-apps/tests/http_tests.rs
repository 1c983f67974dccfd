//! End-to-end tests over HTTP.
//!
//! These tests run the application clients against wiremock servers to check
//! URL layout, authentication headers, bodies on the wire and how each error
//! kind reaches the caller.

use pdmv_apps::{ClientConfig, ClientError, RelMonService, RelVal, RelmonListParams, SearchParams};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test fixture providing a mock server and a config pointing at it.
struct TestFixture {
    /// Mock PdmV server.
    server: MockServer,
    /// Test client configuration.
    config: ClientConfig,
}

impl TestFixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::default()
            .with_server_root(server.uri())
            .with_cookie("session=test-cookie")
            .with_timeout_secs(2);

        Self { server, config }
    }

    fn relmon(&self) -> RelMonService {
        RelMonService::new(self.config.clone()).expect("Should build RelMonService client")
    }

    fn relval(&self) -> RelVal {
        RelVal::new(self.config.clone()).expect("Should build RelVal client")
    }
}

// =============================================================================
// Request layout
// =============================================================================

#[tokio::test]
async fn test_relmon_list_over_http() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relmonservice/api/get_relmons"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "5"))
        .and(header("Cookie", "session=test-cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "r-1", "name": "CMSSW_14_0_0"}],
            "total_rows": 1
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let response = fixture
        .relmon()
        .get_relmons(RelmonListParams::new().page(1).limit(5))
        .await
        .expect("Should list relmons");

    assert_eq!(response["total_rows"], 1);
    assert_eq!(response["data"][0]["id"], "r-1");
}

#[tokio::test]
async fn test_relmon_delete_over_http() {
    let fixture = TestFixture::new().await;

    Mock::given(method("DELETE"))
        .and(path("/relmonservice/api/delete"))
        .and(query_param("id", "id123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let response = fixture.relmon().delete("id123").await.expect("Should delete");
    assert_eq!(response["success"], true);

    let requests = fixture.server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_relval_create_sends_json_body() {
    let fixture = TestFixture::new().await;
    let relval = serde_json::json!({
        "campaign_timestamp": 0,
        "cmssw_release": "CMSSW_14_0_0",
        "steps": []
    });

    Mock::given(method("PUT"))
        .and(path("/relval/api/relvals/create"))
        .and(body_json(relval.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"prepid": "CMSSW_14_0_0__fullsim-00001"},
            "success": true
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let response = fixture.relval().create(relval).await.expect("Should create relval");
    assert_eq!(response["response"]["prepid"], "CMSSW_14_0_0__fullsim-00001");
}

#[tokio::test]
async fn test_relval_search_query_on_the_wire() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relval/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"results": [], "total_rows": 0},
            "success": true
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    fixture
        .relval()
        .search(
            "relvals",
            SearchParams::new()
                .limit(5000)
                .sort_asc(true)
                .filter("status", vec!["new", "submitted"]),
        )
        .await
        .expect("Should search");

    let requests = fixture.server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("db_name=relvals&page=0&limit=500&sort_asc=true&status=new,submitted")
    );
}

#[tokio::test]
async fn test_relval_cmsdriver_returns_text() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relval/api/relvals/get_cmsdriver/ABC-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("#!/bin/bash\n\ncmsDriver.py step1 --conditions auto:phase1_2024_realistic\n"),
        )
        .expect(1)
        .mount(&fixture.server)
        .await;

    let script = fixture
        .relval()
        .get_cmsdriver("ABC-1")
        .await
        .expect("Should fetch script");
    assert!(script.contains("cmsDriver.py step1"));
}

// =============================================================================
// Authentication headers
// =============================================================================

#[tokio::test]
async fn test_client_credentials_bearer_token() {
    let server = MockServer::start().await;
    let config = ClientConfig::default()
        .with_server_root(server.uri())
        .with_client_credentials("pdmv-app", "pdmv-secret")
        .with_access_token("test-token");

    Mock::given(method("GET"))
        .and(path("/relmonservice/api/user"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "pdmv-app",
            "role": "service"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RelMonService::new(config).expect("Should build client");
    let user = client.user().await.expect("Should fetch user");
    assert_eq!(user["username"], "pdmv-app");
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn test_not_found_surfaces_status() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relval/api/tickets/get/MISSING"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Object not found"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let err = fixture.relval().get_ticket("MISSING").await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Object not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_authentication_failure() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/relmonservice/api/update"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "Forbidden"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let err = fixture
        .relmon()
        .update(serde_json::json!({"id": "r-1"}))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_server_error_handling() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relmonservice/api/tick"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let err = fixture.relmon().tick().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_invalid_json_surfaces_decode_error() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relval/api/relvals/get_default_step"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sign in</html>"))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let err = fixture.relval().get_default_step().await.unwrap_err();
    match err {
        ClientError::Decode { body, .. } => assert_eq!(body, "<html>Sign in</html>"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_service_timeout_handling() {
    let fixture = TestFixture::new().await;

    Mock::given(method("GET"))
        .and(path("/relval/api/relvals/get/SLOW-1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let err = fixture.relval().get_relval("SLOW-1").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_connection_refused() {
    let config = ClientConfig::default()
        .with_server_root("http://127.0.0.1:1")
        .with_timeout_secs(2);

    let err = RelVal::new(config)
        .expect("Should build client")
        .get_default_step()
        .await
        .unwrap_err();
    assert!(err.is_network());
}
