//! HTTP API end-to-end tests
//!
//! The facade runs on a real socket in front of a `wiremock` upstream.

use crate::fixtures::*;
use crate::helpers::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn start(upstream: &UpstreamMock) -> TestServer {
    let config = fast_config(&upstream.base_url());
    let service = build_service(&config);
    TestServer::start(&config, service).await
}

#[tokio::test]
async fn test_health() {
    let upstream = UpstreamMock::start().await;
    let server = start(&upstream).await;

    let response = server.get("/health").await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_read_endpoints() {
    let upstream = UpstreamMock::start().await;
    let roster = sample_roster();
    upstream.serve_roster(&roster, 1).await;
    let server = start(&upstream).await;

    let response = server.get(BASE_PATH).await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(12));
    assert_eq!(body[0]["name"], "Tiger Nixon");

    let response = server.get(&format!("{BASE_PATH}/search/NIX")).await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = server.get(&format!("{BASE_PATH}/{}", roster[2].id)).await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["name"], "Ashton Cox");

    let response = server.get(&format!("{BASE_PATH}/highestSalary")).await;
    assert_status(&response, 200);
    assert_eq!(TestServer::json_body(response).await, json!(320_800));

    let response = server
        .get(&format!("{BASE_PATH}/topTenHighestEarningEmployeeNames"))
        .await;
    assert_status(&response, 200);
    let names = TestServer::json_body(response).await;
    let expected: Vec<&str> = roster
        .iter()
        .take(10)
        .map(|employee| employee.employee_name.as_str())
        .collect();
    assert_eq!(names, json!(expected));
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let upstream = UpstreamMock::start().await;
    upstream.serve_roster(&sample_roster(), 1).await;
    let server = start(&upstream).await;

    let response = server.get(&format!("{BASE_PATH}/{}", uuid::Uuid::new_v4())).await;
    assert_status(&response, 404);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_create_and_delete() {
    let upstream = UpstreamMock::start().await;
    let roster = sample_roster();
    upstream.serve_roster(&roster, 1).await;

    let created = wire_employee("Jill Jenkins", 139_082);
    Mock::given(method("POST"))
        .and(path(format!("{BASE_PATH}/createEmployee")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .expect(1)
        .mount(upstream.server())
        .await;
    Mock::given(method("DELETE"))
        .and(path(BASE_PATH))
        .and(body_json(json!({"name": roster[1].employee_name})))
        .respond_with(ResponseTemplate::new(200).set_body_json(deleted_body()))
        .expect(1)
        .mount(upstream.server())
        .await;

    let server = start(&upstream).await;

    let response = server
        .post_json(
            BASE_PATH,
            &json!({"name": "Jill Jenkins", "salary": 139_082, "age": 48, "title": "Financial Advisor"}),
        )
        .await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["id"], json!(created.id));
    assert_eq!(body["name"], "Jill Jenkins");

    let response = server.delete(&format!("{BASE_PATH}/{}", roster[1].id)).await;
    assert_status(&response, 200);
}

#[tokio::test]
async fn test_invalid_create_is_400() {
    let upstream = UpstreamMock::start().await;
    let server = start(&upstream).await;

    let response = server
        .post_json(BASE_PATH, &json!({"name": "Jill", "age": 48, "title": "Advisor"}))
        .await;
    assert_status(&response, 400);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(upstream.request_count().await, 0);
}

#[tokio::test]
async fn test_upstream_failures_map_to_status() {
    let upstream = UpstreamMock::start().await;
    upstream.fail_fetches(503, 1).await;
    upstream.fail_fetches(429, 3).await;
    let server = start(&upstream).await;

    // unavailable upstream
    let response = server.get(BASE_PATH).await;
    assert_status(&response, 502);

    // throttled upstream, degraded collection
    let response = server.get(BASE_PATH).await;
    assert_status(&response, 503);
    let body = TestServer::json_body(response).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_circuits_endpoint() {
    let upstream = UpstreamMock::start().await;
    upstream.fail_fetches(500, 2).await;
    let server = start(&upstream).await;

    for _ in 0..2 {
        assert_status(&server.get(BASE_PATH).await, 502);
    }

    let response = server.get("/admin/circuits").await;
    assert_status(&response, 200);
    let body = TestServer::json_body(response).await;
    let get_all = body["circuits"]
        .as_array()
        .and_then(|circuits| circuits.iter().find(|c| c["operation"] == "getAll"))
        .cloned()
        .expect("getAll listed");
    assert_eq!(get_all["state"], "open");
    assert_eq!(get_all["failures"], 2);
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let upstream = UpstreamMock::start().await;
    let server = start(&upstream).await;

    assert_status(&server.get("/health").await, 200);
    server.shutdown().await.expect("clean shutdown");
}
