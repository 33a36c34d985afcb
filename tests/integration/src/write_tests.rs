//! Create and delete integration tests

use crate::fixtures::*;
use crate::helpers::*;
use employee_core::{EmployeeCreateRequest, EmployeeError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn create_path() -> String {
    format!("{BASE_PATH}/createEmployee")
}

/// A create is posted upstream and invalidates the cached collection
#[tokio::test]
async fn test_create_invalidates_cache() {
    let upstream = UpstreamMock::start().await;
    upstream.serve_roster(&sample_roster(), 2).await;

    let created = wire_employee("Jill Jenkins", 139_082);
    Mock::given(method("POST"))
        .and(path(create_path()))
        .and(body_partial_json(json!({
            "name": "Jill Jenkins",
            "salary": 139_082,
            "age": 48,
            "title": "Financial Advisor",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_body(&created)))
        .expect(1)
        .mount(upstream.server())
        .await;

    let service = build_service(&fast_config(&upstream.base_url()));
    service.get_all_employees().await.expect("warm cache");

    let request = EmployeeCreateRequest::new("Jill Jenkins", 139_082, 48, "Financial Advisor");
    let employee = service.create_employee(request).await.expect("created");
    assert_eq!(employee, domain(&created));

    service.get_all_employees().await.expect("refetched");
    assert_eq!(service.cache_stats().misses, 2);
}

/// Invalid input never reaches the upstream
#[tokio::test]
async fn test_create_validation_is_local() {
    let upstream = UpstreamMock::start().await;
    let service = build_service(&fast_config(&upstream.base_url()));

    let missing_title = EmployeeCreateRequest::new("Jill", 100, 30, "   ");
    assert!(matches!(
        service.create_employee(missing_title).await,
        Err(EmployeeError::Validation { .. })
    ));

    let missing_salary = EmployeeCreateRequest {
        salary: None,
        ..EmployeeCreateRequest::new("Jill", 100, 30, "Advisor")
    };
    assert!(matches!(
        service.create_employee(missing_salary).await,
        Err(EmployeeError::Validation { .. })
    ));

    assert_eq!(upstream.request_count().await, 0);
}

/// A throttled create yields the placeholder after exhausting retries
#[tokio::test]
async fn test_throttled_create_returns_placeholder() {
    let upstream = UpstreamMock::start().await;
    Mock::given(method("POST"))
        .and(path(create_path()))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .expect(3)
        .mount(upstream.server())
        .await;

    let service = build_service(&fast_config(&upstream.base_url()));
    let request = EmployeeCreateRequest::new("Jill", 100, 30, "Advisor");

    let employee = service.create_employee(request).await.expect("placeholder");
    assert!(employee.is_placeholder());
}

/// Delete resolves the id to a name and deletes by name
#[tokio::test]
async fn test_delete_by_id() {
    let upstream = UpstreamMock::start().await;
    let roster = sample_roster();
    let target = roster[5].clone();
    upstream.serve_roster(&roster, 2).await;

    Mock::given(method("DELETE"))
        .and(path(BASE_PATH))
        .and(body_json(json!({"name": target.employee_name})))
        .respond_with(ResponseTemplate::new(200).set_body_json(deleted_body()))
        .expect(1)
        .mount(upstream.server())
        .await;

    let service = build_service(&fast_config(&upstream.base_url()));

    let ack = service
        .delete_employee_by_id(&target.id.to_string())
        .await
        .expect("deleted");
    let ack: Value = serde_json::from_str(&ack).expect("json acknowledgement");
    assert_eq!(ack, deleted_body());

    // the cache was invalidated
    service.get_all_employees().await.expect("refetched");
}

/// Deleting an unknown id is a not-found error and sends no delete
#[tokio::test]
async fn test_delete_unknown_id() {
    let upstream = UpstreamMock::start().await;
    upstream.serve_roster(&sample_roster(), 1).await;
    Mock::given(method("DELETE"))
        .and(path(BASE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(upstream.server())
        .await;

    let service = build_service(&fast_config(&upstream.base_url()));

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        assert!(matches!(
            service.delete_employee_by_id(&id).await,
            Err(EmployeeError::NotFound { .. })
        ));
    }
}

/// A throttled delete is retried, then answered with the empty acknowledgement
#[tokio::test]
async fn test_throttled_delete_returns_empty_ack() {
    let upstream = UpstreamMock::start().await;
    let roster = sample_roster();
    upstream.serve_roster(&roster, 1).await;
    Mock::given(method("DELETE"))
        .and(path(BASE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(upstream.server())
        .await;

    let service = build_service(&fast_config(&upstream.base_url()));

    let ack = service
        .delete_employee_by_id(&roster[0].id.to_string())
        .await
        .expect("fallback");
    assert_eq!(ack, "");
}
