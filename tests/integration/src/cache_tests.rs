//! Cache integration tests
//!
//! Every read shares the fetched collection while it is fresh; concurrent
//! reads share one fetch; error-tagged results are never stored.

use crate::fixtures::*;
use crate::helpers::*;
use employee_core::RATE_LIMIT_MESSAGE;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use std::time::Duration;

/// Every read-shaped operation is served by one upstream fetch
#[tokio::test]
async fn test_reads_within_ttl_share_one_fetch() {
    let upstream = UpstreamMock::start().await;
    let roster = sample_roster();
    upstream.serve_roster(&roster, 1).await;

    let service = build_service(&fast_config(&upstream.base_url()));

    let all = service.get_all_employees().await.expect("collection");
    assert_eq!(all.data().len(), roster.len());

    let found = service.get_employees_by_name("cox").await.expect("search");
    assert_eq!(found.data().len(), 1);

    let id = roster[3].id.to_string();
    let cedric = service.get_employee_by_id(&id).await.expect("by id");
    assert_eq!(cedric.name, "Cedric Kelly");

    let max = service.get_highest_salary_of_employees().await.expect("max");
    assert_eq!(max, Some(320_800));

    let top = service
        .get_top_ten_highest_earning_employee_names()
        .await
        .expect("top ten");
    assert_eq!(top.len(), 10);

    let stats = service.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 4);
}

/// Concurrent readers of a cold cache trigger a single fetch
#[tokio::test]
async fn test_concurrent_reads_share_one_fetch() {
    let upstream = UpstreamMock::start().await;
    upstream.serve_roster(&sample_roster(), 1).await;

    let mut config = fast_config(&upstream.base_url());
    config.cache.ttl = Duration::ZERO;
    let service = build_service(&config);

    let results = join_all((0..8).map(|_| service.get_all_employees())).await;

    assert!(results
        .iter()
        .all(|result| result.as_ref().is_ok_and(|c| c.data().len() == 12)));
    assert_eq!(upstream.request_count().await, 1);
    assert_eq!(service.cache_stats().shared, 7);
}

/// An expired entry is refetched
#[tokio::test]
async fn test_expired_entry_refetches() {
    let upstream = UpstreamMock::start().await;
    upstream.serve_roster(&sample_roster(), 2).await;

    let mut config = fast_config(&upstream.base_url());
    config.cache.ttl = Duration::from_millis(100);
    let service = build_service(&config);

    service.get_all_employees().await.expect("first");
    service.get_all_employees().await.expect("cached");
    assert_eq!(upstream.request_count().await, 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    service.get_all_employees().await.expect("refetched");
    assert_eq!(upstream.request_count().await, 2);
}

/// A throttled read is not cached; the next read fetches again
#[tokio::test]
async fn test_rate_limit_fallback_is_not_cached() {
    let upstream = UpstreamMock::start().await;
    upstream.fail_fetches(429, 3).await;
    upstream.serve_roster(&sample_roster(), 1).await;

    let mut config = fast_config(&upstream.base_url());
    config.circuit_breaker.minimum_calls = 4;
    let service = build_service(&config);

    let degraded = service.get_all_employees().await.expect("fallback");
    assert_eq!(degraded.error_message(), Some(RATE_LIMIT_MESSAGE));
    assert!(degraded.data().is_empty());

    let fresh = service.get_all_employees().await.expect("collection");
    assert!(fresh.is_ok());
    assert_eq!(fresh.data().len(), 12);

    // now cached
    service.get_all_employees().await.expect("cached");
    assert_eq!(upstream.request_count().await, 4);
}
