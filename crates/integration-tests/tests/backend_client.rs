//! REST client behavior against a mocked store backend.

use serde_json::json;
use storedesk_admin::backend::BackendError;
use storedesk_admin::backend::TokenStore;
use storedesk_admin::backend::types::OrdersQuery;
use storedesk_core::{AdminId, OrderId};
use storedesk_integration_tests::{order_json, session_with};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orders_envelope() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "orders": [order_json("o-1", "ORD-1001", "pending", "pending")],
            "pagination": { "total": 1, "page": 1, "per_page": 10, "pages": 1 }
        }
    })
}

fn first_page() -> OrdersQuery {
    OrdersQuery {
        page: 1,
        per_page: 10,
        ..OrdersQuery::default()
    }
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_once_and_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_envelope()))
        .expect(1)
        .mount(&server)
        .await;

    let api = session_with(&server, "stale", "refresh-1");
    let page = api.list_orders(&first_page()).await.expect("orders after refresh");

    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].order_number, "ORD-1001");
    let tokens = api.store().load_tokens().await.expect("tokens kept");
    assert_eq!(tokens.access_token, "fresh");
    assert_eq!(tokens.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_second_unauthorized_is_returned_without_another_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not allowed"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = session_with(&server, "stale", "refresh-1");
    let result = api.list_orders(&first_page()).await;

    assert!(matches!(&result, Err(BackendError::Unauthorized(message)) if message == "Not allowed"));
    let tokens = api.store().load_tokens().await.expect("tokens kept");
    assert_eq!(tokens.access_token, "fresh");
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(0)
        .mount(&server)
        .await;

    let api = session_with(&server, "stale", "");
    let result = api.list_orders(&first_page()).await;

    assert!(matches!(result, Err(BackendError::SessionExpired)));
    assert!(api.store().load_tokens().await.is_none());
}

#[tokio::test]
async fn test_rejected_refresh_clears_tokens_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Refresh token revoked"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = session_with(&server, "stale", "refresh-1");
    let result = api.list_orders(&first_page()).await;

    assert!(matches!(result, Err(BackendError::SessionExpired)));
    assert!(api.store().load_tokens().await.is_none());
}

#[tokio::test]
async fn test_list_results_are_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_envelope()))
        .expect(1)
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    let first = api.list_orders(&first_page()).await.expect("first fetch");
    let second = api.list_orders(&first_page()).await.expect("cached fetch");

    assert_eq!(first.pagination.total, second.pagination.total);
}

#[tokio::test]
async fn test_order_mutation_invalidates_cached_lists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_envelope()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/orders/o-1/deliver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    api.list_orders(&first_page()).await.expect("first fetch");
    api.deliver_order(&OrderId::new("o-1")).await.expect("deliver");
    api.list_orders(&first_page()).await.expect("refetch after deliver");
}

#[tokio::test]
async fn test_not_found_carries_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Order not found"})))
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    let err = api
        .get_order(&OrderId::new("missing"))
        .await
        .expect_err("missing order");

    assert!(matches!(&err, BackendError::NotFound(message) if message == "Order not found"));
}

#[tokio::test]
async fn test_validation_errors_are_joined() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/orders/release-expired"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "x"], "msg": "field required"},
                {"loc": ["body", "y"], "msg": "value is not a number"}
            ]
        })))
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    let err = api.release_expired_orders().await.expect_err("rejected");

    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "field required; value is not a number");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    let result = api.list_orders(&first_page()).await;

    assert!(matches!(result, Err(BackendError::RateLimited(17))));
}

#[tokio::test]
async fn test_admin_detail_is_cached_until_role_changes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admins/a-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "a-2",
                "username": "lead",
                "email": "lead@example.com",
                "is_super_admin": false,
                "department": "Operations"
            }
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admins/a-2/role"))
        .and(body_json(json!({"is_super_admin": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = session_with(&server, "access-1", "refresh-1");
    let id = AdminId::new("a-2");
    let admin = api.get_admin(&id).await.expect("admin");
    assert_eq!(admin.username, "lead");
    assert!(admin.is_active);
    api.get_admin(&id).await.expect("cached admin");

    api.update_admin_role(&id, true).await.expect("role change");
    api.get_admin(&id).await.expect("refetch after role change");
}
