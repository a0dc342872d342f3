//! Page flows through the full admin router with a mocked backend.

use axum::http::StatusCode;
use serde_json::json;
use storedesk_integration_tests::{
    app, body_text, get, location, log_in, mount_login, order_json, post_form, send, table_rows,
};
use wiremock::matchers::{body_json, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_health_is_ok_without_backend_calls() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_follows_backend_reachability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let app = app(&server);

    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pages_redirect_to_login_with_return_path() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = send(&app, get("/orders?status=shipped", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(response.headers()),
        Some("/auth/login?next=%2Forders%3Fstatus%3Dshipped")
    );
}

#[tokio::test]
async fn test_login_page_keeps_return_path() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = send(&app, get("/auth/login?next=/products", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"<input type="hidden" name="next" value="/products">"#));
}

#[tokio::test]
async fn test_rejected_login_shows_backend_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;
    let app = app(&server);

    let response = send(&app, post_form("/auth/login", "username=ops&password=nope", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_text(response).await;
    assert!(body.contains("Incorrect username or password"));
    assert!(body.contains(r#"value="ops""#));
}

#[tokio::test]
async fn test_login_then_orders_table_renders_backend_data() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .and(header_eq("Authorization", "Bearer access-1"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "orders": [
                    order_json("o-1", "ORD-1001", "processing", "completed"),
                    order_json("o-2", "ORD-1002", "shipped", "pending")
                ],
                "pagination": { "total": 2, "page": 1, "per_page": 10, "pages": 1 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/orders").await;
    let response = send(&app, get("/orders", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert_eq!(table_rows(&body), 2);
    assert!(!body.contains("No orders found"));
    assert!(body.contains("Welcome back"));
    assert!(body.contains("ORD-1001"));
    assert!(body.contains("ORD-1002"));
    assert!(body.contains("Chidi Buyer"));
    assert!(body.contains(r#"href="/orders/o-1/ship""#));
    assert!(body.contains(r#"href="/orders/o-1/refund""#));
    assert!(body.contains(r#"action="/orders/o-2/deliver""#));
    assert!(!body.contains(r#"href="/orders/o-2/refund""#));
}

#[tokio::test]
async fn test_empty_orders_list_renders_placeholder() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "orders": [],
                "pagination": { "total": 0, "page": 1, "per_page": 10, "pages": 0 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/orders").await;
    let body = body_text(send(&app, get("/orders", Some(&cookie))).await).await;
    assert!(body.contains("No orders found"));
    assert_eq!(table_rows(&body), 0);
}

#[tokio::test]
async fn test_ship_without_method_never_reaches_backend() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(path("/api/v1/orders/o-1/ship"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/orders").await;
    let response = send(
        &app,
        post_form(
            "/orders/o-1/ship",
            "shipping_method=++&tracking_number=TRK-1",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/orders/o-1/ship"));
}

#[tokio::test]
async fn test_ship_sends_trimmed_form_once() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/orders/o-1/ship"))
        .and(body_json(json!({
            "tracking_number": "TRK-1",
            "shipping_method": "GIG Logistics"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/orders").await;
    let response = send(
        &app,
        post_form(
            "/orders/o-1/ship",
            "shipping_method=GIG+Logistics&tracking_number=+TRK-1+&notes=",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/orders/o-1"));
}

#[tokio::test]
async fn test_customer_detail_shows_both_order_histories() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "u-7",
                "username": "chidi",
                "email": "chidi@example.com",
                "is_active": true,
                "created_at": "2024-01-09T08:00:00Z",
                "updated_at": "2024-04-01T08:00:00Z",
                "order_stats": {
                    "registered": {
                        "total_orders": 3,
                        "total_spent": "36750.00",
                        "last_order_date": "2024-04-01T08:00:00Z",
                        "order_breakdown": { "delivered": 2, "cancelled": 1 }
                    },
                    "guest": null
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/customers").await;
    let response = send(&app, get("/customers/u-7", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("chidi@example.com"));
    assert!(body.contains("Registered Orders"));
    assert!(body.contains("Guest Orders"));
    assert!(body.contains("Never"));
}

#[tokio::test]
async fn test_expired_backend_session_sends_admin_to_login() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/orders").await;
    let response = send(&app, get("/orders", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/auth/login"));

    // Tokens were cleared, so the next page asks for a login up front
    let response = send(&app, get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/auth/login?next=%2Fdashboard"));
}

#[tokio::test]
async fn test_customer_status_requires_super_admin() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/customers").await;
    let response = send(
        &app,
        post_form("/customers/u-1/status", "is_active=false", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server, true).await;
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let response = send(&app, post_form("/auth/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/auth/login"));

    let response = send(&app, get("/settings", Some(&cookie))).await;
    assert_eq!(location(response.headers()), Some("/auth/login?next=%2Fsettings"));
}
