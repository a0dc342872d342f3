//! Products, categories and admin settings through the full admin router.

use axum::http::StatusCode;
use serde_json::{Value, json};
use storedesk_integration_tests::{
    app, body_text, get, location, log_in, mount_login, post_form, send, table_rows,
};
use wiremock::matchers::{body_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product_json(id: &str, name: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "sku": format!("SKU-{id}"),
        "price": "4500.00",
        "status": "available",
        "is_active": is_active,
        "stock_available": 12,
        "category_id": "c-1",
        "category_name": "Kitchen",
        "images": null
    })
}

fn category_json(id: &str, name: &str, parent_id: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "description": format!("All things {name}"),
        "parent_id": parent_id,
        "level": u32::from(parent_id.is_some()),
        "sort_order": 1,
        "is_active": true,
        "product_count": 3,
        "created_at": "2024-03-01T09:00:00Z",
        "updated_at": "2024-03-02T09:00:00Z"
    })
}

fn admin_json(id: &str, username: &str, is_super_admin: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "is_admin": true,
        "is_super_admin": is_super_admin,
        "department": "Operations",
        "job_title": "Coordinator",
        "is_active": true,
        "created_at": "2024-01-15T08:00:00Z"
    })
}

async fn mount_category_tree(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "c-1",
            "name": "Kitchen",
            "level": 0,
            "product_count": 3,
            "children": [{ "id": "c-2", "name": "Cutlery", "level": 1, "children": [] }]
        }])))
        .mount(server)
        .await;
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_products_table_has_one_row_per_product() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    mount_category_tree(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/products"))
        .and(query_param("page", "1"))
        .and(query_param("include_inactive", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                product_json("p-1", "Ladle", true),
                product_json("p-2", "Skillet", true),
                product_json("p-3", "Kettle", false)
            ],
            "total": 3,
            "page": 1,
            "per_page": 20,
            "pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/products/stats/overview"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/products").await;
    let response = send(&app, get("/products", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert_eq!(table_rows(&body), 3);
    assert!(body.contains(r#"href="/products/p-2""#));
    assert!(body.contains(r#"action="/products/p-3/delete""#));
    assert!(body.contains("Cutlery"));
    assert!(!body.contains("No products found"));
}

#[tokio::test]
async fn test_deleting_product_returns_to_list() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/admin/products/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/products").await;
    let response = send(&app, post_form("/products/p-1/delete", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/products"));
}

#[tokio::test]
async fn test_failed_product_delete_stays_on_product() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/admin/products/p-1"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Product has open orders"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/products").await;
    let response = send(&app, post_form("/products/p-1/delete", "", Some(&cookie))).await;
    assert_eq!(location(response.headers()), Some("/products/p-1"));
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_index_lists_rows_and_new_category_form() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    mount_category_tree(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [category_json("c-1", "Kitchen", None), category_json("c-3", "Garden", None)],
            "total": 2,
            "page": 1,
            "per_page": 10,
            "pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/categories").await;
    let response = send(&app, get("/categories", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert_eq!(table_rows(&body), 2);
    assert!(body.contains(r#"href="/categories/c-3""#));
    assert!(body.contains("New category"));
    assert!(body.contains(r#"name="sort_order""#));
    assert!(body.contains(r#"class="depth-1""#));
}

#[tokio::test]
async fn test_category_detail_renders_when_products_fail() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/c-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(category_json("c-1", "Kitchen", None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/c-1/subcategories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([category_json("c-2", "Cutlery", Some("c-1"))])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/c-1/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/categories").await;
    let response = send(&app, get("/categories/c-1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Kitchen"));
    assert!(body.contains("Cutlery"));
    assert!(body.contains("No products in this category"));
    assert!(body.contains(r#"action="/categories/c-1/subcategories""#));
}

#[tokio::test]
async fn test_category_edit_form_is_prefilled() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/c-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(category_json("c-1", "Kitchen", None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/categories").await;
    let response = send(&app, get("/categories/c-1/edit", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#"value="Kitchen""#));
    assert!(body.contains("All things Kitchen"));
}

#[tokio::test]
async fn test_missing_category_is_not_found() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/categories/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Category not found"})))
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/categories").await;
    let response = send(&app, get("/categories/nope/edit", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Category not found"));
}

// =============================================================================
// Settings
// =============================================================================

#[tokio::test]
async fn test_settings_pages_admins_five_at_a_time() {
    let server = MockServer::start().await;
    mount_login(&server, true).await;
    let admins: Vec<Value> = (1..=7)
        .map(|n| admin_json(&format!("a-{n}"), &format!("staff{n}"), n == 1))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/admins"))
        .and(query_param("include_self", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": admins})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let first = body_text(send(&app, get("/settings", Some(&cookie))).await).await;
    assert_eq!(table_rows(&first), 5);
    assert!(first.contains("New administrator"));
    assert!(first.contains(r#"action="/settings/admins/a-2/role""#));
    assert!(!first.contains(r#"action="/settings/admins/a-1/role""#));

    // Second page comes from the cached list
    let second = body_text(send(&app, get("/settings?page=2", Some(&cookie))).await).await;
    assert_eq!(table_rows(&second), 2);
    assert!(second.contains("staff7"));
}

#[tokio::test]
async fn test_regular_admin_sees_settings_without_management() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [admin_json("a-1", "ops", false), admin_json("a-2", "lead", true)]
        })))
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let body = body_text(send(&app, get("/settings", Some(&cookie))).await).await;
    assert_eq!(table_rows(&body), 2);
    assert!(!body.contains("New administrator"));
    assert!(!body.contains("/role"));
}

#[tokio::test]
async fn test_admin_management_posts_require_super_admin() {
    let server = MockServer::start().await;
    mount_login(&server, false).await;
    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .and(path_regex(r"^/api/v1/admins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(0)
            .mount(&server)
            .await;
    }
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let attempts = [
        (
            "/settings/admins",
            "username=new&email=new%40example.com&password=pw&department=Ops&job_title=Clerk",
        ),
        ("/settings/admins/a-2/role", "is_super_admin=true"),
        ("/settings/admins/a-2/deactivate", "reason=left"),
        ("/settings/admins/a-2/reactivate", "restore_super_admin=true"),
    ];
    for (uri, form) in attempts {
        let response = send(&app, post_form(uri, form, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn test_super_admin_creates_admin_once() {
    let server = MockServer::start().await;
    mount_login(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admins/create-admin"))
        .and(body_json(json!({
            "username": "kemi",
            "email": "kemi@store.example.ng",
            "password": "pw",
            "department": "Support",
            "job_title": "Agent"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": admin_json("a-9", "kemi", false)
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let form = "username=kemi&email=kemi%40Store.Example.NG&password=pw&department=Support&job_title=Agent";
    let response = send(&app, post_form("/settings/admins", form, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some("/settings"));
}

#[tokio::test]
async fn test_invalid_new_admin_is_not_sent() {
    let server = MockServer::start().await;
    mount_login(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admins/create-admin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server);

    let cookie = log_in(&app, "/settings").await;
    let response = send(
        &app,
        post_form("/settings/admins", "username=kemi&email=not-an-address", Some(&cookie)),
    )
    .await;
    assert_eq!(location(response.headers()), Some("/settings"));
}
