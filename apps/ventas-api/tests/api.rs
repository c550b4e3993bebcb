//! HTTP-level tests: the real router over an in-memory SQLite database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use ventas_api::{build_router, AppState};
use ventas_db::{Database, DbConfig};

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a customer and two products, returns their ids.
async fn fixture(app: &Router) -> (String, String, String) {
    let (status, customer) = send_json(
        app,
        Method::POST,
        "/api/customers",
        Some(json!({ "rut": "12345678-9", "full_name": "Juan Perez" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, keyboard) = send_json(
        app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Teclado", "price_cents": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, monitor) = send_json(
        app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Monitor", "price_cents": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        customer["id"].as_str().unwrap().to_string(),
        keyboard["id"].as_str().unwrap().to_string(),
        monitor["id"].as_str().unwrap().to_string(),
    )
}

async fn create_sale(app: &Router, customer_id: &str, keyboard: &str, monitor: &str) -> Value {
    let (status, sale) = send_json(
        app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "customer_id": customer_id,
            "shipping_method": "home_delivery",
            "line_items": [
                { "product_id": keyboard, "quantity": 2 },
                { "product_id": monitor, "quantity": 1 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{sale}");
    sale
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
    assert!(body["migrations"]["total"].as_u64().unwrap() > 0);
    assert_eq!(body["migrations"]["applied"], body["migrations"]["total"]);
}

#[tokio::test]
async fn test_health_degraded_without_schema() {
    let db = Database::new(DbConfig::in_memory().run_migrations(false))
        .await
        .unwrap();
    let app = build_router(AppState::new(db));

    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_sale_lifecycle() {
    let app = app().await;
    let (customer_id, keyboard, monitor) = fixture(&app).await;

    let sale = create_sale(&app, &customer_id, &keyboard, &monitor).await;
    let sale_id = sale["id"].as_str().unwrap().to_string();
    assert_eq!(sale["total_cents"], 4000);
    assert_eq!(sale["status"], "pending");
    assert_eq!(sale["line_items"].as_array().unwrap().len(), 2);

    // Two 10% discounts compound to 81%
    for _ in 0..2 {
        let (status, _) = send_json(
            &app,
            Method::PUT,
            &format!("/api/sales/{sale_id}/discount?percentage=10"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, fetched) = send_json(&app, Method::GET, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["total_cents"], 3240);

    let (status, cancelled) =
        send_json(&app, Method::PUT, &format!("/api/sales/{sale_id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // Discounting a cancelled sale returns it unchanged
    let (status, unchanged) = send_json(
        &app,
        Method::PUT,
        &format!("/api/sales/{sale_id}/discount?percentage=50"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["total_cents"], 3240);

    let (status, text) = send(&app, Method::GET, &format!("/api/sales/{sale_id}/invoice-text"), None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(text).unwrap();
    assert!(text.starts_with(&format!("Factura para la Venta ID: {sale_id}\n")));
    assert!(text.contains("Cliente: Juan Perez (RUT: 12345678-9)\n"));
    assert!(text.contains("Medio de Envío: DESPACHO_A_DOMICILIO\n"));
    assert!(text.contains("Estado: CANCELADA\n"));
    assert!(text.contains("2 x Teclado @ 10.00 = 20.00\n"));
    assert!(text.ends_with("Monto Total: 32.40\n"));
}

#[tokio::test]
async fn test_captured_price_survives_catalog_update() {
    let app = app().await;
    let (customer_id, keyboard, monitor) = fixture(&app).await;
    let sale = create_sale(&app, &customer_id, &keyboard, &monitor).await;
    let sale_id = sale["id"].as_str().unwrap();

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/products/{keyboard}"),
        Some(json!({ "name": "Teclado", "price_cents": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = send_json(&app, Method::GET, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(fetched["total_cents"], 4000);
    assert_eq!(fetched["line_items"][0]["unit_price_cents"], 1000);
}

#[tokio::test]
async fn test_invoice_issuance() {
    let app = app().await;
    let (customer_id, keyboard, monitor) = fixture(&app).await;
    let sale = create_sale(&app, &customer_id, &keyboard, &monitor).await;
    let sale_id = sale["id"].as_str().unwrap();

    let (status, invoice) = send_json(&app, Method::POST, &format!("/api/invoices/issue/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["sale_id"], sale_id);
    assert_eq!(invoice["total_cents"], 4000);

    let (status, again) = send_json(&app, Method::POST, &format!("/api/invoices/issue/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["code"], "ALREADY_INVOICED");

    let (status, by_sale) =
        send_json(&app, Method::GET, &format!("/api/invoices/by-sale/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_sale["id"], invoice["id"]);

    // The invoice still references the sale
    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let invoice_id = invoice["id"].as_str().unwrap();
    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/invoices/{invoice_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_ids() {
    let app = app().await;

    for (method, uri) in [
        (Method::GET, "/api/sales/missing"),
        (Method::PUT, "/api/sales/missing/cancel"),
        (Method::PUT, "/api/sales/missing/discount?percentage=10"),
        (Method::GET, "/api/sales/missing/invoice-text"),
        (Method::DELETE, "/api/sales/missing"),
        (Method::POST, "/api/invoices/issue/missing"),
        (Method::GET, "/api/invoices/missing"),
        (Method::GET, "/api/invoices/by-sale/missing"),
        (Method::GET, "/api/products/missing"),
        (Method::GET, "/api/customers/by-rut/1-9"),
    ] {
        let (status, body) = send_json(&app, method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["code"], "NOT_FOUND", "{method} {uri}");
    }
}

#[tokio::test]
async fn test_sale_with_unknown_product_is_not_created() {
    let app = app().await;
    let (customer_id, keyboard, _) = fixture(&app).await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "customer_id": customer_id,
            "shipping_method": "store_pickup",
            "line_items": [
                { "product_id": keyboard, "quantity": 1 },
                { "product_id": "ghost", "quantity": 1 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, sales) = send_json(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/customers",
        Some(json!({ "rut": "not-a-rut", "full_name": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "name": "Gratis", "price_cents": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (customer_id, keyboard, _) = fixture(&app).await;
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "customer_id": customer_id,
            "shipping_method": "store_pickup",
            "line_items": [{ "product_id": keyboard, "quantity": 0 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sale_total_overflow_is_rejected() {
    let app = app().await;
    let (customer_id, keyboard, _) = fixture(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "customer_id": customer_id,
            "shipping_method": "store_pickup",
            "line_items": [{ "product_id": keyboard, "quantity": 100_000_000_000_000_000i64 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, sales) = send_json(&app, Method::GET, "/api/sales", None).await;
    assert!(sales.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_finite_discount_is_rejected() {
    let app = app().await;
    let (customer_id, keyboard, monitor) = fixture(&app).await;
    let sale = create_sale(&app, &customer_id, &keyboard, &monitor).await;
    let sale_id = sale["id"].as_str().unwrap();

    for percentage in ["NaN", "inf", "-inf"] {
        let (status, body) = send_json(
            &app,
            Method::PUT,
            &format!("/api/sales/{sale_id}/discount?percentage={percentage}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{percentage}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (_, stored) = send_json(&app, Method::GET, &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(stored["total_cents"], 4000);
}

#[tokio::test]
async fn test_duplicate_rut_conflicts() {
    let app = app().await;
    fixture(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/customers",
        Some(json!({ "rut": "12345678-9", "full_name": "Otro Juan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, found) = send_json(&app, Method::GET, "/api/customers/by-rut/12345678-9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["full_name"], "Juan Perez");
}

#[tokio::test]
async fn test_update_sale_replaces_header() {
    let app = app().await;
    let (customer_id, keyboard, monitor) = fixture(&app).await;
    let sale = create_sale(&app, &customer_id, &keyboard, &monitor).await;
    let sale_id = sale["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/sales/{sale_id}"),
        Some(json!({
            "sold_at": "2023-01-15T10:30:00Z",
            "total_cents": 1234,
            "shipping_method": "store_pickup",
            "status": "completed",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["total_cents"], 1234);
    assert_eq!(updated["line_items"].as_array().unwrap().len(), 2);
}
