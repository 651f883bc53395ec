//! Handler tests for the Productos domain
//!
//! These tests drive `handlers::router` over the in-memory repository:
//! - Request deserialization and the 400 paths
//! - Response bodies (`mensaje`, `producto`, `error`)
//! - HTTP status codes
//!
//! They need no database and no network.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_productos::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, assertions::*};
use tower::ServiceExt; // For oneshot()

const MISSING_ID: &str = "507f1f77bcf86cd799439011";

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

fn producto(code: i64, nombre: &str, categoria: &str) -> Value {
    json!({
        "codigo": code,
        "nombre": nombre,
        "precio": 25.5,
        "categoria": categoria
    })
}

#[tokio::test]
async fn test_create_product_handler_returns_201() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let input = producto(builder.code(1), &builder.name("producto", "a"), "Ropa");

    let (status, body) = send(&app, "POST", "/", Some(input.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_object_id_hex(body["_id"].as_str().unwrap(), "created _id");
    for field in ["codigo", "nombre", "precio", "categoria"] {
        assert_eq!(body[field], input[field], "field {field} should echo input");
    }
}

#[tokio::test]
async fn test_create_duplicate_code_returns_400() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_duplicate");
    let code = builder.code(1);

    let (first, _) = send(&app, "POST", "/", Some(producto(code, "Camisa", "Ropa"))).await;
    assert_eq!(first, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/", Some(producto(code, "Otra", "Calzado"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        format!("Ya existe un producto con el código {code}")
    );
}

#[tokio::test]
async fn test_create_missing_fields_returns_400() {
    let app = app();

    let (status, body) = send(&app, "POST", "/", Some(json!({ "nombre": "Sin código" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Faltan campos obligatorios: codigo, precio, categoria"
    );
}

#[tokio::test]
async fn test_create_invalid_category_returns_400() {
    let app = app();

    let (status, body) = send(&app, "POST", "/", Some(producto(1, "Pelota", "Juguetes"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Juguetes"));
    assert!(message.contains("Ropa, Calzado, Accesorios"));
}

#[tokio::test]
async fn test_create_negative_price_returns_400() {
    let app = app();
    let mut input = producto(1, "Camisa", "Ropa");
    input["precio"] = json!(-5);

    let (status, body) = send(&app, "POST", "/", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("precio"));
}

#[tokio::test]
async fn test_create_wrong_type_returns_400() {
    let app = app();
    let mut input = producto(1, "Camisa", "Ropa");
    input["codigo"] = json!("uno");

    let (status, body) = send(&app, "POST", "/", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_list_returns_all_newest_first() {
    let app = app();

    let (_, empty) = send(&app, "GET", "/", None).await;
    assert_eq!(empty, json!([]));

    send(&app, "POST", "/", Some(producto(1, "Primero", "Ropa"))).await;
    send(&app, "POST", "/", Some(producto(2, "Segundo", "Calzado"))).await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);

    let products: Vec<Product> = serde_json::from_value(body).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Segundo");
    assert_eq!(products[1].name, "Primero");
}

#[tokio::test]
async fn test_get_created_product() {
    let app = app();
    let (_, created) = send(&app, "POST", "/", Some(producto(3, "Gorra", "Accesorios"))).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_missing_product_returns_404() {
    let app = app();

    let (status, body) = send(&app, "GET", &format!("/{MISSING_ID}"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
}

#[tokio::test]
async fn test_malformed_id_returns_400() {
    let app = app();

    let (status, body) = send(&app, "GET", "/no-es-un-id", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identificador inválido: no-es-un-id");
}

#[tokio::test]
async fn test_update_changes_only_sent_fields() {
    let app = app();
    let (_, created) = send(&app, "POST", "/", Some(producto(4, "Bota", "Calzado"))).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/{id}"),
        Some(json!({ "nombre": "Bota alta", "precio": 80 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Producto Actualizado");
    let updated = &body["producto"];
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["nombre"], "Bota alta");
    assert_eq!(updated["precio"], 80.0);
    assert_eq!(updated["codigo"], 4);
    assert_eq!(updated["categoria"], "Calzado");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, fetched) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(&fetched, updated);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let app = app();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/{MISSING_ID}"),
        Some(json!({ "nombre": "Nada" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
}

// Body parsing happens in the extractor, before the id is looked up.
// Field rules run in the service, after it.
#[tokio::test]
async fn test_update_missing_product_body_checks_order() {
    let app = app();
    let uri = format!("/{MISSING_ID}");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "precio": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = send(&app, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "precio": -1.0, "categoria": "Juguetes" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
}

#[tokio::test]
async fn test_update_to_taken_code_returns_400() {
    let app = app();
    send(&app, "POST", "/", Some(producto(10, "A", "Ropa"))).await;
    let (_, b) = send(&app, "POST", "/", Some(producto(11, "B", "Ropa"))).await;
    let id = b["_id"].as_str().unwrap();

    let (status, body) = send(&app, "PUT", &format!("/{id}"), Some(json!({ "codigo": 10 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ya existe un producto con el código 10");
}

#[tokio::test]
async fn test_update_to_disallowed_category_returns_400() {
    let app = app();
    let (_, created) = send(&app, "POST", "/", Some(producto(12, "C", "Ropa"))).await;
    let id = created["_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/{id}"),
        Some(json!({ "categoria": "Juguetes" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let app = app();
    let (_, created) = send(&app, "POST", "/", Some(producto(13, "D", "Accesorios"))).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "mensaje": "Producto eliminado" }));

    let (status, _) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Producto no encontrado");
}

#[tokio::test]
async fn test_concurrent_creates_with_same_code_only_one_wins() {
    let app = app();

    let requests = (0..10).map(|i| {
        let app = app.clone();
        async move {
            send(&app, "POST", "/", Some(producto(99, &format!("Carrera {i}"), "Ropa")))
                .await
                .0
        }
    });
    let statuses = futures_util::future::join_all(requests).await;

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();
    assert_eq!(created, 1);
    assert_eq!(rejected, 9);
}

#[test]
fn test_request_schemas_document_every_field_with_an_example() {
    use utoipa::OpenApi;

    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    for schema in ["CreateProduct", "UpdateProduct"] {
        let properties = doc["components"]["schemas"][schema]["properties"]
            .as_object()
            .unwrap_or_else(|| panic!("{schema} should have properties"));
        for field in ["codigo", "nombre", "precio", "categoria"] {
            let property = &properties[field];
            assert!(
                property.get("example").is_some() || property.get("examples").is_some(),
                "{schema}.{field} should carry an example"
            );
        }
    }
}
