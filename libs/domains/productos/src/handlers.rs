//! HTTP handlers for the Productos API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    JsonBody, ObjectIdPath,
    errors::responses::{
        BadRequestIdResponse, BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Product, ProductCategory, ProductDeleted, ProductUpdated, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Productos API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, ProductCategory,
            ProductUpdated, ProductDeleted
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Productos", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Create the productos router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Productos",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Productos",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Product ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id.into()).await?;
    Ok(Json(product))
}

/// Update a product; only the fields sent are changed
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Product ObjectId (24 hex chars)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductUpdated),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    JsonBody(input): JsonBody<UpdateProduct>,
) -> ProductResult<Json<ProductUpdated>> {
    let product = service.update_product(id.into(), input).await?;
    Ok(Json(product.into()))
}

/// Delete a product permanently
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Product ObjectId (24 hex chars)")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ProductDeleted),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductDeleted>> {
    service.delete_product(id.into()).await?;
    Ok(Json(ProductDeleted::default()))
}
