//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Productos API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Productos API",
        version = "0.1.0",
        description = "Product catalogue: create, list, read, update and delete productos",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/productos", api = domain_productos::ApiDoc)
    ),
    tags(
        (name = "Productos", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;
