//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, categories, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alexandria API",
        version = "1.0.0",
        description = "Library Catalog Microservice REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
    ),
    components(
        schemas(
            // Books
            crate::models::book::BookInput,
            crate::models::book::BookResponse,
            // Authors
            crate::models::author::AuthorInput,
            crate::models::author::AuthorResponse,
            // Categories
            crate::models::category::CategoryInput,
            crate::models::category::CategoryResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "categories", description = "Category management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
