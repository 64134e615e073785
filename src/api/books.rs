//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookInput, BookQuery, BookResponse},
};

use super::{AppJson, AppQuery};

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<BookResponse>),
        (status = 400, description = "Invalid filter or pagination")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<BookQuery>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.books.list(&query).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get(&id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Validation or reference error"),
        (status = 409, description = "Book with this ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AppJson(input): AppJson<BookInput>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let created = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Validation or reference error"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book with this ISBN already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<BookInput>,
) -> AppResult<Json<BookResponse>> {
    let updated = state.services.books.update(&id, input).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.books.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
