//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{AuthorInput, AuthorQuery, AuthorResponse},
};

use super::{AppJson, AppQuery};

/// List authors with filters and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorResponse>),
        (status = 400, description = "Invalid filter or pagination")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<AuthorQuery>,
) -> AppResult<Json<Vec<AuthorResponse>>> {
    let authors = state.services.authors.list(&query).await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.services.authors.get(&id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AppJson(input): AppJson<AuthorInput>,
) -> AppResult<(StatusCode, Json<AuthorResponse>)> {
    let created = state.services.authors.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<AuthorInput>,
) -> AppResult<Json<AuthorResponse>> {
    let updated = state.services.authors.update(&id, input).await?;
    Ok(Json(updated))
}

/// Delete an author (rejected while books still reference it)
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author is still referenced by books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
