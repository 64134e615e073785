//! Category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::category::{CategoryInput, CategoryQuery, CategoryResponse},
};

use super::{AppJson, AppQuery};

/// List categories with filters and pagination
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponse>),
        (status = 400, description = "Invalid filter or pagination")
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AppQuery(query): AppQuery<CategoryQuery>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.services.categories.list(&query).await?;
    Ok(Json(categories))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.services.categories.get(&id).await?;
    Ok(Json(category))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category with this name already exists")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AppJson(input): AppJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let created = state.services.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category with this name already exists")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<CategoryInput>,
) -> AppResult<Json<CategoryResponse>> {
    let updated = state.services.categories.update(&id, input).await?;
    Ok(Json(updated))
}

/// Delete a category (rejected while books still reference it)
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category is still referenced by books")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.categories.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
