//! The category API implementation.

use super::{
    category_repository::{Category, NewCategory},
    category_service,
};
use crate::api::item::item_repository::Item;
use crate::infra::{
    database::DbPool,
    error::{ApiResult, ClientError, ErrorBody},
    extract::{Json, Query},
    pagination::{CategoryPage, ItemPage, Page, PaginationParams},
    state::AppState,
    validation::Valid,
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

/// The category API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_categories)
        .typed_post(create_category)
        .typed_get(get_category)
        .typed_put(update_category)
        .typed_delete(delete_category)
        .typed_get(list_category_items)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/categories", rejection(ClientError))]
struct Categories;

#[derive(Deserialize, TypedPath)]
#[typed_path("/categories/:id", rejection(ClientError))]
struct CategoriesId(i64);

#[derive(Deserialize, TypedPath)]
#[typed_path("/categories/:id/items", rejection(ClientError))]
struct CategoriesIdItems(i64);

/// Lists categories.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "Success", body = CategoryPage),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub async fn list_categories(
    Categories: Categories,
    State(db): State<DbPool>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Page<Category>>> {
    let mut tx = db.begin().await?;
    let page = category_service::list_categories(&mut tx, &params).await?;
    tx.commit().await?;
    Ok(Json(page))
}

/// Creates a new category.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 409, description = "Conflict", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(new_category))]
pub async fn create_category(
    Categories: Categories,
    State(db): State<DbPool>,
    Json(new_category): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let new_category = Valid::new(new_category)?;
    let mut tx = db.begin().await?;
    let category = category_service::create_category(&mut tx, new_category).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Gets a category.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    responses(
        (status = 200, description = "Ok", body = Category),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn get_category(
    CategoriesId(id): CategoriesId,
    State(db): State<DbPool>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let mut tx = db.begin().await?;
    let category = category_service::read_category(&mut tx, id)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok((StatusCode::OK, Json(category)))
}

/// Updates a category.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    request_body = NewCategory,
    responses(
        (status = 200, description = "Ok", body = Category),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 409, description = "Conflict", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn update_category(
    CategoriesId(id): CategoriesId,
    State(db): State<DbPool>,
    Json(new_category): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let new_category = Valid::new(new_category)?;
    let mut tx = db.begin().await?;
    let category = category_service::update_category(&mut tx, id, new_category)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok((StatusCode::OK, Json(category)))
}

/// Deletes a category.
/// Items referencing it are left in place with a dangling reference.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    responses(
        (status = 204, description = "No Content"),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn delete_category(
    CategoriesId(id): CategoriesId,
    State(db): State<DbPool>,
) -> ApiResult<StatusCode> {
    let mut tx = db.begin().await?;
    if !category_service::delete_category(&mut tx, id).await? {
        return Err(ClientError::NotFound.into());
    }
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the items in a category.
///
/// The category must exist; the check lives here so an unknown category
/// answers not-found while a known-but-empty one answers an empty page.
#[utoipa::path(
    get,
    path = "/api/categories/{id}/items",
    params(PaginationParams),
    responses(
        (status = 200, description = "Success", body = ItemPage),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn list_category_items(
    CategoriesIdItems(id): CategoriesIdItems,
    State(db): State<DbPool>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Page<Item>>> {
    let mut tx = db.begin().await?;
    category_service::read_category(&mut tx, id)
        .await?
        .ok_or(ClientError::NotFound)?;
    let page = category_service::list_category_items(&mut tx, id, &params).await?;
    tx.commit().await?;
    Ok(Json(page))
}
