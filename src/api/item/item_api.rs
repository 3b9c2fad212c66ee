//! The item API implementation.
//!
//! An unresolvable category reference answers bad-request on both the
//! create and the update path; not-found on the update path always means
//! the item itself is missing.

use super::{
    item_repository::{Item, NewItem},
    item_service,
};
use crate::infra::{
    database::DbPool,
    error::{ApiResult, ClientError, ErrorBody},
    extract::{Json, Query},
    pagination::{ItemPage, Page, PaginationParams},
    state::AppState,
    validation::Valid,
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::IntoParams;

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_items)
        .typed_post(create_item)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/items", rejection(ClientError))]
struct Items;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/:id", rejection(ClientError))]
struct ItemsId(i64);

/// Filters for listing items.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    /// Only list items belonging to this category.
    category_id: Option<i64>,
}

/// Lists items, optionally filtered by category.
#[utoipa::path(
    get,
    path = "/api/items",
    params(ItemFilter, PaginationParams),
    responses(
        (status = 200, description = "Success", body = ItemPage),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub async fn list_items(
    Items: Items,
    State(db): State<DbPool>,
    Query(filter): Query<ItemFilter>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Page<Item>>> {
    let mut tx = db.begin().await?;
    let page = match filter.category_id {
        Some(category_id) => {
            item_service::list_items_by_category(&mut tx, category_id, &params).await?
        }
        None => item_service::list_items(&mut tx, &params).await?,
    };
    tx.commit().await?;
    Ok(Json(page))
}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Created", body = Item),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(new_item))]
pub async fn create_item(
    Items: Items,
    State(db): State<DbPool>,
    Json(new_item): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let new_item = Valid::new(new_item)?;
    let mut tx = db.begin().await?;
    let item = item_service::create_item(&mut tx, new_item).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Gets an item.
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn get_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let mut tx = db.begin().await?;
    let item = item_service::read_item(&mut tx, id)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok((StatusCode::OK, Json(item)))
}

/// Updates an item.
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    request_body = NewItem,
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn update_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
    Json(new_item): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let new_item = Valid::new(new_item)?;
    let mut tx = db.begin().await?;
    let item = item_service::update_item(&mut tx, id, new_item)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok((StatusCode::OK, Json(item)))
}

/// Deletes an item.
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    responses(
        (status = 204, description = "No Content"),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub async fn delete_item(ItemsId(id): ItemsId, State(db): State<DbPool>) -> ApiResult<StatusCode> {
    let mut tx = db.begin().await?;
    if !item_service::delete_item(&mut tx, id).await? {
        return Err(ClientError::NotFound.into());
    }
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
