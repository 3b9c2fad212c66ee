//! A service for interacting with categories.

use super::category_repository::{self, Category, NewCategory};
use crate::api::item::item_repository::{self, Item};
use crate::infra::{
    database::Tx,
    error::ApiResult,
    pagination::{Page, PaginationParams},
    validation::Valid,
};
use chrono::Utc;
use tracing::instrument;

/// Lists one page of categories.
#[instrument(skip(tx))]
pub async fn list_categories(tx: &mut Tx, params: &PaginationParams) -> ApiResult<Page<Category>> {
    let content = category_repository::list_categories(tx, params).await?;
    let total = category_repository::count_categories(tx).await?;
    Ok(Page::new(content, total, params))
}

/// Read a category.
#[instrument(skip(tx))]
pub async fn read_category(tx: &mut Tx, id: i64) -> ApiResult<Option<Category>> {
    category_repository::fetch_category(tx, id).await
}

/// Creates a new category, stamping its modification time.
#[instrument(skip(tx))]
pub async fn create_category(tx: &mut Tx, new_category: Valid<NewCategory>) -> ApiResult<Category> {
    category_repository::create_category(tx, new_category, Utc::now()).await
}

/// Updates a category, replacing its code and name and stamping its
/// modification time. Returns `None` if no category with the id exists.
#[instrument(skip(tx))]
pub async fn update_category(
    tx: &mut Tx,
    id: i64,
    new_category: Valid<NewCategory>,
) -> ApiResult<Option<Category>> {
    category_repository::update_category(tx, id, new_category, Utc::now()).await
}

/// Deletes a category. Returns false if no such category exists.
/// Items referencing the category are left in place with a dangling
/// reference.
#[instrument(skip(tx))]
pub async fn delete_category(tx: &mut Tx, id: i64) -> ApiResult<bool> {
    if !category_repository::exists_by_id(tx, id).await? {
        return Ok(false);
    }
    category_repository::delete_category(tx, id).await?;
    Ok(true)
}

/// Lists one page of the items referencing a category.
/// Callers confirm the category exists and answer not-found themselves.
#[instrument(skip(tx))]
pub async fn list_category_items(
    tx: &mut Tx,
    id: i64,
    params: &PaginationParams,
) -> ApiResult<Page<Item>> {
    let content = item_repository::list_items_by_category(tx, id, params).await?;
    let total = item_repository::count_items_by_category(tx, id).await?;
    Ok(Page::new(content, total, params))
}
