//! Types and functions for storing and loading items from the database.
//!
//! Items are read through a LEFT JOIN on their category so the wire type
//! carries the full category record; a reference to a deleted category
//! degrades to no category.

use crate::api::category::category_repository::Category;
use crate::infra::{database::Tx, error::ApiResult, pagination::PaginationParams};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{instrument, Instrument};
use utoipa::ToSchema;
use validator::Validate;

/// A reference to a category by id, as carried by an item payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    /// The referenced category's id.
    #[schema(example = "1")]
    pub id: Option<i64>,
}

/// A new item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewItem {
    /// The item's stock keeping unit.
    #[schema(example = "X1")]
    #[validate(length(min = 1))]
    pub sku: String,
    /// The item's name.
    #[schema(example = "Widget")]
    #[validate(length(min = 1))]
    pub name: String,
    /// The item's unit price.
    #[schema(example = "9.99")]
    pub price: Decimal,
    /// The quantity in stock.
    #[schema(example = "10")]
    pub stock: i32,
    /// The category the item belongs to; only the id is read.
    pub category: Option<CategoryRef>,
}

/// An existing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// The item's id.
    #[schema(example = "1")]
    pub id: i64,
    /// The item's stock keeping unit.
    #[schema(example = "X1")]
    pub sku: String,
    /// The item's name.
    #[schema(example = "Widget")]
    pub name: String,
    /// The item's unit price.
    #[schema(example = "9.99")]
    pub price: Decimal,
    /// The quantity in stock.
    #[schema(example = "10")]
    pub stock: i32,
    /// The item's category, fully loaded; absent when the item has none
    /// or the referenced category no longer exists.
    pub category: Option<Category>,
}

/// A flat row from the item/category join.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    sku: String,
    name: String,
    price: Decimal,
    stock: i32,
    category_id: Option<i64>,
    category_code: Option<String>,
    category_name: Option<String>,
    category_updated_at: Option<DateTime<Utc>>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        let category = match (
            row.category_id,
            row.category_code,
            row.category_name,
            row.category_updated_at,
        ) {
            (Some(id), Some(code), Some(name), Some(updated_at)) => Some(Category {
                id,
                code,
                name,
                updated_at,
            }),
            _ => None,
        };
        Item {
            id: row.id,
            sku: row.sku,
            name: row.name,
            price: row.price,
            stock: row.stock,
            category,
        }
    }
}

const SELECT_ITEM: &str = r#"
    SELECT i.id, i.sku, i.name, i.price, i.stock,
           c.id AS category_id, c.code AS category_code,
           c.name AS category_name, c.updated_at AS category_updated_at
    FROM item i
    LEFT JOIN category c ON c.id = i.category_id
"#;

/// Creates a new item referencing an already-resolved category.
#[instrument(skip(tx))]
pub async fn create_item(
    tx: &mut Tx,
    new_item: &NewItem,
    category_id: Option<i64>,
) -> ApiResult<Item> {
    tracing::info!("Creating item {:?}", new_item);
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO item (sku, name, price, stock, category_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&new_item.sku)
    .bind(&new_item.name)
    .bind(new_item.price)
    .bind(new_item.stock)
    .bind(category_id)
    .fetch_one(tx.as_mut())
    .await?;
    let item = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} WHERE i.id = $1"))
        .bind(id)
        .fetch_one(tx.as_mut())
        .await?;
    let item = Item::from(item);
    tracing::info!("Created item {:?}", item);
    Ok(item)
}

/// Read an item.
#[instrument(skip(tx))]
pub async fn fetch_item(tx: &mut Tx, id: i64) -> ApiResult<Option<Item>> {
    tracing::info!("Reading item");
    let item = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} WHERE i.id = $1"))
        .bind(id)
        .fetch_optional(tx.as_mut())
        .instrument(tracing::info_span!("fetch_optional"))
        .await?;
    let item = item.map(Item::from);
    tracing::info!("Found item: {:?}", item);
    Ok(item)
}

/// Updates an item. A null `category_id` keeps the stored reference; the
/// caller resolves any new reference before calling.
#[instrument(skip(tx))]
pub async fn update_item(
    tx: &mut Tx,
    id: i64,
    new_item: &NewItem,
    category_id: Option<i64>,
) -> ApiResult<Option<Item>> {
    tracing::info!("Updating item {:?}", new_item);
    let updated = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE item
        SET sku = $2, name = $3, price = $4, stock = $5,
            category_id = COALESCE($6, category_id)
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(&new_item.sku)
    .bind(&new_item.name)
    .bind(new_item.price)
    .bind(new_item.stock)
    .bind(category_id)
    .fetch_optional(tx.as_mut())
    .await?;
    match updated {
        Some(id) => fetch_item(tx, id).await,
        None => Ok(None),
    }
}

/// Returns whether an item with the given id exists.
#[instrument(skip(tx))]
pub async fn exists_by_id(tx: &mut Tx, id: i64) -> ApiResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM item WHERE id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(tx.as_mut())
    .await?;
    Ok(exists)
}

/// Deletes an item.
#[instrument(skip(tx))]
pub async fn delete_item(tx: &mut Tx, id: i64) -> ApiResult<()> {
    tracing::info!("Deleting item {:?}", id);
    sqlx::query(
        r#"
        DELETE FROM item
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(tx.as_mut())
    .await?;
    tracing::info!("Deleted item");
    Ok(())
}

/// Lists one page of items.
#[instrument(skip(tx))]
pub async fn list_items(tx: &mut Tx, params: &PaginationParams) -> ApiResult<Vec<Item>> {
    tracing::info!("Listing items");
    let items = sqlx::query_as::<_, ItemRow>(&format!(
        "{SELECT_ITEM} ORDER BY i.id LIMIT $1 OFFSET $2"
    ))
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(tx.as_mut())
    .instrument(tracing::info_span!("fetch_all"))
    .await?;
    tracing::info!("Listed {} items", items.len());
    Ok(items.into_iter().map(Item::from).collect())
}

/// Counts all items.
#[instrument(skip(tx))]
pub async fn count_items(tx: &mut Tx) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM item")
        .fetch_one(tx.as_mut())
        .await?;
    Ok(count)
}

/// Lists one page of the items referencing a category.
#[instrument(skip(tx))]
pub async fn list_items_by_category(
    tx: &mut Tx,
    category_id: i64,
    params: &PaginationParams,
) -> ApiResult<Vec<Item>> {
    tracing::info!("Listing items in category {}", category_id);
    let items = sqlx::query_as::<_, ItemRow>(&format!(
        "{SELECT_ITEM} WHERE i.category_id = $1 ORDER BY i.id LIMIT $2 OFFSET $3"
    ))
    .bind(category_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(tx.as_mut())
    .instrument(tracing::info_span!("fetch_all"))
    .await?;
    tracing::info!("Listed {} items", items.len());
    Ok(items.into_iter().map(Item::from).collect())
}

/// Counts the items referencing a category.
#[instrument(skip(tx))]
pub async fn count_items_by_category(tx: &mut Tx, category_id: i64) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM item WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(tx.as_mut())
        .await?;
    Ok(count)
}
