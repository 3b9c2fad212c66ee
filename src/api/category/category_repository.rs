//! Types and functions for storing and loading categories from the database.

use crate::infra::{
    database::Tx,
    error::ApiResult,
    pagination::PaginationParams,
    validation::Valid,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, Instrument};
use utoipa::ToSchema;
use validator::Validate;

/// A new category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewCategory {
    /// The category's unique code.
    #[schema(example = "ELEC")]
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    /// The category's display name.
    #[schema(example = "Electronics")]
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// An existing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category's id.
    #[schema(example = "1")]
    pub id: i64,
    /// The category's unique code.
    #[schema(example = "ELEC")]
    pub code: String,
    /// The category's display name.
    #[schema(example = "Electronics")]
    pub name: String,
    /// When the category was last modified.
    #[schema(example = "2021-01-01T00:00:00Z")]
    pub updated_at: DateTime<Utc>,
}

/// Creates a new category.
/// A duplicate code violates the unique constraint and surfaces as a conflict.
#[instrument(skip(tx))]
pub async fn create_category(
    tx: &mut Tx,
    new_category: Valid<NewCategory>,
    updated_at: DateTime<Utc>,
) -> ApiResult<Category> {
    let new_category = new_category.into_inner();
    tracing::info!("Creating category {:?}", new_category);
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO category (code, name, updated_at)
        VALUES ($1, $2, $3)
        RETURNING id, code, name, updated_at
        "#,
    )
    .bind(&new_category.code)
    .bind(&new_category.name)
    .bind(updated_at)
    .fetch_one(tx.as_mut())
    .await?;
    tracing::info!("Created category {:?}", category);
    Ok(category)
}

/// Read a category.
#[instrument(skip(tx))]
pub async fn fetch_category(tx: &mut Tx, id: i64) -> ApiResult<Option<Category>> {
    tracing::info!("Reading category");
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, code, name, updated_at FROM category
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(tx.as_mut())
    .instrument(tracing::info_span!("fetch_optional"))
    .await?;
    tracing::info!("Found category: {:?}", category);
    Ok(category)
}

/// Updates a category, replacing its code and name.
#[instrument(skip(tx))]
pub async fn update_category(
    tx: &mut Tx,
    id: i64,
    new_category: Valid<NewCategory>,
    updated_at: DateTime<Utc>,
) -> ApiResult<Option<Category>> {
    let new_category = new_category.into_inner();
    tracing::info!("Updating category {:?}", new_category);
    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE category
        SET code = $2, name = $3, updated_at = $4
        WHERE id = $1
        RETURNING id, code, name, updated_at
        "#,
    )
    .bind(id)
    .bind(&new_category.code)
    .bind(&new_category.name)
    .bind(updated_at)
    .fetch_optional(tx.as_mut())
    .await?;
    tracing::info!("Updated category {:?}", category);
    Ok(category)
}

/// Returns whether a category with the given id exists.
#[instrument(skip(tx))]
pub async fn exists_by_id(tx: &mut Tx, id: i64) -> ApiResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM category WHERE id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(tx.as_mut())
    .await?;
    Ok(exists)
}

/// Deletes a category.
#[instrument(skip(tx))]
pub async fn delete_category(tx: &mut Tx, id: i64) -> ApiResult<()> {
    tracing::info!("Deleting category {:?}", id);
    sqlx::query(
        r#"
        DELETE FROM category
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(tx.as_mut())
    .await?;
    tracing::info!("Deleted category");
    Ok(())
}

/// Lists one page of categories.
#[instrument(skip(tx))]
pub async fn list_categories(
    tx: &mut Tx,
    params: &PaginationParams,
) -> ApiResult<Vec<Category>> {
    tracing::info!("Listing categories");
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, code, name, updated_at FROM category
        ORDER BY id
        LIMIT $1
        OFFSET $2
        "#,
    )
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(tx.as_mut())
    .instrument(tracing::info_span!("fetch_all"))
    .await?;
    tracing::info!("Listed {} categories", categories.len());
    Ok(categories)
}

/// Counts all categories.
#[instrument(skip(tx))]
pub async fn count_categories(tx: &mut Tx) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM category")
        .fetch_one(tx.as_mut())
        .await?;
    Ok(count)
}
