//! A service for interacting with items.
//!
//! The one business rule lives here: an item payload carrying a category
//! reference may only be persisted once that reference resolves to an
//! existing category row.

use super::item_repository::{self, CategoryRef, Item, NewItem};
use crate::api::category::category_repository::{self, Category};
use crate::infra::{
    database::Tx,
    error::{ApiResult, ClientError},
    pagination::{Page, PaginationParams},
    validation::Valid,
};
use tracing::instrument;

/// Lists one page of items.
#[instrument(skip(tx))]
pub async fn list_items(tx: &mut Tx, params: &PaginationParams) -> ApiResult<Page<Item>> {
    let content = item_repository::list_items(tx, params).await?;
    let total = item_repository::count_items(tx).await?;
    Ok(Page::new(content, total, params))
}

/// Lists one page of the items referencing a category.
/// An unknown category id is not an error, just an empty page.
#[instrument(skip(tx))]
pub async fn list_items_by_category(
    tx: &mut Tx,
    category_id: i64,
    params: &PaginationParams,
) -> ApiResult<Page<Item>> {
    let content = item_repository::list_items_by_category(tx, category_id, params).await?;
    let total = item_repository::count_items_by_category(tx, category_id).await?;
    Ok(Page::new(content, total, params))
}

/// Read an item.
#[instrument(skip(tx))]
pub async fn read_item(tx: &mut Tx, id: i64) -> ApiResult<Option<Item>> {
    item_repository::fetch_item(tx, id).await
}

/// Creates a new item. A category reference in the payload must resolve
/// to an existing category, otherwise nothing is persisted; the created
/// item carries the fully-loaded category record.
#[instrument(skip(tx))]
pub async fn create_item(tx: &mut Tx, new_item: Valid<NewItem>) -> ApiResult<Item> {
    let new_item = new_item.into_inner();
    let category = resolve_category(tx, new_item.category.as_ref()).await?;
    item_repository::create_item(tx, &new_item, category.map(|c| c.id)).await
}

/// Updates an item. Returns `None` if no item with the id exists. The
/// sku, name, price and stock fields are replaced unconditionally; the
/// category reference follows the same rule as [`create_item`], and a
/// payload without one leaves the stored reference untouched.
#[instrument(skip(tx))]
pub async fn update_item(
    tx: &mut Tx,
    id: i64,
    new_item: Valid<NewItem>,
) -> ApiResult<Option<Item>> {
    if !item_repository::exists_by_id(tx, id).await? {
        return Ok(None);
    }
    let new_item = new_item.into_inner();
    let category = resolve_category(tx, new_item.category.as_ref()).await?;
    item_repository::update_item(tx, id, &new_item, category.map(|c| c.id)).await
}

/// Deletes an item. Returns false if no such item exists.
#[instrument(skip(tx))]
pub async fn delete_item(tx: &mut Tx, id: i64) -> ApiResult<bool> {
    if !item_repository::exists_by_id(tx, id).await? {
        return Ok(false);
    }
    item_repository::delete_item(tx, id).await?;
    Ok(true)
}

/// Loads the category a payload reference points at, answering bad-request
/// when the id does not resolve. A reference without an id resolves to no
/// category.
async fn resolve_category(
    tx: &mut Tx,
    reference: Option<&CategoryRef>,
) -> ApiResult<Option<Category>> {
    let Some(id) = reference.and_then(|r| r.id) else {
        return Ok(None);
    };
    match category_repository::fetch_category(tx, id).await? {
        Some(category) => Ok(Some(category)),
        None => Err(ClientError::BadRequest(format!("category {id} does not exist")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::category::category_repository::NewCategory;
    use crate::api::category::category_service;
    use crate::infra::error::ApiError;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn electronics() -> Valid<NewCategory> {
        Valid::new(NewCategory {
            code: "ELEC".to_string(),
            name: "Electronics".to_string(),
        })
        .unwrap()
    }

    fn widget(sku: &str, category: Option<CategoryRef>) -> Valid<NewItem> {
        Valid::new(NewItem {
            sku: sku.to_string(),
            name: "Widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 10,
            category,
        })
        .unwrap()
    }

    fn reference(id: i64) -> Option<CategoryRef> {
        Some(CategoryRef { id: Some(id) })
    }

    #[sqlx::test]
    async fn created_item_carries_the_full_category(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let category = category_service::create_category(&mut tx, electronics())
            .await
            .unwrap();

        let item = create_item(&mut tx, widget("X1", reference(category.id)))
            .await
            .unwrap();

        let attached = item.category.unwrap();
        assert_eq!(category.id, attached.id);
        assert_eq!("Electronics", attached.name);
        assert_eq!("X1", item.sku);
        assert_eq!(Decimal::new(999, 2), item.price);
    }

    #[sqlx::test]
    async fn unknown_category_reference_persists_nothing(db: PgPool) {
        let mut tx = db.begin().await.unwrap();

        let result = create_item(&mut tx, widget("X2", reference(999))).await;

        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::BadRequest(_)))
        ));
        assert_eq!(0, item_repository::count_items(&mut tx).await.unwrap());
    }

    #[sqlx::test]
    async fn item_without_category_is_fine(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let item = create_item(&mut tx, widget("X1", None)).await.unwrap();
        assert_eq!(None, item.category);
    }

    #[sqlx::test]
    async fn reference_without_id_means_no_category(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let item = create_item(&mut tx, widget("X1", Some(CategoryRef { id: None })))
            .await
            .unwrap();
        assert_eq!(None, item.category);
    }

    #[sqlx::test]
    async fn update_replaces_fields_and_keeps_category(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let category = category_service::create_category(&mut tx, electronics())
            .await
            .unwrap();
        let item = create_item(&mut tx, widget("X1", reference(category.id)))
            .await
            .unwrap();

        let replacement = Valid::new(NewItem {
            sku: "X1-B".to_string(),
            name: "Better widget".to_string(),
            price: Decimal::new(1999, 2),
            stock: 3,
            category: None,
        })
        .unwrap();
        let updated = update_item(&mut tx, item.id, replacement)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(item.id, updated.id);
        assert_eq!("X1-B", updated.sku);
        assert_eq!(Decimal::new(1999, 2), updated.price);
        assert_eq!(3, updated.stock);
        // No reference in the payload, so the stored one survives.
        assert_eq!(category.id, updated.category.unwrap().id);
    }

    #[sqlx::test]
    async fn update_can_move_an_item_between_categories(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let first = category_service::create_category(&mut tx, electronics())
            .await
            .unwrap();
        let second = category_service::create_category(
            &mut tx,
            Valid::new(NewCategory {
                code: "TOOL".to_string(),
                name: "Tools".to_string(),
            })
            .unwrap(),
        )
        .await
        .unwrap();
        let item = create_item(&mut tx, widget("X1", reference(first.id)))
            .await
            .unwrap();

        let updated = update_item(&mut tx, item.id, widget("X1", reference(second.id)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(second.id, updated.category.unwrap().id);
    }

    #[sqlx::test]
    async fn update_of_unknown_item_is_none(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let updated = update_item(&mut tx, 999, widget("X1", None)).await.unwrap();
        assert_eq!(None, updated);
    }

    #[sqlx::test]
    async fn failed_reference_check_leaves_the_row_untouched(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let item = create_item(&mut tx, widget("X1", None)).await.unwrap();

        let result = update_item(&mut tx, item.id, widget("X1-B", reference(999))).await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::BadRequest(_)))
        ));

        let persisted = read_item(&mut tx, item.id).await.unwrap().unwrap();
        assert_eq!("X1", persisted.sku);
    }

    #[sqlx::test]
    async fn delete_is_true_then_false(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let item = create_item(&mut tx, widget("X1", None)).await.unwrap();

        assert!(delete_item(&mut tx, item.id).await.unwrap());
        assert!(!delete_item(&mut tx, item.id).await.unwrap());
        assert_eq!(None, read_item(&mut tx, item.id).await.unwrap());
    }

    #[sqlx::test]
    async fn listing_by_category_pages_without_gaps_or_overlap(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let category = category_service::create_category(&mut tx, electronics())
            .await
            .unwrap();
        let other = category_service::create_category(
            &mut tx,
            Valid::new(NewCategory {
                code: "TOOL".to_string(),
                name: "Tools".to_string(),
            })
            .unwrap(),
        )
        .await
        .unwrap();

        for i in 0..5 {
            create_item(&mut tx, widget(&format!("E{i}"), reference(category.id)))
                .await
                .unwrap();
        }
        create_item(&mut tx, widget("T0", reference(other.id)))
            .await
            .unwrap();

        let mut seen = Vec::new();
        for page in 0..3 {
            let result =
                list_items_by_category(&mut tx, category.id, &PaginationParams::new(page, 2))
                    .await
                    .unwrap();
            assert_eq!(5, result.total_elements);
            assert_eq!(3, result.total_pages);
            for item in result.content {
                assert_eq!(category.id, item.category.as_ref().unwrap().id);
                assert!(!seen.contains(&item.id));
                seen.push(item.id);
            }
        }
        assert_eq!(5, seen.len());
    }

    #[sqlx::test]
    async fn unknown_category_listing_is_an_empty_page(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let page = list_items_by_category(&mut tx, 999, &PaginationParams::default())
            .await
            .unwrap();
        assert!(page.content.is_empty());
        assert_eq!(0, page.total_elements);
    }

    #[sqlx::test]
    async fn deleting_a_category_leaves_its_items_dangling(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let category = category_service::create_category(&mut tx, electronics())
            .await
            .unwrap();
        let item = create_item(&mut tx, widget("X1", reference(category.id)))
            .await
            .unwrap();

        assert!(category_service::delete_category(&mut tx, category.id)
            .await
            .unwrap());

        // The item survives; its reference no longer resolves.
        let persisted = read_item(&mut tx, item.id).await.unwrap().unwrap();
        assert_eq!(None, persisted.category);
        assert_eq!(1, item_repository::count_items(&mut tx).await.unwrap());
    }
}
