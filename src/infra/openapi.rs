//! OpenAPI configuration.

use crate::api::category::{category_api, category_repository};
use crate::api::info::info_api;
use crate::api::item::{item_api, item_repository};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        info_api::info,
        category_api::list_categories,
        category_api::create_category,
        category_api::get_category,
        category_api::update_category,
        category_api::delete_category,
        category_api::list_category_items,
        item_api::list_items,
        item_api::create_item,
        item_api::get_item,
        item_api::update_item,
        item_api::delete_item,
    ),
    components(
        schemas(
            info_api::AppInfo,
            category_repository::Category,
            category_repository::NewCategory,
            item_repository::Item,
            item_repository::NewItem,
            item_repository::CategoryRef,
            crate::infra::pagination::CategoryPage,
            crate::infra::pagination::ItemPage,
            crate::infra::error::ErrorBody
        )
    )
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;
