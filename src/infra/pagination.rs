//! Pagination of query results.

use crate::api::category::category_repository::Category;
use crate::api::item::item_repository::Item;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination parameters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// The 0-indexed page to fetch.
    page: Option<i64>,
    /// The number of elements per page.
    size: Option<i64>,
}

impl PaginationParams {
    /// Constructs pagination parameters for a specific page.
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(20).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.size()
    }

    pub fn offset(&self) -> i64 {
        self.page() * self.size()
    }
}

/// One page of a larger result set plus paging metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(CategoryPage = Page<Category>, ItemPage = Page<Item>)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The elements on this page.
    pub content: Vec<T>,
    /// The total number of elements across all pages.
    pub total_elements: i64,
    /// The total number of pages.
    pub total_pages: i64,
    /// The 0-indexed page number.
    pub number: i64,
    /// The page size.
    pub size: i64,
}

impl<T> Page<T> {
    /// Wraps one page of content in the paging envelope.
    pub fn new(content: Vec<T>, total_elements: i64, params: &PaginationParams) -> Self {
        let size = params.size();
        Self {
            content,
            total_elements,
            total_pages: (total_elements + size - 1) / size,
            number: params.page(),
            size,
        }
    }
}
