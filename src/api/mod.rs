use crate::infra::state::AppState;
use axum::Router;

pub mod category;
pub mod info;
pub mod item;

/// Constructs the full REST API.
pub fn api(state: AppState) -> Router {
    Router::new()
        .merge(info::info_api::routes())
        .merge(category::category_api::routes())
        .merge(item::item_api::routes())
        .with_state(state)
}
