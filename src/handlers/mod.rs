//! JSON presentation layer over the [`Storefront`].
//!
//! Every mutating route answers with the state after the mutation, so a
//! client re-renders from the response without a second request.

pub mod basket;
pub mod catalog;
pub mod orders;

use std::sync::Mutex;

use actix_web::web;
use utoipa::OpenApi;

use crate::application::storefront::Storefront;
use crate::errors::AppError;

pub type SharedStorefront = web::Data<Mutex<Storefront>>;

/// Runs `f` against the storefront on the blocking pool. The mutex keeps
/// requests strictly serial.
pub(crate) async fn with_storefront<T, F>(state: SharedStorefront, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Storefront) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        let mut shop = state
            .lock()
            .map_err(|_| AppError::Internal("storefront state is poisoned".to_string()))?;
        f(&mut shop)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::list_categories,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_articles,
        catalog::get_article,
        catalog::create_article,
        catalog::update_article,
        catalog::delete_article,
        basket::get_basket,
        basket::add_item,
        basket::increment_item,
        basket::decrement_item,
        basket::delete_item,
        basket::clear_basket,
        basket::switch_user,
        orders::list_orders,
        orders::checkout,
    ),
    tags(
        (name = "catalog", description = "Categories and articles"),
        (name = "basket", description = "The current user's basket"),
        (name = "orders", description = "Checkout and order history"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::storage::Storage;

    pub fn shared_storefront() -> SharedStorefront {
        web::Data::new(Mutex::new(Storefront::open(Storage::in_memory(), "guest")))
    }
}
