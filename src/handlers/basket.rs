use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::basket::{Basket, BasketItem};
use crate::domain::ids::ArticleId;
use crate::domain::money;
use crate::errors::AppError;

use super::{with_storefront, SharedStorefront};

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Identifies one basket line.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BasketLineRequest {
    pub article_id: i64,
    pub size: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchUserRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BasketItemResponse {
    pub article_id: i64,
    pub article_name: String,
    pub size: String,
    pub qty: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&BasketItem> for BasketItemResponse {
    fn from(item: &BasketItem) -> Self {
        Self {
            article_id: item.article_id.get(),
            article_name: item.article_name.clone(),
            size: item.size.clone(),
            qty: item.qty,
            unit_price: money::to_price_string(&item.unit_price),
            line_total: money::to_price_string(&item.line_total()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BasketResponse {
    pub user_id: String,
    pub items: Vec<BasketItemResponse>,
    pub item_count: u32,
    pub total: String,
}

impl From<&Basket> for BasketResponse {
    fn from(basket: &Basket) -> Self {
        Self {
            user_id: basket.user_id().to_string(),
            items: basket.items().iter().map(BasketItemResponse::from).collect(),
            item_count: basket.item_count(),
            total: money::to_price_string(&basket.total()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /basket
#[utoipa::path(
    get,
    path = "/basket",
    responses((status = 200, description = "Current basket", body = BasketResponse)),
    tag = "basket"
)]
pub async fn get_basket(state: SharedStorefront) -> Result<HttpResponse, AppError> {
    let basket = with_storefront(state, |shop| Ok(BasketResponse::from(shop.basket()))).await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// POST /basket/items
///
/// Adds one unit. Lines are keyed by article and size, so repeating the
/// call raises the quantity of the same line.
#[utoipa::path(
    post,
    path = "/basket/items",
    request_body = BasketLineRequest,
    responses(
        (status = 200, description = "Updated basket", body = BasketResponse),
        (status = 400, description = "Out of stock or size not offered"),
        (status = 404, description = "Article not found"),
    ),
    tag = "basket"
)]
pub async fn add_item(
    state: SharedStorefront,
    body: web::Json<BasketLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line = body.into_inner();
    let basket = with_storefront(state, move |shop| {
        let basket = shop.add_to_basket(ArticleId(line.article_id), &line.size)?;
        Ok(BasketResponse::from(basket))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// POST /basket/items/increment
///
/// Adds one unit to a line already in the basket.
#[utoipa::path(
    post,
    path = "/basket/items/increment",
    request_body = BasketLineRequest,
    responses(
        (status = 200, description = "Updated basket", body = BasketResponse),
        (status = 404, description = "No such line or article"),
    ),
    tag = "basket"
)]
pub async fn increment_item(
    state: SharedStorefront,
    body: web::Json<BasketLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line = body.into_inner();
    let basket = with_storefront(state, move |shop| {
        let basket = shop.increase_item(ArticleId(line.article_id), &line.size)?;
        Ok(BasketResponse::from(basket))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// POST /basket/items/decrement
///
/// Removes one unit, dropping the line at zero. Unknown lines are ignored.
#[utoipa::path(
    post,
    path = "/basket/items/decrement",
    request_body = BasketLineRequest,
    responses((status = 200, description = "Updated basket", body = BasketResponse)),
    tag = "basket"
)]
pub async fn decrement_item(
    state: SharedStorefront,
    body: web::Json<BasketLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line = body.into_inner();
    let basket = with_storefront(state, move |shop| {
        let service = shop
            .basket_mut()
            .remove_item(ArticleId(line.article_id), &line.size);
        Ok(BasketResponse::from(service.basket()))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// DELETE /basket/items
#[utoipa::path(
    delete,
    path = "/basket/items",
    request_body = BasketLineRequest,
    responses((status = 200, description = "Updated basket", body = BasketResponse)),
    tag = "basket"
)]
pub async fn delete_item(
    state: SharedStorefront,
    body: web::Json<BasketLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line = body.into_inner();
    let basket = with_storefront(state, move |shop| {
        let service = shop
            .basket_mut()
            .delete_item(ArticleId(line.article_id), &line.size);
        Ok(BasketResponse::from(service.basket()))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// DELETE /basket
#[utoipa::path(
    delete,
    path = "/basket",
    responses((status = 200, description = "Emptied basket", body = BasketResponse)),
    tag = "basket"
)]
pub async fn clear_basket(state: SharedStorefront) -> Result<HttpResponse, AppError> {
    let basket = with_storefront(state, |shop| {
        Ok(BasketResponse::from(shop.basket_mut().clear().basket()))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// PUT /basket/user
///
/// Switches the active basket to another user's.
#[utoipa::path(
    put,
    path = "/basket/user",
    request_body = SwitchUserRequest,
    responses(
        (status = 200, description = "The user's basket", body = BasketResponse),
        (status = 400, description = "Blank user id"),
    ),
    tag = "basket"
)]
pub async fn switch_user(
    state: SharedStorefront,
    body: web::Json<SwitchUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = body.into_inner().user_id;
    let basket = with_storefront(state, move |shop| {
        Ok(BasketResponse::from(shop.switch_user(&user_id)?))
    })
    .await?;
    Ok(HttpResponse::Ok().json(basket))
}
