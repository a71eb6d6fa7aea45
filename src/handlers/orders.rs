use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::money;
use crate::domain::order::{Order, OrderLine};
use crate::errors::AppError;

use super::{with_storefront, SharedStorefront};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Explicit order id. Defaults to the current time in milliseconds.
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub article_id: i64,
    pub article_name: String,
    pub size: String,
    pub qty: u32,
    pub unit_price: String,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(l: &OrderLine) -> Self {
        Self {
            article_id: l.article_id.get(),
            article_name: l.article_name.clone(),
            size: l.size.clone(),
            qty: l.qty,
            unit_price: money::to_price_string(&l.unit_price),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub order_id: String,
    pub user_id: String,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
    pub total: String,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            order_id: o.order_id().to_string(),
            user_id: o.user_id().to_string(),
            created_at: o.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            lines: o.line_items().iter().map(OrderLineResponse::from).collect(),
            total: money::to_price_string(o.total()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// The whole order log, oldest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses((status = 200, description = "Order history", body = [OrderResponse])),
    tag = "orders"
)]
pub async fn list_orders(state: SharedStorefront) -> Result<HttpResponse, AppError> {
    let orders = with_storefront(state, |shop| {
        Ok(shop
            .orders()
            .list()
            .iter()
            .map(OrderResponse::from)
            .collect::<Vec<_>>())
    })
    .await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// POST /orders
///
/// Turns the current basket into an order, appends it to the order log and
/// empties the basket. The body is optional.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 409, description = "Basket is empty"),
        (status = 500, description = "Order log is unreadable"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    state: SharedStorefront,
    body: Option<web::Json<CheckoutRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    let order = with_storefront(state, move |shop| {
        let order = shop.checkout(request.order_id)?;
        Ok(OrderResponse::from(&order))
    })
    .await?;
    Ok(HttpResponse::Created().json(order))
}
