use bigdecimal::BigDecimal;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::basket::{Basket, BasketItem};
use super::ids::ArticleId;
use super::money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub article_id: ArticleId,
    pub article_name: String,
    pub size: String,
    pub qty: u32,
    #[serde(with = "money")]
    pub unit_price: BigDecimal,
}

impl From<&BasketItem> for OrderLine {
    fn from(item: &BasketItem) -> Self {
        Self {
            article_id: item.article_id,
            article_name: item.article_name.clone(),
            size: item.size.clone(),
            qty: item.qty,
            unit_price: item.unit_price.clone(),
        }
    }
}

/// Immutable record of a basket at checkout.
///
/// Serialized with the field names existing order logs use (`date`,
/// `articles`); `timestamp` and `lineItems` are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    order_id: String,
    user_id: String,
    #[serde(rename = "date", alias = "timestamp", with = "iso_millis")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "articles", alias = "lineItems")]
    line_items: Vec<OrderLine>,
    #[serde(with = "money")]
    total: BigDecimal,
}

impl Order {
    /// Snapshots `basket` by value. Emptiness is not checked here; callers
    /// guard it (see `Storefront::checkout`).
    pub fn from_basket(basket: &Basket, order_id: Option<String>) -> Self {
        Self::from_basket_at(basket, order_id, Utc::now())
    }

    /// Like [`from_basket`](Self::from_basket) with an explicit clock. The
    /// timestamp is truncated to the millisecond, the precision it is stored at.
    pub fn from_basket_at(basket: &Basket, order_id: Option<String>, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            order_id: order_id.unwrap_or_else(|| default_order_id(now)),
            user_id: basket.user_id().to_string(),
            timestamp: now,
            line_items: basket.items().iter().map(OrderLine::from).collect(),
            total: basket.total(),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn line_items(&self) -> &[OrderLine] {
        &self.line_items
    }

    pub fn total(&self) -> &BigDecimal {
        &self.total
    }
}

/// Unix milliseconds as decimal text. Unique enough for one writer; two
/// checkouts within the same millisecond would collide.
fn default_order_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;
    use crate::domain::catalog::Article;
    use crate::domain::ids::CategoryId;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn basket() -> Basket {
        let article = Article {
            id: ArticleId(3),
            name: "Jean slim noir".into(),
            price: dec("49.99"),
            stock: 10,
            sizes: vec!["S".into(), "M".into()],
            category_id: CategoryId(2),
            image: String::new(),
        };
        let mut basket = Basket::new("guest");
        basket.add_item(&article, "S");
        basket.add_item(&article, "S");
        basket.add_item(&article, "M");
        basket
    }

    #[test]
    fn snapshot_copies_lines_and_total() {
        let mut basket = basket();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let order = Order::from_basket_at(&basket, None, now);

        assert_eq!(order.order_id(), now.timestamp_millis().to_string());
        assert_eq!(order.user_id(), "guest");
        assert_eq!(order.line_items().len(), 2);
        assert_eq!(order.line_items()[0].qty, 2);
        assert_eq!(order.total(), &dec("149.97"));

        basket.clear();
        assert_eq!(order.line_items().len(), 2);
    }

    #[test]
    fn explicit_order_id_wins() {
        let order = Order::from_basket(&basket(), Some("A-1".into()));
        assert_eq!(order.order_id(), "A-1");
    }

    #[test]
    fn json_matches_existing_order_logs() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let order = Order::from_basket_at(&basket(), Some("1".into()), now);
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["date"], "2026-10-19T08:30:00.000Z");
        assert_eq!(value["articles"][0]["articleName"], "Jean slim noir");
        assert_eq!(value["articles"][0]["unitPrice"], 49.99);
        assert_eq!(value["total"], 149.97);

        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn reads_alternate_field_names() {
        let json = r#"{"orderId":"9","userId":"bob","timestamp":"2026-01-02T03:04:05.678Z",
            "lineItems":[{"articleId":"1","articleName":"Tee","size":"M","qty":1,"unitPrice":"19.99"}],
            "total":19.99}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.user_id(), "bob");
        assert_eq!(order.line_items()[0].article_id, ArticleId(1));
        assert_eq!(order.timestamp().timestamp_subsec_millis(), 678);
    }
}
