//! Application state: the catalog, the current user's basket and the order
//! log, built once by the entry point and handed to the HTTP layer.

use crate::domain::basket::{Basket, GUEST_USER};
use crate::domain::errors::DomainError;
use crate::domain::ids::ArticleId;
use crate::domain::order::Order;

use super::basket_service::BasketService;
use super::catalog_service::CatalogService;
use super::order_log::OrderLog;
use super::storage::Storage;

#[derive(Debug)]
pub struct Storefront {
    storage: Storage,
    catalog: CatalogService,
    basket: BasketService,
    orders: OrderLog,
}

impl Storefront {
    /// Seeds the catalog if needed and rehydrates `user_id`'s basket
    /// (blank means the guest user).
    pub fn open(storage: Storage, user_id: &str) -> Self {
        let user_id = match user_id.trim() {
            "" => GUEST_USER,
            id => id,
        };
        Self {
            catalog: CatalogService::load(storage.clone()),
            basket: BasketService::load(storage.clone(), user_id),
            orders: OrderLog::new(storage.clone()),
            storage,
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogService {
        &mut self.catalog
    }

    pub fn basket(&self) -> &Basket {
        self.basket.basket()
    }

    pub fn basket_mut(&mut self) -> &mut BasketService {
        &mut self.basket
    }

    pub fn orders(&self) -> &OrderLog {
        &self.orders
    }

    pub fn is_degraded(&self) -> bool {
        self.storage.is_degraded()
    }

    /// Loads another user's basket. The previous one stays persisted.
    pub fn switch_user(&mut self, user_id: &str) -> Result<&Basket, DomainError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(DomainError::InvalidInput("user id is required".to_string()));
        }
        self.basket = BasketService::load(self.storage.clone(), user_id);
        Ok(self.basket.basket())
    }

    /// Adds one unit of a catalog article in `size`. The article must exist,
    /// be in stock and offer that size.
    pub fn add_to_basket(&mut self, article_id: ArticleId, size: &str) -> Result<&Basket, DomainError> {
        let article = self
            .catalog
            .find_article(article_id)
            .ok_or(DomainError::NotFound)?;
        if !article.in_stock() {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is out of stock",
                article.name
            )));
        }
        if !article.offers_size(size) {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not available in size {}",
                article.name, size
            )));
        }
        Ok(self.basket.add_item(article, size).basket())
    }

    /// Adds one more unit to an existing line, snapshotting nothing new:
    /// the line keeps the price it was created with.
    pub fn increase_item(&mut self, article_id: ArticleId, size: &str) -> Result<&Basket, DomainError> {
        if self.basket.basket().find(article_id, size).is_none() {
            return Err(DomainError::NotFound);
        }
        let article = self
            .catalog
            .find_article(article_id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.basket.add_item(article, size).basket())
    }

    /// Records the current basket as an order and empties the basket.
    pub fn checkout(&mut self, order_id: Option<String>) -> Result<Order, DomainError> {
        if self.basket.basket().is_empty() {
            return Err(DomainError::EmptyBasket);
        }
        let order = Order::from_basket(self.basket.basket(), order_id);
        self.orders.append(&order)?;
        self.basket.clear();
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::storage::testing::FlakyStore;
    use crate::domain::catalog::ArticlePatch;

    fn open() -> (Storage, Storefront) {
        let storage = Storage::in_memory();
        let shop = Storefront::open(storage.clone(), "guest");
        (storage, shop)
    }

    #[test]
    fn blank_user_is_guest() {
        let shop = Storefront::open(Storage::in_memory(), "  ");
        assert_eq!(shop.basket().user_id(), "guest");
    }

    #[test]
    fn add_to_basket_checks_catalog() {
        let (_, mut shop) = open();
        assert!(matches!(
            shop.add_to_basket(ArticleId(99), "M"),
            Err(DomainError::NotFound)
        ));
        assert!(matches!(
            shop.add_to_basket(ArticleId(1), "XXL"),
            Err(DomainError::InvalidInput(_))
        ));
        shop.catalog_mut()
            .update_article(
                ArticleId(2),
                ArticlePatch {
                    stock: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            shop.add_to_basket(ArticleId(2), "M"),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(shop.basket().is_empty());

        let basket = shop.add_to_basket(ArticleId(1), "M").unwrap();
        assert_eq!(basket.item_count(), 1);
    }

    #[test]
    fn increase_keeps_original_snapshot() {
        let (_, mut shop) = open();
        shop.add_to_basket(ArticleId(1), "M").unwrap();
        shop.catalog_mut()
            .update_article(
                ArticleId(1),
                ArticlePatch {
                    price: Some(BigDecimal::from_str("1.00").unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();
        let basket = shop.increase_item(ArticleId(1), "M").unwrap();
        assert_eq!(basket.items()[0].qty, 2);
        assert_eq!(basket.total(), BigDecimal::from_str("39.98").unwrap());

        assert!(matches!(
            shop.increase_item(ArticleId(1), "L"),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn checkout_records_order_and_empties_basket() {
        let (storage, mut shop) = open();
        shop.add_to_basket(ArticleId(3), "S").unwrap();
        shop.add_to_basket(ArticleId(3), "S").unwrap();

        let order = shop.checkout(None).unwrap();
        assert_eq!(order.total(), &BigDecimal::from_str("99.98").unwrap());
        assert!(shop.basket().is_empty());
        assert_eq!(shop.orders().len(), 1);

        let reopened = Storefront::open(storage, "guest");
        assert!(reopened.basket().is_empty());
        assert_eq!(reopened.orders().list(), vec![order]);
    }

    #[test]
    fn empty_basket_cannot_check_out() {
        let (_, mut shop) = open();
        assert!(matches!(shop.checkout(None), Err(DomainError::EmptyBasket)));
        assert!(shop.orders().is_empty());
    }

    #[test]
    fn order_creation_alone_leaves_basket_intact() {
        let (_, mut shop) = open();
        shop.add_to_basket(ArticleId(1), "S").unwrap();
        let order = Order::from_basket(shop.basket(), Some("manual".into()));
        shop.orders().append(&order).unwrap();
        assert_eq!(shop.orders().len(), 1);
        assert_eq!(shop.basket().item_count(), 1);
    }

    #[test]
    fn switching_users_swaps_baskets() {
        let (storage, mut shop) = open();
        shop.add_to_basket(ArticleId(1), "M").unwrap();
        assert!(shop.switch_user("alice").unwrap().is_empty());
        shop.add_to_basket(ArticleId(4), "L").unwrap();
        assert_eq!(shop.switch_user("guest").unwrap().items()[0].article_id, ArticleId(1));
        assert!(shop.switch_user(" ").is_err());

        let alice = Storefront::open(storage, "alice");
        assert_eq!(alice.basket().items()[0].article_id, ArticleId(4));
    }

    #[test]
    fn storage_outage_keeps_the_session_working() {
        let backend = FlakyStore::default();
        backend.set_down(true);
        let mut shop = Storefront::open(Storage::new(backend.clone()), "guest");

        assert!(shop.is_degraded());
        assert_eq!(shop.catalog().list_articles().len(), 6);
        shop.add_to_basket(ArticleId(1), "M").unwrap();
        shop.checkout(None).unwrap();
        assert_eq!(shop.orders().len(), 1);
        assert!(backend.inner.is_empty());
    }
}
