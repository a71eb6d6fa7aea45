use bigdecimal::BigDecimal;

use crate::domain::basket::{Basket, BasketItem};
use crate::domain::catalog::Article;
use crate::domain::ids::ArticleId;

use super::storage::{basket_key, Storage};

/// A user's basket mirrored under `basket_<user>`. Every mutation persists,
/// including ones that matched no line.
#[derive(Debug)]
pub struct BasketService {
    storage: Storage,
    basket: Basket,
}

impl BasketService {
    pub fn load(storage: Storage, user_id: &str) -> Self {
        let items = storage
            .load_json::<Vec<BasketItem>>(&basket_key(user_id))
            .unwrap_or_default();
        log::debug!("Basket for '{}' loaded with {} line(s)", user_id, items.len());
        Self {
            storage,
            basket: Basket::with_items(user_id, items),
        }
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn add_item(&mut self, article: &Article, size: &str) -> &mut Self {
        self.basket.add_item(article, size);
        self.persist()
    }

    pub fn remove_item(&mut self, article_id: ArticleId, size: &str) -> &mut Self {
        self.basket.remove_item(article_id, size);
        self.persist()
    }

    pub fn delete_item(&mut self, article_id: ArticleId, size: &str) -> &mut Self {
        self.basket.delete_item(article_id, size);
        self.persist()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.basket.clear();
        self.persist()
    }

    pub fn total(&self) -> BigDecimal {
        self.basket.total()
    }

    pub fn item_count(&self) -> u32 {
        self.basket.item_count()
    }

    fn persist(&mut self) -> &mut Self {
        self.storage
            .save_json(&basket_key(self.basket.user_id()), self.basket.items());
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::application::seed;

    fn tee() -> Article {
        seed::default_articles().remove(0)
    }

    #[test]
    fn chained_mutations_persist() {
        let storage = Storage::in_memory();
        let mut service = BasketService::load(storage.clone(), "guest");
        let tee = tee();
        service
            .add_item(&tee, "M")
            .add_item(&tee, "M")
            .add_item(&tee, "L")
            .remove_item(tee.id, "L");

        assert_eq!(service.item_count(), 2);
        assert_eq!(service.total(), BigDecimal::from_str("39.98").unwrap());

        let reloaded = BasketService::load(storage, "guest");
        assert_eq!(reloaded.basket(), service.basket());
    }

    #[test]
    fn users_do_not_share_baskets() {
        let storage = Storage::in_memory();
        BasketService::load(storage.clone(), "alice").add_item(&tee(), "S");

        let bob = BasketService::load(storage.clone(), "bob");
        assert!(bob.basket().is_empty());
        assert_eq!(BasketService::load(storage, "alice").item_count(), 1);
    }

    #[test]
    fn clear_and_delete_persist_empty_state() {
        let storage = Storage::in_memory();
        let mut service = BasketService::load(storage.clone(), "guest");
        service.add_item(&tee(), "M").add_item(&tee(), "M");
        service.delete_item(ArticleId(1), "M");
        assert!(BasketService::load(storage.clone(), "guest").basket().is_empty());

        service.add_item(&tee(), "XL").clear();
        assert_eq!(storage.get("basket_guest").as_deref(), Some("[]"));
    }

    #[test]
    fn no_op_mutations_still_write() {
        let storage = Storage::in_memory();
        let mut service = BasketService::load(storage.clone(), "guest");
        assert!(storage.get("basket_guest").is_none());
        service.remove_item(ArticleId(42), "M");
        assert_eq!(storage.get("basket_guest").as_deref(), Some("[]"));
    }

    #[test]
    fn snapshot_survives_catalog_price_change() {
        let storage = Storage::in_memory();
        let mut service = BasketService::load(storage.clone(), "guest");
        let mut tee = tee();
        service.add_item(&tee, "M");
        tee.price = BigDecimal::from_str("5.00").unwrap();
        tee.name = "Renamed".into();

        let reloaded = BasketService::load(storage, "guest");
        let line = &reloaded.basket().items()[0];
        assert_eq!(line.unit_price, BigDecimal::from_str("19.99").unwrap());
        assert_eq!(line.article_name, "T-shirt basique blanc");
    }
}
