use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::catalog::Article;
use super::ids::ArticleId;
use super::money;

pub const GUEST_USER: &str = "guest";

/// One basket line, unique per `(article_id, size)`.
///
/// Name and unit price are copied from the article when the line is
/// created, so later catalog edits do not reprice what is already in the
/// basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    pub article_id: ArticleId,
    pub article_name: String,
    #[serde(with = "money")]
    pub unit_price: BigDecimal,
    pub size: String,
    pub qty: u32,
}

impl BasketItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.qty)
    }

    fn matches(&self, article_id: ArticleId, size: &str) -> bool {
        self.article_id == article_id && self.size == size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    user_id: String,
    items: Vec<BasketItem>,
}

impl Basket {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_items(user_id, Vec::new())
    }

    /// Rehydrates a basket. Lines with a zero quantity are dropped and
    /// duplicate `(article, size)` lines are folded into the first one.
    pub fn with_items(user_id: impl Into<String>, items: Vec<BasketItem>) -> Self {
        let mut basket = Self {
            user_id: user_id.into(),
            items: Vec::with_capacity(items.len()),
        };
        for item in items.into_iter().filter(|i| i.qty > 0) {
            match basket.position(item.article_id, &item.size) {
                Some(index) => {
                    let line = &mut basket.items[index];
                    line.qty = line.qty.saturating_add(item.qty);
                }
                None => basket.items.push(item),
            }
        }
        basket
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn items(&self) -> &[BasketItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, article_id: ArticleId, size: &str) -> Option<&BasketItem> {
        self.items.iter().find(|i| i.matches(article_id, size))
    }

    pub fn add_item(&mut self, article: &Article, size: &str) {
        match self.position(article.id, size) {
            Some(index) => {
                let line = &mut self.items[index];
                line.qty = line.qty.saturating_add(1);
            }
            None => self.items.push(BasketItem {
                article_id: article.id,
                article_name: article.name.clone(),
                unit_price: article.price.clone(),
                size: size.to_string(),
                qty: 1,
            }),
        }
    }

    /// Decrements the line, dropping it when the quantity reaches zero.
    /// Returns whether a line matched.
    pub fn remove_item(&mut self, article_id: ArticleId, size: &str) -> bool {
        let Some(index) = self.position(article_id, size) else {
            return false;
        };
        if self.items[index].qty > 1 {
            self.items[index].qty -= 1;
        } else {
            self.items.remove(index);
        }
        true
    }

    /// Drops the line whatever its quantity. Returns whether a line matched.
    pub fn delete_item(&mut self, article_id: ArticleId, size: &str) -> bool {
        match self.position(article_id, size) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::from(0), |sum, item| sum + item.line_total())
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, i| count.saturating_add(i.qty))
    }

    fn position(&self, article_id: ArticleId, size: &str) -> Option<usize> {
        self.items.iter().position(|i| i.matches(article_id, size))
    }
}

impl Default for Basket {
    fn default() -> Self {
        Self::new(GUEST_USER)
    }
}
