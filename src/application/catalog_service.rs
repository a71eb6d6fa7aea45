use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::catalog::{
    Article, ArticlePatch, Catalog, Category, CategoryFilter, CategoryPatch, NewArticle,
    NewCategory,
};
use crate::domain::errors::DomainError;
use crate::domain::ids::{ArticleId, CategoryId};

use super::seed;
use super::storage::{Storage, ARTICLES_KEY, CATEGORIES_KEY};

#[derive(Debug, Clone, Copy)]
enum Collection {
    Categories,
    Articles,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Categories => CATEGORIES_KEY,
            Collection::Articles => ARTICLES_KEY,
        }
    }

    fn encode(self, catalog: &Catalog) -> serde_json::Result<String> {
        match self {
            Collection::Categories => serde_json::to_string(catalog.categories()),
            Collection::Articles => serde_json::to_string(catalog.articles()),
        }
    }
}

/// The catalog mirrored to storage. Each successful mutation writes the
/// whole affected collection once; failed ones write nothing and leave the
/// in-memory catalog unchanged.
///
/// A stored collection that does not decode is left as it is: the session
/// starts without it and the catalog stays read-only until it is repaired.
#[derive(Debug)]
pub struct CatalogService {
    storage: Storage,
    catalog: Catalog,
    unreadable: Vec<&'static str>,
}

impl CatalogService {
    /// Loads categories and articles, seeding whichever collection is absent.
    pub fn load(storage: Storage) -> Self {
        let mut unreadable = Vec::new();
        let categories = load_or_seed(
            &storage,
            CATEGORIES_KEY,
            seed::default_categories,
            &mut unreadable,
        );
        let articles = load_or_seed(
            &storage,
            ARTICLES_KEY,
            seed::default_articles,
            &mut unreadable,
        );
        log::debug!(
            "Catalog loaded: {} categories, {} articles",
            categories.len(),
            articles.len()
        );
        Self {
            storage,
            catalog: Catalog::new(categories, articles),
            unreadable,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// False when a stored collection could not be decoded at load time.
    pub fn is_writable(&self) -> bool {
        self.unreadable.is_empty()
    }

    pub fn list_categories(&self) -> &[Category] {
        self.catalog.categories()
    }

    pub fn list_articles(&self) -> &[Article] {
        self.catalog.articles()
    }

    pub fn articles_by_category(&self, filter: CategoryFilter) -> Vec<&Article> {
        self.catalog.articles_by_category(filter)
    }

    pub fn category_name(&self, id: CategoryId) -> &str {
        self.catalog.category_name(id)
    }

    pub fn find_article(&self, id: ArticleId) -> Option<&Article> {
        self.catalog.find_article(id)
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.catalog.find_category(id)
    }

    pub fn add_category(&mut self, new: NewCategory) -> Result<Category, DomainError> {
        self.commit(Collection::Categories, |catalog| catalog.add_category(new))
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        self.commit(Collection::Categories, |catalog| {
            catalog.update_category(id, patch)
        })
    }

    pub fn delete_category(&mut self, id: CategoryId) -> Result<Category, DomainError> {
        self.commit(Collection::Categories, |catalog| catalog.delete_category(id))
    }

    pub fn add_article(&mut self, new: NewArticle) -> Result<Article, DomainError> {
        self.commit(Collection::Articles, |catalog| catalog.add_article(new))
    }

    pub fn update_article(
        &mut self,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> Result<Article, DomainError> {
        self.commit(Collection::Articles, |catalog| {
            catalog.update_article(id, patch)
        })
    }

    pub fn delete_article(&mut self, id: ArticleId) -> Result<Article, DomainError> {
        self.commit(Collection::Articles, |catalog| catalog.delete_article(id))
    }

    /// Applies `change` to a copy of the catalog and swaps it in only once
    /// the affected collection has been encoded and written.
    fn commit<T>(
        &mut self,
        collection: Collection,
        change: impl FnOnce(&mut Catalog) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        if let Some(key) = self.unreadable.first() {
            return Err(DomainError::Internal(format!(
                "stored '{}' is unreadable, catalog is read-only",
                key
            )));
        }

        let mut next = self.catalog.clone();
        let out = change(&mut next)?;
        let key = collection.key();
        let json = collection
            .encode(&next)
            .map_err(|e| DomainError::Internal(format!("could not encode '{}': {}", key, e)))?;

        log::debug!("Persisting '{}' ({} bytes)", key, json.len());
        self.storage.set(key, &json);
        self.catalog = next;
        Ok(out)
    }
}

fn load_or_seed<T: Serialize + DeserializeOwned>(
    storage: &Storage,
    key: &'static str,
    defaults: fn() -> Vec<T>,
    unreadable: &mut Vec<&'static str>,
) -> Vec<T> {
    match storage.try_load_json::<Vec<T>>(key) {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            log::info!("No {} stored, seeding defaults", key);
            let seeded = defaults();
            storage.save_json(key, &seeded);
            seeded
        }
        Err(e) => {
            log::warn!(
                "Stored '{}' is unreadable ({}); leaving it untouched, catalog is read-only",
                key,
                e
            );
            unreadable.push(key);
            Vec::new()
        }
    }
}
