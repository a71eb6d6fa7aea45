use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::DomainError;
use super::ids::{ArticleId, CategoryId};
use super::money;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=Article";

/// Label returned by [`Catalog::category_name`] for ids with no category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: CategoryId,
    #[serde(rename = "categoryName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "articleId")]
    pub id: ArticleId,
    #[serde(rename = "articleName")]
    pub name: String,
    #[serde(with = "money")]
    pub price: BigDecimal,
    pub stock: u32,
    pub sizes: Vec<String>,
    pub category_id: CategoryId,
    #[serde(default = "placeholder_image", deserialize_with = "image_or_placeholder")]
    pub image: String,
}

impl Article {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

fn image_or_placeholder<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let image = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_image(image))
}

fn normalize_image(image: Option<String>) -> String {
    match image {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => placeholder_image(),
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub name: String,
    pub price: BigDecimal,
    pub stock: u32,
    pub sizes: Vec<String>,
    pub category_id: CategoryId,
    pub image: Option<String>,
}

/// Partial update for an [`Article`]. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub name: Option<String>,
    pub price: Option<BigDecimal>,
    pub stock: Option<u32>,
    pub sizes: Option<Vec<String>>,
    pub category_id: Option<CategoryId>,
    pub image: Option<String>,
}

impl ArticlePatch {
    /// Field-by-field merge onto `article`. The id is never touched.
    pub fn merge(&self, article: &Article) -> Article {
        Article {
            id: article.id,
            name: self.name.clone().unwrap_or_else(|| article.name.clone()),
            price: self.price.clone().unwrap_or_else(|| article.price.clone()),
            stock: self.stock.unwrap_or(article.stock),
            sizes: self.sizes.clone().unwrap_or_else(|| article.sizes.clone()),
            category_id: self.category_id.unwrap_or(article.category_id),
            image: match &self.image {
                Some(image) => normalize_image(Some(image.clone())),
                None => article.image.clone(),
            },
        }
    }
}

/// Category selector for [`Catalog::articles_by_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<i64>()
            .map(|id| CategoryFilter::Only(CategoryId(id)))
            .map_err(|_| DomainError::InvalidInput(format!("unknown category filter '{}'", s)))
    }
}

/// Categories and articles with their integrity rules. Pure in-memory state;
/// persistence lives in `CatalogService`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
    articles: Vec<Article>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, articles: Vec<Article>) -> Self {
        Self {
            categories,
            articles,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn articles_by_category(&self, filter: CategoryFilter) -> Vec<&Article> {
        match filter {
            CategoryFilter::All => self.articles.iter().collect(),
            CategoryFilter::Only(id) => self
                .articles
                .iter()
                .filter(|a| a.category_id == id)
                .collect(),
        }
    }

    pub fn category_name(&self, id: CategoryId) -> &str {
        self.find_category(id)
            .map_or(UNKNOWN_CATEGORY, |c| c.name.as_str())
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn find_article(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn add_category(&mut self, new: NewCategory) -> Result<Category, DomainError> {
        let category = Category {
            id: CategoryId::next_after(self.categories.iter().map(|c| c.id)),
            name: required_name(&new.name, "category name")?,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        let name = patch
            .name
            .as_deref()
            .map(|n| required_name(n, "category name"))
            .transpose()?;
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        if let Some(name) = name {
            category.name = name;
        }
        Ok(category.clone())
    }

    /// Refuses while any article still references the category.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<Category, DomainError> {
        let in_use = self.articles.iter().filter(|a| a.category_id == id).count();
        if in_use > 0 {
            return Err(DomainError::CategoryInUse {
                id,
                articles: in_use,
            });
        }
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.categories.remove(index))
    }

    pub fn add_article(&mut self, new: NewArticle) -> Result<Article, DomainError> {
        let article = Article {
            id: ArticleId::next_after(self.articles.iter().map(|a| a.id)),
            name: new.name,
            price: new.price,
            stock: new.stock,
            sizes: new.sizes,
            category_id: new.category_id,
            image: normalize_image(new.image),
        };
        let article = self.validate_article(article)?;
        self.articles.push(article.clone());
        Ok(article)
    }

    pub fn update_article(
        &mut self,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> Result<Article, DomainError> {
        let index = self
            .articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(DomainError::NotFound)?;
        let merged = self.validate_article(patch.merge(&self.articles[index]))?;
        self.articles[index] = merged.clone();
        Ok(merged)
    }

    pub fn delete_article(&mut self, id: ArticleId) -> Result<Article, DomainError> {
        let index = self
            .articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(DomainError::NotFound)?;
        Ok(self.articles.remove(index))
    }

    fn validate_article(&self, mut article: Article) -> Result<Article, DomainError> {
        article.name = required_name(&article.name, "article name")?;
        article.sizes = normalize_sizes(article.sizes)?;
        if article.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "price must not be negative, got {}",
                article.price
            )));
        }
        money::check_storable(&article.price).map_err(DomainError::InvalidInput)?;
        if self.find_category(article.category_id).is_none() {
            return Err(DomainError::InvalidInput(format!(
                "category {} does not exist",
                article.category_id
            )));
        }
        Ok(article)
    }
}

fn required_name(name: &str, field: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} is required", field)));
    }
    Ok(name.to_string())
}

/// Trims, drops blanks and repeats (first occurrence wins).
fn normalize_sizes(sizes: Vec<String>) -> Result<Vec<String>, DomainError> {
    let mut out: Vec<String> = Vec::with_capacity(sizes.len());
    for size in sizes {
        let size = size.trim();
        if !size.is_empty() && !out.iter().any(|s| s == size) {
            out.push(size.to_string());
        }
    }
    if out.is_empty() {
        return Err(DomainError::InvalidInput(
            "at least one size is required".to_string(),
        ));
    }
    Ok(out)
}
