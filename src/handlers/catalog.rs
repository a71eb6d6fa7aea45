use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{
    Article, ArticlePatch, Catalog, Category, CategoryFilter, CategoryPatch, NewArticle,
    NewCategory,
};
use crate::domain::ids::{ArticleId, CategoryId};
use crate::domain::money;
use crate::errors::AppError;

use super::{with_storefront, SharedStorefront};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.get(),
            name: c.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: i64,
    pub name: String,
    /// Decimal price with two places, e.g. "19.99"
    pub price: String,
    pub stock: u32,
    pub in_stock: bool,
    pub sizes: Vec<String>,
    pub category_id: i64,
    pub category_name: String,
    pub image: String,
}

impl ArticleResponse {
    fn new(article: &Article, catalog: &Catalog) -> Self {
        Self {
            id: article.id.get(),
            name: article.name.clone(),
            price: money::to_price_string(&article.price),
            stock: article.stock,
            in_stock: article.in_stock(),
            sizes: article.sizes.clone(),
            category_id: article.category_id.get(),
            category_name: catalog.category_name(article.category_id).to_string(),
            image: article.image.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArticleRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock: u32,
    pub sizes: Vec<String>,
    pub category_id: i64,
    pub image: Option<String>,
}

impl CreateArticleRequest {
    fn into_new_article(self) -> Result<NewArticle, AppError> {
        Ok(NewArticle {
            name: self.name,
            price: money::parse(&self.price).map_err(AppError::BadRequest)?,
            stock: self.stock,
            sizes: self.sizes,
            category_id: CategoryId(self.category_id),
            image: self.image,
        })
    }
}

/// Fields left out keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateArticleRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<u32>,
    pub sizes: Option<Vec<String>>,
    pub category_id: Option<i64>,
    pub image: Option<String>,
}

impl UpdateArticleRequest {
    fn into_patch(self) -> Result<ArticlePatch, AppError> {
        Ok(ArticlePatch {
            name: self.name,
            price: self
                .price
                .as_deref()
                .map(money::parse)
                .transpose()
                .map_err(AppError::BadRequest)?,
            stock: self.stock,
            sizes: self.sizes,
            category_id: self.category_id.map(CategoryId),
            image: self.image,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    pub category: Option<String>,
}

fn all_categories(catalog: &Catalog) -> Vec<CategoryResponse> {
    catalog.categories().iter().map(CategoryResponse::from).collect()
}

// ── Categories ───────────────────────────────────────────────────────────────

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "All categories", body = [CategoryResponse])),
    tag = "catalog"
)]
pub async fn list_categories(state: SharedStorefront) -> Result<HttpResponse, AppError> {
    let categories =
        with_storefront(state, |shop| Ok(all_categories(shop.catalog().catalog()))).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Missing name"),
    ),
    tag = "catalog"
)]
pub async fn create_category(
    state: SharedStorefront,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let category = with_storefront(state, move |shop| {
        let category = shop
            .catalog_mut()
            .add_category(NewCategory { name: body.name })?;
        Ok(CategoryResponse::from(&category))
    })
    .await?;
    Ok(HttpResponse::Created().json(category))
}

/// PATCH /categories/{id}
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Blank name"),
        (status = 404, description = "Category not found"),
    ),
    tag = "catalog"
)]
pub async fn update_category(
    state: SharedStorefront,
    path: web::Path<i64>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = CategoryId(path.into_inner());
    let body = body.into_inner();
    let category = with_storefront(state, move |shop| {
        let category = shop
            .catalog_mut()
            .update_category(id, CategoryPatch { name: body.name })?;
        Ok(CategoryResponse::from(&category))
    })
    .await?;
    Ok(HttpResponse::Ok().json(category))
}

/// DELETE /categories/{id}
///
/// Refused with 409 while any article still belongs to the category.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Remaining categories", body = [CategoryResponse]),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has articles"),
    ),
    tag = "catalog"
)]
pub async fn delete_category(
    state: SharedStorefront,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = CategoryId(path.into_inner());
    let categories = with_storefront(state, move |shop| {
        shop.catalog_mut().delete_category(id)?;
        Ok(all_categories(shop.catalog().catalog()))
    })
    .await?;
    Ok(HttpResponse::Ok().json(categories))
}

// ── Articles ─────────────────────────────────────────────────────────────────

/// GET /articles
#[utoipa::path(
    get,
    path = "/articles",
    params(("category" = Option<String>, Query, description = "Category id, or \"all\" (default)")),
    responses(
        (status = 200, description = "Matching articles", body = [ArticleResponse]),
        (status = 400, description = "Unparseable category filter"),
    ),
    tag = "catalog"
)]
pub async fn list_articles(
    state: SharedStorefront,
    query: web::Query<ArticlesQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = match query.into_inner().category {
        Some(raw) => raw.parse::<CategoryFilter>()?,
        None => CategoryFilter::All,
    };
    let articles = with_storefront(state, move |shop| {
        let catalog = shop.catalog().catalog();
        Ok(catalog
            .articles_by_category(filter)
            .into_iter()
            .map(|a| ArticleResponse::new(a, catalog))
            .collect::<Vec<_>>())
    })
    .await?;
    Ok(HttpResponse::Ok().json(articles))
}

/// GET /articles/{id}
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article found", body = ArticleResponse),
        (status = 404, description = "Article not found"),
    ),
    tag = "catalog"
)]
pub async fn get_article(
    state: SharedStorefront,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = ArticleId(path.into_inner());
    let article = with_storefront(state, move |shop| {
        let catalog = shop.catalog().catalog();
        catalog
            .find_article(id)
            .map(|a| ArticleResponse::new(a, catalog))
            .ok_or(AppError::NotFound)
    })
    .await?;
    Ok(HttpResponse::Ok().json(article))
}

/// POST /articles
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Missing or invalid fields"),
    ),
    tag = "catalog"
)]
pub async fn create_article(
    state: SharedStorefront,
    body: web::Json<CreateArticleRequest>,
) -> Result<HttpResponse, AppError> {
    let new_article = body.into_inner().into_new_article()?;
    let article = with_storefront(state, move |shop| {
        let article = shop.catalog_mut().add_article(new_article)?;
        Ok(ArticleResponse::new(&article, shop.catalog().catalog()))
    })
    .await?;
    Ok(HttpResponse::Created().json(article))
}

/// PATCH /articles/{id}
#[utoipa::path(
    patch,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Article not found"),
    ),
    tag = "catalog"
)]
pub async fn update_article(
    state: SharedStorefront,
    path: web::Path<i64>,
    body: web::Json<UpdateArticleRequest>,
) -> Result<HttpResponse, AppError> {
    let id = ArticleId(path.into_inner());
    let patch = body.into_inner().into_patch()?;
    let article = with_storefront(state, move |shop| {
        let article = shop.catalog_mut().update_article(id, patch)?;
        Ok(ArticleResponse::new(&article, shop.catalog().catalog()))
    })
    .await?;
    Ok(HttpResponse::Ok().json(article))
}

/// DELETE /articles/{id}
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Remaining articles", body = [ArticleResponse]),
        (status = 404, description = "Article not found"),
    ),
    tag = "catalog"
)]
pub async fn delete_article(
    state: SharedStorefront,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = ArticleId(path.into_inner());
    let articles = with_storefront(state, move |shop| {
        shop.catalog_mut().delete_article(id)?;
        let catalog = shop.catalog().catalog();
        Ok(catalog
            .articles()
            .iter()
            .map(|a| ArticleResponse::new(a, catalog))
            .collect::<Vec<_>>())
    })
    .await?;
    Ok(HttpResponse::Ok().json(articles))
}
