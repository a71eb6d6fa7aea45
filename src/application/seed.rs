//! Default dataset written when a storage has no catalog yet.

use bigdecimal::BigDecimal;

use crate::domain::catalog::{Article, Category};
use crate::domain::ids::{ArticleId, CategoryId};

pub fn default_categories() -> Vec<Category> {
    [(1, "T-shirts"), (2, "Pantalons"), (3, "Robes")]
        .into_iter()
        .map(|(id, name)| Category {
            id: CategoryId(id),
            name: name.to_string(),
        })
        .collect()
}

#[rustfmt::skip]
pub fn default_articles() -> Vec<Article> {
    vec![
        article(1, "T-shirt basique blanc", 1999, 20, &["S", "M", "L", "XL"], 1,
            "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80"),
        article(2, "T-shirt noir adidas", 2499, 15, &["M", "L", "XL"], 1,
            "https://contents.mediadecathlon.com/p2632086/k$9491c0cbe040e01bb0764e4be9f85c03/sq/t-shirt-de-fitness-soft-training-adidas-homme-noir.jpg?format=auto&f=800x0"),
        article(3, "Jean slim noir", 4999, 10, &["S", "M", "L"], 2,
            "https://images.unsplash.com/photo-1542272604-787c3835535d?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80"),
        article(4, "Pantalon chino beige", 3999, 12, &["M", "L", "XL"], 2,
            "https://images.unsplash.com/photo-1594633312681-425c7b97ccd1?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80"),
        article(5, "Robe d'été fleurie", 5999, 8, &["S", "M", "L"], 3,
            "https://foivo.com/cdn/shop/files/Aubrey-Langedamesjurk.png?v=1767203444&width=823"),
        article(6, "Robe noire cocktail", 7999, 5, &["XS", "S", "M"], 3,
            "https://images.unsplash.com/photo-1539008835657-9e8e9680c956?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=80"),
    ]
}

fn article(
    id: i64,
    name: &str,
    cents: i64,
    stock: u32,
    sizes: &[&str],
    category_id: i64,
    image: &str,
) -> Article {
    Article {
        id: ArticleId(id),
        name: name.to_string(),
        price: BigDecimal::new(cents.into(), 2),
        stock,
        sizes: sizes.iter().map(|s| s.to_string()).collect(),
        category_id: CategoryId(category_id),
        image: image.to_string(),
    }
}
