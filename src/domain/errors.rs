use thiserror::Error;

use super::ids::CategoryId;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,
    #[error("Category {id} is used by {articles} article(s)")]
    CategoryInUse { id: CategoryId, articles: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Basket is empty")]
    EmptyBasket,
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by a [`KeyValueStore`](super::ports::KeyValueStore) backend.
///
/// These never reach domain callers: [`Storage`](crate::application::storage::Storage)
/// logs them and keeps the session running in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}
