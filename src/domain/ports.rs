use super::errors::StoreError;

/// String-keyed durable storage. Last write wins per key; there are no
/// transactions across keys.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
