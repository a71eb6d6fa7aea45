use crate::domain::errors::DomainError;
use crate::domain::order::Order;

use super::storage::{Storage, ORDERS_KEY};

/// Append-only order history under the `orders` key.
#[derive(Debug, Clone)]
pub struct OrderLog {
    storage: Storage,
}

impl OrderLog {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Persisted orders, oldest first. An unreadable log lists as empty.
    pub fn list(&self) -> Vec<Order> {
        self.storage.load_json(ORDERS_KEY).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the log, appends `order` and writes the whole log back. Order
    /// ids are not deduplicated.
    ///
    /// A log that exists but does not decode is left alone rather than
    /// overwritten.
    pub fn append(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders: Vec<Order> = self
            .storage
            .try_load_json(ORDERS_KEY)
            .map_err(|e| DomainError::Internal(format!("order log is unreadable: {}", e)))?
            .unwrap_or_default();
        orders.push(order.clone());
        self.storage.save_json(ORDERS_KEY, &orders);
        log::info!(
            "Order {} recorded for '{}' ({} in log)",
            order.order_id(),
            order.user_id(),
            orders.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::seed;
    use crate::domain::basket::Basket;

    fn order(id: &str) -> Order {
        let mut basket = Basket::new("guest");
        basket.add_item(&seed::default_articles()[2], "M");
        Order::from_basket(&basket, Some(id.to_string()))
    }

    #[test]
    fn append_grows_log_by_one() {
        let storage = Storage::in_memory();
        let log = OrderLog::new(storage.clone());
        assert!(log.is_empty());

        log.append(&order("1")).unwrap();
        log.append(&order("2")).unwrap();

        let orders = OrderLog::new(storage).list();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id(), "1");
        assert_eq!(orders[1].order_id(), "2");
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let log = OrderLog::new(Storage::in_memory());
        log.append(&order("7")).unwrap();
        log.append(&order("7")).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn corrupt_log_is_not_overwritten() {
        let storage = Storage::in_memory();
        storage.set(ORDERS_KEY, "[{broken");
        let log = OrderLog::new(storage.clone());

        assert!(matches!(log.append(&order("1")), Err(DomainError::Internal(_))));
        assert_eq!(storage.get(ORDERS_KEY).as_deref(), Some("[{broken"));
        assert!(log.list().is_empty());
    }

    #[test]
    fn round_trip_preserves_orders() {
        let storage = Storage::in_memory();
        let log = OrderLog::new(storage.clone());
        let placed = order("42");
        log.append(&placed).unwrap();
        assert_eq!(OrderLog::new(storage).list(), vec![placed]);
    }
}
