//! The persistent store handle shared by the catalog, basket and order log.
//!
//! Backend failures never reach callers. Everything read or written is kept
//! in an in-process session copy; after the first backend failure the handle
//! switches to that copy for the rest of the session, so state keeps working
//! in memory but does not survive a restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStore;
use crate::infrastructure::memory_store::MemoryStore;

pub const CATEGORIES_KEY: &str = "categories";
pub const ARTICLES_KEY: &str = "articles";
pub const ORDERS_KEY: &str = "orders";

pub fn basket_key(user_id: &str) -> String {
    format!("basket_{}", user_id)
}

#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    session: Arc<MemoryStore>,
    degraded: Arc<AtomicBool>,
}

impl Storage {
    pub fn new(backend: impl KeyValueStore) -> Self {
        Self {
            backend: Arc::new(backend),
            session: Arc::new(MemoryStore::new()),
            degraded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// True once the backend has failed; from then on only the session copy
    /// is used.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if !self.is_degraded() {
            match self.backend.get(key) {
                Ok(value) => {
                    if let Some(v) = &value {
                        let _ = self.session.set(key, v);
                    }
                    return value;
                }
                Err(e) => self.degrade(key, &e),
            }
        }
        self.session.get(key).ok().flatten()
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.session.set(key, value) {
            log::warn!("Session copy of '{}' not updated: {}", key, e);
        }
        if self.is_degraded() {
            return;
        }
        if let Err(e) = self.backend.set(key, value) {
            self.degrade(key, &e);
        }
    }

    fn degrade(&self, key: &str, err: &StoreError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            log::warn!(
                "Storage failed on '{}' ({}); continuing in memory, changes will not survive a restart",
                key,
                err
            );
        }
    }

    /// `None` when the key is absent or its value does not decode.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load_json(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring undecodable value under '{}': {}", key, e);
                None
            }
        }
    }

    /// Like [`load_json`](Self::load_json) but tells "absent" apart from
    /// "present and corrupt".
    pub fn try_load_json<T: DeserializeOwned>(&self, key: &str) -> serde_json::Result<Option<T>> {
        self.get(key)
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => {
                log::debug!("Persisting '{}' ({} bytes)", key, json.len());
                self.set(key, &json);
            }
            Err(e) => log::warn!("Could not encode '{}', nothing written: {}", key, e),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FlakyStore;
    use super::*;

    #[test]
    fn json_round_trip() {
        let storage = Storage::in_memory();
        storage.save_json("numbers", &vec![1, 2, 3]);
        assert_eq!(storage.load_json::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
        assert_eq!(storage.load_json::<Vec<i32>>("missing"), None);
    }

    #[test]
    fn undecodable_values_read_as_absent() {
        let storage = Storage::in_memory();
        storage.set("numbers", "{not json");
        assert_eq!(storage.load_json::<Vec<i32>>("numbers"), None);
    }

    #[test]
    fn corrupt_values_are_distinguished_from_absent_ones() {
        let storage = Storage::in_memory();
        storage.set("numbers", "[1,");
        assert!(storage.try_load_json::<Vec<i32>>("numbers").is_err());
        assert!(matches!(storage.try_load_json::<Vec<i32>>("missing"), Ok(None)));
    }

    #[test]
    fn basket_keys_are_namespaced_per_user() {
        assert_eq!(basket_key("guest"), "basket_guest");
        assert_ne!(basket_key("alice"), basket_key("bob"));
    }

    #[test]
    fn outage_degrades_to_session_memory() {
        let backend = FlakyStore::default();
        let storage = Storage::new(backend.clone());
        backend.set_down(true);

        storage.set("orders", "[1]");
        assert!(storage.is_degraded());
        assert_eq!(storage.get("orders").as_deref(), Some("[1]"));
        assert!(backend.inner.is_empty());
    }

    #[test]
    fn values_read_before_an_outage_stay_available() {
        let backend = FlakyStore::default();
        backend.inner.set("categories", "[]").unwrap();
        let storage = Storage::new(backend.clone());
        assert_eq!(storage.get("categories").as_deref(), Some("[]"));

        backend.set_down(true);
        storage.set("articles", "[]");
        assert_eq!(storage.get("categories").as_deref(), Some("[]"));
        assert_eq!(storage.get("articles").as_deref(), Some("[]"));
    }

    #[test]
    fn degraded_mode_is_sticky_for_the_session() {
        let backend = FlakyStore::default();
        let storage = Storage::new(backend.clone());
        backend.set_down(true);
        assert_eq!(storage.get("k"), None);
        backend.set_down(false);
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        assert!(backend.inner.get("k").unwrap().is_none());
    }
}
