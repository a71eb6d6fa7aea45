use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStore;
use crate::schema::kv_store;

use super::models::{KvRow, NewKvRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Key-value storage in the `kv_store` table. `set` is an upsert, so the
/// last write to a key wins.
pub struct DieselKeyValueStore {
    pool: DbPool,
}

impl DieselKeyValueStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for DieselKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.pool.get()?;

        let row = kv_store::table
            .filter(kv_store::key.eq(key))
            .select(KvRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(|r| r.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(kv_store::table)
            .values(&NewKvRow { key, value })
            .on_conflict(kv_store::key)
            .do_update()
            .set((
                kv_store::value.eq(value),
                kv_store::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
