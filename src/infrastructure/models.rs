use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::kv_store;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = kv_store)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KvRow {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = kv_store)]
pub struct NewKvRow<'a> {
    pub key: &'a str,
    pub value: &'a str,
}
