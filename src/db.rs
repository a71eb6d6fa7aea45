use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the pool, failing if no connection can be made within
/// `connect_timeout`.
pub fn create_pool(database_url: &str, connect_timeout: Duration) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(connect_timeout)
        .build(manager)
}
