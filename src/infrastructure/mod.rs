pub mod kv_repo;
pub mod memory_store;
pub mod models;
