pub mod basket_service;
pub mod catalog_service;
pub mod order_log;
pub mod seed;
pub mod storage;
pub mod storefront;
