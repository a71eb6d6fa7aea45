pub mod basket;
pub mod catalog;
pub mod errors;
pub mod ids;
pub mod money;
pub mod order;
pub mod ports;
