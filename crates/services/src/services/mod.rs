pub mod config;
pub mod fallback;
pub mod work_order_cache;
pub mod work_order_service;
pub mod work_order_store;
