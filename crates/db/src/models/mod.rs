pub mod customer;
pub mod vehicle;
pub mod work_order;
