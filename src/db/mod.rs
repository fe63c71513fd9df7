//! Persistence module split across logical submodules. Every function here
//! wraps one query so the store adapter can stay a thin dispatcher.

mod connection;
mod customers;
mod products;

pub use connection::{open_database, open_in_memory};
pub use customers::{
    count_customers, create_customer, delete_customer, fetch_customer, fetch_customers,
    update_customer,
};
pub use products::{
    count_products, create_product, delete_product, fetch_product, fetch_products, update_product,
};
