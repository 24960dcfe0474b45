pub mod admin_products;
pub mod auth;
pub mod contact;
pub mod products;
pub mod upload;
