// BlackInkkk: storefront API and admin panel backend
//
// This is the library root. Each module corresponds to a subsystem of the
// shop: catalog logic, persistence, contact intake, and the web server.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod db;
pub mod output;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
