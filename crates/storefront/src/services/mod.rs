//! Business services: cart aggregation and authentication.

pub mod auth;
pub mod cart;
