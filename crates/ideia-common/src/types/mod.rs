//! Core data types for the storefront

pub mod cart;
pub mod catalog;
pub mod order;
pub mod pricing;
