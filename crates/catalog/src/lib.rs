//! Catalog read models.
//!
//! This crate describes products exactly as the product service returns them
//! (no IO, no HTTP, no storage).

pub mod product;

pub use product::{CatalogError, Product, ProductId, format_price};
