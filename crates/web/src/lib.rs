//! `shopfront-web`
//!
//! **Responsibility:** the product detail page of the storefront.
//!
//! This crate provides:
//! - Product service client (`GET /products/{id}`)
//! - A headless view state machine (loading / error / not found / loaded)
//! - RUM reporting of product views, add-to-cart clicks and fetch failures
//! - The Leptos component mounted in the browser (wasm32 only)
//! - A terminal preview binary (native only)

pub mod analytics;
pub mod client;
pub mod config;
pub mod render;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod preview;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use client::{FetchError, HttpProductClient, ProductClient};
pub use config::{ConfigError, StorefrontConfig};
pub use render::{ProductCard, Rendered};
pub use view::{FetchRequest, ProductDetailView, ViewState};
