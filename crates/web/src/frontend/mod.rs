//! Leptos frontend for the storefront product page.

pub mod app;
pub mod rum;

use leptos::*;
use wasm_bindgen::prelude::*;

use crate::config::StorefrontConfig;
use crate::render::ERROR_PREFIX;

/// WASM entry point for the frontend.
/// This is called automatically when the WASM module loads.
#[wasm_bindgen(start)]
pub fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();
    shopfront_observability::tracing::init_browser();

    match StorefrontConfig::from_build_env() {
        Ok(config) => {
            rum::init_sdk(&config.rum);
            mount_to_body(move || view! { <app::App config=config/> });
        }
        Err(e) => {
            tracing::error!("invalid storefront configuration: {}", e);
            let message = format!("{}{}", ERROR_PREFIX, e);
            mount_to_body(move || view! { <div>{message}</div> });
        }
    }
}
