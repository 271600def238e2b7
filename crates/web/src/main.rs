//! Command-line preview of the product page.
//!
//! Usage: `shopfront-preview <product-id> [--add-to-cart]`

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use shopfront_catalog::ProductId;
    use shopfront_web::{StorefrontConfig, preview};

    shopfront_observability::init();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid storefront configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut product_id = None;
    let mut add_to_cart = false;
    for arg in std::env::args().skip(1) {
        if arg == "--add-to-cart" {
            add_to_cart = true;
        } else {
            // An empty id is treated as no id, like an unmatched route.
            product_id = ProductId::new(arg).ok();
        }
    }

    let rum = shopfront_observability::rum_sink(&config.rum);
    let outcome = preview::run(&config, rum, product_id, add_to_cart).await;

    println!("{}", outcome.page);
    if outcome.added_to_cart {
        println!("Added to cart");
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    eprintln!("The preview binary runs natively; the browser loads the library.");
}
