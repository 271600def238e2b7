//! RUM payloads reported by the product view.

use serde::Serialize;
use shopfront_catalog::{Product, ProductId};
use shopfront_observability::RumEvent;

pub const PRODUCT_VIEWED: &str = "product_viewed";
pub const ADD_TO_CART: &str = "add_to_cart";

/// Location tag attached to errors raised by the product view.
pub const LOCATION: &str = "ProductDetail";

/// Quantity added per "Add to Cart" click.
pub const CART_QUANTITY: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ProductViewed<'a> {
    pub product_id: &'a ProductId,
    pub product_name: &'a str,
    pub product_price: f64,
    pub category: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddToCart<'a> {
    pub product_id: &'a ProductId,
    pub product_name: &'a str,
    pub product_price: f64,
    pub quantity: u32,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct FetchFailed<'a> {
    pub product_id: &'a ProductId,
    pub location: &'static str,
}

pub fn product_viewed(product: &Product) -> RumEvent {
    RumEvent::action(
        PRODUCT_VIEWED,
        &ProductViewed {
            product_id: &product.id,
            product_name: &product.name,
            product_price: product.price,
            category: &product.category,
        },
    )
}

pub fn add_to_cart(product: &Product) -> RumEvent {
    RumEvent::action(
        ADD_TO_CART,
        &AddToCart {
            product_id: &product.id,
            product_name: &product.name,
            product_price: product.price,
            quantity: CART_QUANTITY,
            total: product.total_for(CART_QUANTITY),
        },
    )
}

pub fn fetch_failed(product_id: &ProductId, message: &str) -> RumEvent {
    RumEvent::error(
        message,
        &FetchFailed {
            product_id,
            location: LOCATION,
        },
    )
}
