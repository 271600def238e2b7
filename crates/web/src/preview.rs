//! Terminal preview of the product page.

use std::sync::Arc;

use shopfront_catalog::ProductId;
use shopfront_observability::RumSink;

use crate::client::HttpProductClient;
use crate::config::StorefrontConfig;
use crate::view::ProductDetailView;

/// What one preview run showed.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub page: String,
    pub added_to_cart: bool,
}

/// Load `product_id` the way the browser page would, optionally click
/// "Add to Cart", and wait for RUM delivery before returning.
pub async fn run(
    config: &StorefrontConfig,
    rum: Arc<dyn RumSink>,
    product_id: Option<ProductId>,
    add_to_cart: bool,
) -> Preview {
    let client = HttpProductClient::from_config(config);
    let mut view = ProductDetailView::new(Arc::clone(&rum));

    view.load(&client, product_id).await;
    let page = view.render().to_string();
    let added_to_cart = add_to_cart && view.add_to_cart();

    rum.flush().await;

    Preview {
        page,
        added_to_cart,
    }
}
