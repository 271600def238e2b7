//! Leptos application with routing.

use std::rc::Rc;
use std::sync::Arc;

use leptos::*;
use leptos_router::*;
use shopfront_catalog::ProductId;
use shopfront_observability::RumSink;

use crate::client::{HttpProductClient, ProductClient};
use crate::config::StorefrontConfig;
use crate::frontend::rum::BrowserRumSink;
use crate::render::{ADD_TO_CART_LABEL, ERROR_PREFIX, LOADING_TEXT, NOT_FOUND_TEXT, Rendered};
use crate::view::ProductDetailView;

/// Main application component.
#[component]
pub fn App(config: StorefrontConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <Router>
            <Routes>
                <Route path="/products/:id" view=ProductDetailPage/>
            </Routes>
        </Router>
    }
}

/// Product detail page component.
#[component]
fn ProductDetailPage() -> impl IntoView {
    let Some(config) = use_context::<StorefrontConfig>() else {
        return view! { <div>{ERROR_PREFIX}"storefront is not configured"</div> }.into_view();
    };
    let client = Rc::new(HttpProductClient::from_config(&config));

    let params = use_params_map();
    let product_id = create_memo(move |_| {
        params.with(|p| p.get("id").and_then(|id| ProductId::new(id.clone()).ok()))
    });

    let rum: Arc<dyn RumSink> = Arc::new(BrowserRumSink);
    let detail = create_rw_signal(ProductDetailView::new(rum));

    // Re-runs only when the routed id changes.
    create_effect(move |_| {
        let id = product_id.get();
        let request = detail.try_update(|view| view.navigate(id)).flatten();

        if let Some(request) = request {
            let client = Rc::clone(&client);
            spawn_local(async move {
                let result = client.fetch_product(request.product_id()).await;
                // The page may be gone by the time the fetch completes.
                detail.try_update(|view| view.resolve(request, result));
            });
        }
    });

    let add_to_cart = move |_| {
        detail.with_untracked(|view| {
            view.add_to_cart();
        });
    };

    view! {
        {move || match detail.with(|view| view.render()) {
            Rendered::Loading => view! { <div>{LOADING_TEXT}</div> }.into_view(),
            Rendered::Error { message } => {
                view! { <div>{ERROR_PREFIX}{message}</div> }.into_view()
            }
            Rendered::NotFound => view! { <div>{NOT_FOUND_TEXT}</div> }.into_view(),
            Rendered::Product(card) => view! {
                <div class="product-detail">
                    <img src=card.image_url alt=card.image_alt/>
                    <h1>{card.name}</h1>
                    <p class="price">{card.price_label}</p>
                    <p class="description">{card.description}</p>
                    <button on:click=add_to_cart>{ADD_TO_CART_LABEL}</button>
                </div>
            }
            .into_view(),
        }}
    }
    .into_view()
}
