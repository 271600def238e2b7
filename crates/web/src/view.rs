//! Product detail view state.
//!
//! The view is a small state machine driven from the outside:
//!
//! - `navigate` is called whenever the routed product id may have changed and
//!   hands back the fetch to perform, if any
//! - `resolve` applies the outcome of that fetch
//! - `add_to_cart` handles the button
//! - `render` projects the current state
//!
//! The view performs no IO itself, so the same type backs the browser
//! component and native callers. Every fetch carries a generation number;
//! outcomes of fetches issued before the latest `navigate` are ignored. The
//! superseded HTTP request is not cancelled.

use std::sync::Arc;

use shopfront_catalog::{Product, ProductId};
use shopfront_observability::RumSink;

use crate::analytics;
use crate::client::{FetchError, ProductClient};
use crate::render::{ProductCard, Rendered};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// A fetch is outstanding (also the state before the first navigation).
    Loading,
    /// The last fetch failed; holds the user-facing message.
    Failed(String),
    /// No product id, or the service returned an empty body.
    NotFound,
    Loaded(Product),
}

/// A fetch the caller must perform and feed back through
/// [`ProductDetailView::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    product_id: ProductId,
    generation: u64,
}

impl FetchRequest {
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct ProductDetailView {
    product_id: Option<ProductId>,
    navigated: bool,
    generation: u64,
    state: ViewState,
    rum: Arc<dyn RumSink>,
}

impl core::fmt::Debug for ProductDetailView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductDetailView")
            .field("product_id", &self.product_id)
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ProductDetailView {
    pub fn new(rum: Arc<dyn RumSink>) -> Self {
        Self {
            product_id: None,
            navigated: false,
            generation: 0,
            state: ViewState::Loading,
            rum,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn product(&self) -> Option<&Product> {
        match &self.state {
            ViewState::Loaded(product) => Some(product),
            _ => None,
        }
    }

    /// Point the view at `product_id`.
    ///
    /// Returns the fetch to perform, or `None` when the id is unchanged or
    /// absent. Any previous record or error is cleared.
    pub fn navigate(&mut self, product_id: Option<ProductId>) -> Option<FetchRequest> {
        if self.navigated && self.product_id == product_id {
            return None;
        }

        self.navigated = true;
        self.generation += 1;
        self.product_id = product_id.clone();

        match product_id {
            Some(product_id) => {
                tracing::info!("Loading product {} (request #{})", product_id, self.generation);
                self.state = ViewState::Loading;
                Some(FetchRequest {
                    product_id,
                    generation: self.generation,
                })
            }
            None => {
                tracing::info!("No product id; nothing to load");
                self.state = ViewState::NotFound;
                None
            }
        }
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` (and changes nothing) if the request has been
    /// superseded by a later navigation.
    pub fn resolve(
        &mut self,
        request: FetchRequest,
        result: Result<Option<Product>, FetchError>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                "Discarding stale response for product {} (request #{}, current #{})",
                request.product_id,
                request.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(Some(product)) => {
                tracing::info!("Loaded product {}", product.id);
                self.rum.emit(analytics::product_viewed(&product));
                ViewState::Loaded(product)
            }
            Ok(None) => {
                tracing::warn!("Product service returned no body for {}", request.product_id);
                ViewState::NotFound
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("Failed to load product {}: {}", request.product_id, message);
                self.rum
                    .emit(analytics::fetch_failed(&request.product_id, &message));
                ViewState::Failed(message)
            }
        };
        true
    }

    /// Handle the "Add to Cart" button.
    ///
    /// Only reports the action; there is no cart. Returns whether an event was
    /// emitted (nothing happens until a product is loaded).
    pub fn add_to_cart(&self) -> bool {
        match self.product() {
            Some(product) => {
                self.rum.emit(analytics::add_to_cart(product));
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> Rendered {
        match &self.state {
            ViewState::Loading => Rendered::Loading,
            ViewState::Failed(message) => Rendered::Error {
                message: message.clone(),
            },
            ViewState::NotFound => Rendered::NotFound,
            ViewState::Loaded(product) => Rendered::Product(ProductCard::from(product)),
        }
    }

    /// Navigate, fetch and resolve in one go.
    ///
    /// Returns whether a fetch outcome was applied.
    pub async fn load<C: ProductClient>(
        &mut self,
        client: &C,
        product_id: Option<ProductId>,
    ) -> bool {
        let Some(request) = self.navigate(product_id) else {
            return false;
        };
        let result = client.fetch_product(request.product_id()).await;
        self.resolve(request, result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use shopfront_observability::InMemoryRumSink;

    use super::*;
    use crate::analytics::{ADD_TO_CART, LOCATION, PRODUCT_VIEWED};

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn product(raw_id: &str, price: f64) -> Product {
        Product {
            id: id(raw_id),
            name: format!("Product {raw_id}"),
            price,
            description: "A fine thing".to_string(),
            image_url: format!("https://cdn.example.com/{raw_id}.png"),
            category: "things".to_string(),
        }
    }

    fn view() -> (ProductDetailView, Arc<InMemoryRumSink>) {
        let sink = Arc::new(InMemoryRumSink::new());
        (ProductDetailView::new(sink.clone()), sink)
    }

    #[derive(Default)]
    struct StubClient {
        responses: HashMap<String, Result<Option<Product>, FetchError>>,
        calls: RefCell<Vec<ProductId>>,
    }

    impl StubClient {
        fn with(mut self, raw_id: &str, response: Result<Option<Product>, FetchError>) -> Self {
            self.responses.insert(raw_id.to_string(), response);
            self
        }

        fn calls(&self) -> Vec<ProductId> {
            self.calls.borrow().clone()
        }
    }

    impl ProductClient for StubClient {
        async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, FetchError> {
            self.calls.borrow_mut().push(id.clone());
            self.responses
                .get(id.as_str())
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }

    #[test]
    fn starts_loading() {
        let (view, sink) = view();
        assert_eq!(view.state(), &ViewState::Loading);
        assert_eq!(view.render(), Rendered::Loading);
        assert!(sink.is_empty());
    }

    #[test]
    fn render_branch_follows_latest_transition() {
        let (mut view, _sink) = view();

        // loading wins over an earlier error
        let request = view.navigate(Some(id("p-1"))).unwrap();
        view.resolve(request, Err(FetchError::Status(503)));
        assert!(matches!(view.render(), Rendered::Error { .. }));
        let request = view.navigate(Some(id("p-2"))).unwrap();
        assert_eq!(view.render(), Rendered::Loading);

        // error, then not found, then loaded
        view.resolve(request, Err(FetchError::Status(500)));
        assert_eq!(
            view.render(),
            Rendered::Error {
                message: "Request failed with status code 500".to_string()
            }
        );
        assert!(view.navigate(None).is_none());
        assert_eq!(view.render(), Rendered::NotFound);
        let request = view.navigate(Some(id("p-3"))).unwrap();
        view.resolve(request, Ok(Some(product("p-3", 5.0))));
        assert_eq!(
            view.render(),
            Rendered::Product(ProductCard::from(&product("p-3", 5.0)))
        );

        // loading wins over an earlier product
        view.navigate(Some(id("p-4")));
        assert_eq!(view.render(), Rendered::Loading);
        assert!(view.product().is_none());
    }

    #[test]
    fn outstanding_fetch_shows_only_loading() {
        let (mut view, sink) = view();

        let request = view.navigate(Some(id("p-1"))).unwrap();

        assert_eq!(request.product_id(), &id("p-1"));
        assert_eq!(view.render(), Rendered::Loading);
        assert!(view.product().is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn success_shows_product_and_reports_one_view() {
        let (mut view, sink) = view();
        let request = view.navigate(Some(id("p-1"))).unwrap();

        assert!(view.resolve(request, Ok(Some(product("p-1", 12.5)))));

        let Rendered::Product(card) = view.render() else {
            panic!("expected product branch");
        };
        assert_eq!(card.name, "Product p-1");
        assert_eq!(card.price_label, "$12.50");
        assert_eq!(card.description, "A fine thing");
        assert_eq!(card.image_url, "https://cdn.example.com/p-1.png");

        // re-rendering must not report again
        view.render();
        view.render();

        let viewed = sink.actions(PRODUCT_VIEWED);
        assert_eq!(viewed.len(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(viewed[0]["product_id"], "p-1");
        assert_eq!(viewed[0]["product_name"], "Product p-1");
        assert_eq!(viewed[0]["product_price"], 12.5);
        assert_eq!(viewed[0]["category"], "things");
    }

    #[test]
    fn failure_shows_message_and_reports_one_error() {
        let (mut view, sink) = view();
        let request = view.navigate(Some(id("p-404"))).unwrap();

        view.resolve(request, Err(FetchError::Status(404)));

        assert_eq!(
            view.render(),
            Rendered::Error {
                message: "Request failed with status code 404".to_string()
            }
        );
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "Request failed with status code 404");
        assert_eq!(errors[0].1["product_id"], "p-404");
        assert_eq!(errors[0].1["location"], LOCATION);
        assert!(sink.actions(PRODUCT_VIEWED).is_empty());
    }

    #[test]
    fn empty_body_is_not_found_without_events() {
        let (mut view, sink) = view();
        let request = view.navigate(Some(id("p-1"))).unwrap();

        view.resolve(request, Ok(None));

        assert_eq!(view.render(), Rendered::NotFound);
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_id_is_not_found_without_fetch() {
        let (mut view, sink) = view();

        assert!(view.navigate(None).is_none());
        assert_eq!(view.render(), Rendered::NotFound);
        assert!(view.navigate(None).is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn same_id_does_not_refetch() {
        let (mut view, _sink) = view();
        let request = view.navigate(Some(id("p-1"))).unwrap();
        view.resolve(request, Ok(Some(product("p-1", 1.0))));

        assert!(view.navigate(Some(id("p-1"))).is_none());
        assert!(view.product().is_some());
    }

    #[test]
    fn id_change_issues_one_new_fetch_and_clears_state() {
        let (mut view, _sink) = view();
        let first = view.navigate(Some(id("p-1"))).unwrap();
        view.resolve(first, Err(FetchError::Network("offline".to_string())));

        let second = view.navigate(Some(id("p-2"))).unwrap();

        assert_eq!(second.product_id(), &id("p-2"));
        assert_eq!(view.render(), Rendered::Loading);
        assert!(view.navigate(Some(id("p-2"))).is_none());
    }

    #[test]
    fn stale_response_is_ignored() {
        let (mut view, sink) = view();
        let stale = view.navigate(Some(id("p-1"))).unwrap();
        let current = view.navigate(Some(id("p-2"))).unwrap();

        assert!(!view.resolve(stale.clone(), Ok(Some(product("p-1", 1.0)))));
        assert_eq!(view.render(), Rendered::Loading);

        assert!(view.resolve(current, Ok(Some(product("p-2", 2.0)))));
        assert!(!view.resolve(stale, Err(FetchError::Status(500))));

        assert_eq!(view.product().map(|p| p.id.as_str()), Some("p-2"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.actions(PRODUCT_VIEWED)[0]["product_id"], "p-2");
    }

    #[test]
    fn add_to_cart_before_load_emits_nothing() {
        let (mut view, sink) = view();
        assert!(!view.add_to_cart());

        view.navigate(Some(id("p-1")));
        assert!(!view.add_to_cart());
        assert!(sink.is_empty());
    }

    #[test]
    fn add_to_cart_after_failure_emits_nothing() {
        let (mut view, sink) = view();
        let request = view.navigate(Some(id("p-1"))).unwrap();
        view.resolve(request, Err(FetchError::Status(500)));

        assert!(!view.add_to_cart());
        assert!(sink.actions(ADD_TO_CART).is_empty());
    }

    #[test]
    fn add_to_cart_reports_single_unit() {
        let (mut view, sink) = view();
        let request = view.navigate(Some(id("p-9"))).unwrap();
        view.resolve(request, Ok(Some(product("p-9", 19.99))));

        assert!(view.add_to_cart());

        let added = sink.actions(ADD_TO_CART);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0]["product_id"], "p-9");
        assert_eq!(added[0]["product_name"], "Product p-9");
        assert_eq!(added[0]["product_price"], 19.99);
        assert_eq!(added[0]["quantity"], 1);
        assert_eq!(added[0]["total"], 19.99);
    }

    #[tokio::test]
    async fn load_fetches_once_per_id() {
        let (mut view, sink) = view();
        let client = StubClient::default()
            .with("p-1", Ok(Some(product("p-1", 3.0))))
            .with("p-2", Ok(Some(product("p-2", 4.0))));

        assert!(view.load(&client, Some(id("p-1"))).await);
        assert!(!view.load(&client, Some(id("p-1"))).await);
        assert_eq!(client.calls(), vec![id("p-1")]);

        assert!(view.load(&client, Some(id("p-2"))).await);
        assert_eq!(client.calls(), vec![id("p-1"), id("p-2")]);
        assert_eq!(view.product().map(|p| p.price), Some(4.0));
        assert_eq!(sink.actions(PRODUCT_VIEWED).len(), 2);
    }

    #[tokio::test]
    async fn load_failure_reports_attempted_id() {
        let (mut view, sink) = view();
        let client = StubClient::default();

        assert!(view.load(&client, Some(id("ghost"))).await);

        assert!(matches!(view.state(), ViewState::Failed(_)));
        assert_eq!(sink.errors()[0].1["product_id"], "ghost");
    }
}
