use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Product identifiers are opaque but never empty.
    #[error("invalid product id: {0}")]
    InvalidId(String),
}

/// Product identifier as issued by the product service.
///
/// The value is opaque: it is only ever echoed back to the service and to
/// analytics, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CatalogError::InvalidId("product id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductId {
    type Error = CatalogError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl core::str::FromStr for ProductId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Product read model (matches the product service response shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64, // Major currency unit (e.g., dollars)
    pub description: String,
    pub image_url: String,
    pub category: String,
}

impl Product {
    /// Display label for the unit price, e.g. `$12.50`.
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }

    /// Line total for `quantity` units of this product.
    pub fn total_for(&self, quantity: u32) -> f64 {
        self.price * f64::from(quantity)
    }
}

/// Format a price with a dollar sign and exactly two decimal places.
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}
