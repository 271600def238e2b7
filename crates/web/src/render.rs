//! What the product view shows, independent of the UI toolkit.

use shopfront_catalog::Product;

pub const LOADING_TEXT: &str = "Loading...";
pub const ERROR_PREFIX: &str = "Error loading product: ";
pub const NOT_FOUND_TEXT: &str = "Product not found";
pub const ADD_TO_CART_LABEL: &str = "Add to Cart";

/// Display fields of a loaded product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub image_url: String,
    pub image_alt: String,
    pub name: String,
    pub price_label: String,
    pub description: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            image_url: product.image_url.clone(),
            image_alt: product.name.clone(),
            name: product.name.clone(),
            price_label: product.price_label(),
            description: product.description.clone(),
        }
    }
}

/// One of the mutually exclusive render branches.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Loading,
    Error { message: String },
    NotFound,
    Product(ProductCard),
}

/// Plain-text rendering, one visible element per line.
impl core::fmt::Display for Rendered {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Rendered::Loading => f.write_str(LOADING_TEXT),
            Rendered::Error { message } => write!(f, "{ERROR_PREFIX}{message}"),
            Rendered::NotFound => f.write_str(NOT_FOUND_TEXT),
            Rendered::Product(card) => {
                writeln!(f, "[image: {} ({})]", card.image_url, card.image_alt)?;
                writeln!(f, "{}", card.name)?;
                writeln!(f, "{}", card.price_label)?;
                writeln!(f, "{}", card.description)?;
                write!(f, "[{ADD_TO_CART_LABEL}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_catalog::ProductId;

    fn product() -> Product {
        Product {
            id: ProductId::new("p-1").unwrap(),
            name: "Mug".to_string(),
            price: 7.0,
            description: "Holds 350ml of coffee".to_string(),
            image_url: "https://cdn.example.com/mug.png".to_string(),
            category: "kitchen".to_string(),
        }
    }

    #[test]
    fn card_carries_display_fields() {
        let card = ProductCard::from(&product());

        assert_eq!(
            card,
            ProductCard {
                image_url: "https://cdn.example.com/mug.png".to_string(),
                image_alt: "Mug".to_string(),
                name: "Mug".to_string(),
                price_label: "$7.00".to_string(),
                description: "Holds 350ml of coffee".to_string(),
            }
        );
    }

    #[test]
    fn simple_branches_as_text() {
        assert_eq!(Rendered::Loading.to_string(), "Loading...");
        assert_eq!(Rendered::NotFound.to_string(), "Product not found");
        assert_eq!(
            Rendered::Error {
                message: "Request failed with status code 500".to_string()
            }
            .to_string(),
            "Error loading product: Request failed with status code 500"
        );
    }

    #[test]
    fn product_as_text() {
        let text = Rendered::Product(ProductCard::from(&product())).to_string();

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "[image: https://cdn.example.com/mug.png (Mug)]",
                "Mug",
                "$7.00",
                "Holds 350ml of coffee",
                "[Add to Cart]",
            ]
        );
    }
}
