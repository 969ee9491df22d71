//! Product domain types.

use serde::{Deserialize, Serialize};

use myshop_core::{Price, ProductId, UserId};

/// A product listed in the catalog.
///
/// Field names follow the persisted `sellersProducts` records, so the
/// seller reference serializes as `sellerId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog-unique product ID.
    pub id: ProductId,
    /// Display name (HTML-escaped for seller submissions).
    pub name: String,
    /// Unit price in dollars.
    pub price: Price,
    /// Image URLs, first one is the card thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// The user who listed the product.
    pub seller_id: UserId,
}

impl Product {
    /// The thumbnail shown on catalog cards.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the name contains `needle`, which must already be lowercase.
    #[must_use]
    pub(crate) fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// A seller's product submission before validation and id assignment.
///
/// Mirrors the "add product" form: the price is whatever number the form
/// produced, and image URLs arrive as one block of newline-separated text.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    /// Product name as typed.
    pub name: String,
    /// Price as parsed from the form.
    pub price: f64,
    /// Newline-separated image URLs.
    pub images: String,
    /// Description as typed.
    pub description: String,
}

impl NewProduct {
    /// Image URLs, one per non-blank line, trimmed.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// The built-in catalog shipped with the storefront.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Laptop 1".to_owned(),
            price: Price::from_dollars(999),
            images: vec![
                "./images/laptop1.jpg".to_owned(),
                "images/laptop2.jpg".to_owned(),
                "images/laptop3.jpg".to_owned(),
            ],
            description: "High-performance laptop with 16GB RAM".to_owned(),
            seller_id: UserId::new(1),
        },
        Product {
            id: ProductId::new(2),
            name: "Phone 1".to_owned(),
            price: Price::from_dollars(699),
            images: vec![
                "./images/phone1.jpg".to_owned(),
                "images/phone2.jpg".to_owned(),
            ],
            description: "Latest smartphone with 128GB storage".to_owned(),
            seller_id: UserId::new(1),
        },
    ]
}
