//! Product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a product, unique within its store (not globally).
///
/// Assigned once by the store's monotonic counter when a product is first
/// saved and never reassigned or reused after deletion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a product ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A product in a store's catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Unique within the owning store.
    #[serde(default)]
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Short marketing description.
    #[serde(default)]
    pub description: String,
    /// Unit price, non-negative. Serialized as a JSON number.
    #[serde(default)]
    pub price: Decimal,
    /// Image URI, treated as opaque.
    #[serde(default)]
    pub image: String,
}

/// Payload for creating or editing a product through the admin editor.
///
/// An input without an `id` becomes a new product (the store assigns the next
/// id and appends it); an input whose `id` matches an existing product
/// replaces that product in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

impl ProductInput {
    /// A blank input pre-filled the way the admin "new product" form is.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            id: None,
            name: "Nuevo Producto".to_string(),
            description: "Descripción increíble...".to_string(),
            price: Decimal::ZERO,
            image: "https://via.placeholder.com/300x220.png?text=Imagen".to_string(),
        }
    }

    /// Materialize this input into a product under the given id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
        }
    }
}

impl From<Product> for ProductInput {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_is_transparent_in_json() {
        let id = ProductId::new(3);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "3");

        let back: ProductId = serde_json::from_str("3").expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_product_round_trips_price_as_number() {
        let json = r#"{"id":1,"name":"Tableta","description":"70%","price":15.0,"image":"x"}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.price, Decimal::new(150, 1));

        let out = serde_json::to_string(&product).expect("serialize");
        assert!(out.contains("15"), "price stays a JSON number: {out}");
    }

    #[test]
    fn test_product_missing_fields_take_defaults() {
        let product: Product = serde_json::from_str(r#"{"name":"Solo nombre"}"#).expect("lenient");
        assert_eq!(product.name, "Solo nombre");
        assert_eq!(product.id, ProductId::new(0));
        assert_eq!(product.price, Decimal::ZERO);
    }

    #[test]
    fn test_input_into_product_keeps_fields() {
        let input = ProductInput {
            id: None,
            name: "Chocotejas".to_string(),
            description: "De pecanas".to_string(),
            price: Decimal::new(250, 2),
            image: "img".to_string(),
        };
        let product = input.into_product(ProductId::new(7));
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.name, "Chocotejas");
        assert_eq!(product.price, Decimal::new(250, 2));
    }
}
