//! Store records and the store collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::product::{Product, ProductId, ProductInput};
use super::theme::Theme;

/// The whole multi-store collection, keyed by URL-safe store identifier.
///
/// This is the exact shape of the persisted JSON document.
pub type StoreCollection = BTreeMap<String, StoreRecord>;

/// Which page layout renders a store's public page.
///
/// A closed set: dispatch is an exhaustive match, and adding a variant means
/// adding an enum case plus its template - nothing else changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
}

impl TemplateId {
    /// The serialized tag for this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
        }
    }

    /// Parse a tag, falling back to `Classic` for anything unrecognized.
    ///
    /// Documents written before the template field existed (or by a newer
    /// version with variants this build does not know) still load.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "modern" => Self::Modern,
            _ => Self::Classic,
        }
    }
}

impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// The hero banner shown at the top of a store page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBanner {
    /// Background image URI, not validated.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// Payment and contact details for the order handoff.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Yape/Plin number shown to the customer.
    #[serde(default)]
    pub phone: String,
    /// Account holder name.
    #[serde(default)]
    pub name: String,
    /// WhatsApp number with country code, digits only (contract, not
    /// validated) - used verbatim in the wa.me deep link.
    #[serde(default)]
    pub whatsapp: String,
}

/// One independently configured shop within the shared collection.
///
/// Every field defaults so that documents from prior schema versions load;
/// the admin's store-creation flow backfills all of them for new records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    /// Display name, non-empty after creation.
    #[serde(default)]
    pub name: String,
    /// Selects the public-page renderer.
    #[serde(default)]
    pub template_id: TemplateId,
    /// Heading over the product listing.
    #[serde(default)]
    pub section_title: String,
    #[serde(default)]
    pub hero_banner: HeroBanner,
    /// Display and edit order.
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub payment_info: PaymentInfo,
    /// Open-ended color-slot map; the admin renders whatever keys exist.
    #[serde(default)]
    pub theme: Theme,
    /// System persona for the chat assistant, consumed verbatim.
    #[serde(default)]
    pub chat_instruction: String,
    /// High-water mark of the product id counter: the next id to hand out.
    /// Zero in documents written before the counter existed; backfilled by
    /// [`Self::init_product_counter`] on load.
    #[serde(default)]
    pub next_product_id: u64,
}

impl StoreRecord {
    /// Raise the id counter to at least one past the highest live id.
    ///
    /// Called on load for documents written before the counter existed, so
    /// that deleting the highest product can never free its id.
    pub fn init_product_counter(&mut self) {
        let floor = self
            .products
            .iter()
            .map(|p| p.id.as_u64())
            .max()
            .unwrap_or(0)
            + 1;
        if self.next_product_id < floor {
            self.next_product_id = floor;
        }
    }

    /// Hand out the next product id.
    ///
    /// Per-store monotonic counter; an id, once allocated, is never handed
    /// out again - not even after the product carrying it is deleted.
    pub fn allocate_product_id(&mut self) -> ProductId {
        self.init_product_counter();
        let id = ProductId::new(self.next_product_id);
        self.next_product_id += 1;
        id
    }

    /// Insert or replace a product.
    ///
    /// An input carrying the id of an existing product replaces it at its
    /// current position; anything else gets a fresh id and is appended.
    /// Returns the id the product ended up with.
    pub fn upsert_product(&mut self, input: ProductInput) -> ProductId {
        if let Some(id) = input.id
            && let Some(existing) = self.products.iter_mut().find(|p| p.id == id)
        {
            *existing = input.into_product(id);
            return id;
        }
        let id = self.allocate_product_id();
        self.products.push(input.into_product(id));
        id
    }

    /// Remove a product by id. Absent ids are a no-op, not an error.
    pub fn delete_product(&mut self, id: ProductId) {
        self.products.retain(|p| p.id != id);
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}
