//! Tagged-path mutation over the store configuration tree.
//!
//! The admin editor addresses any editable leaf with a [`FieldPath`]: a
//! sequence of keys and indexes whose first step is the store identifier
//! (e.g. `sachacacao.heroBanner.title`, `sachacacao.products.0.price`).
//! [`apply`] interprets the path against the typed configuration tree with an
//! exhaustive match per step - there is no untyped JSON walking - and builds
//! a complete new collection, leaving the caller's snapshot untouched.
//!
//! Every intermediate step must resolve to an existing container. The only
//! place a *final* key may be new is the open-ended theme map, which is how
//! the admin adds a color slot dynamically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{StoreCollection, TemplateId};

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Array position (products only).
    Index(usize),
    /// Map key or struct field name.
    Key(String),
}

impl PathStep {
    /// Key constructor, for building paths in code.
    #[must_use]
    pub fn key(name: &str) -> Self {
        Self::Key(name.to_string())
    }
}

impl std::fmt::Display for PathStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A full path from the collection root to an editable leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathStep>);

impl FieldPath {
    /// Build a path from explicit steps.
    #[must_use]
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// Parse the dot-notation form used by the admin forms.
    ///
    /// Segments that parse as an unsigned integer become indexes:
    /// `sachacacao.products.0.price` is `[Key, Key, Index, Key]`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] when the string has no segments.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        let steps = path
            .split('.')
            .map(|segment| {
                segment.parse::<usize>().map_or_else(
                    |_| PathStep::Key(segment.to_string()),
                    PathStep::Index,
                )
            })
            .collect();
        Ok(Self(steps))
    }

    /// The steps of this path.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for step in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{step}")?;
            first = false;
        }
        Ok(())
    }
}

/// Why a field path could not be applied.
///
/// Every variant leaves the target collection unchanged; path errors are
/// validation errors reported inline, never partial writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path had no steps at all.
    #[error("empty field path")]
    EmptyPath,

    /// First step did not name a store in the collection.
    #[error("unknown store: {0}")]
    UnknownStore(String),

    /// A step named a field the tree does not have at that point.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A numeric step where a key was needed, or vice versa.
    #[error("expected a {expected} at '{step}'")]
    WrongStepKind {
        step: String,
        expected: &'static str,
    },

    /// Product index past the end of the list.
    #[error("product index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Path stopped on a container instead of a leaf.
    #[error("path ends on a container at '{0}'; address a leaf field")]
    IncompletePath(String),

    /// Path continued past a leaf.
    #[error("'{0}' is not a container")]
    NotAContainer(String),

    /// Product identity is assigned once and never rewritten.
    #[error("field '{0}' cannot be edited")]
    ImmutableField(String),

    /// Value did not match the leaf's type.
    #[error("invalid value for '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        expected: &'static str,
    },
}

/// Apply `value` at `path`, producing a new collection.
///
/// The input collection is never modified; on success the returned collection
/// differs from it at exactly the addressed leaf.
///
/// # Errors
///
/// Returns a [`PathError`] when any step fails to resolve or the value does
/// not fit the leaf's type.
pub fn apply(
    collection: &StoreCollection,
    path: &FieldPath,
    value: &Value,
) -> Result<StoreCollection, PathError> {
    let mut next = collection.clone();
    apply_in_place(&mut next, path, value)?;
    Ok(next)
}

fn apply_in_place(
    collection: &mut StoreCollection,
    path: &FieldPath,
    value: &Value,
) -> Result<(), PathError> {
    let (store_step, rest) = path.steps().split_first().ok_or(PathError::EmptyPath)?;
    let store_id = expect_key(store_step)?;
    let record = collection
        .get_mut(store_id)
        .ok_or_else(|| PathError::UnknownStore(store_id.to_string()))?;

    let (field_step, rest) = rest
        .split_first()
        .ok_or_else(|| PathError::IncompletePath(store_id.to_string()))?;
    let field = expect_key(field_step)?;

    match field {
        "name" => set_string(&mut record.name, field, rest, value),
        "sectionTitle" => set_string(&mut record.section_title, field, rest, value),
        "chatInstruction" => set_string(&mut record.chat_instruction, field, rest, value),
        "templateId" => {
            expect_leaf(field, rest)?;
            record.template_id = expect_template(value)?;
            Ok(())
        }
        "heroBanner" => {
            let (leaf_step, rest) = rest
                .split_first()
                .ok_or_else(|| PathError::IncompletePath(field.to_string()))?;
            match expect_key(leaf_step)? {
                "imageUrl" => set_string(&mut record.hero_banner.image_url, "imageUrl", rest, value),
                "title" => set_string(&mut record.hero_banner.title, "title", rest, value),
                "subtitle" => set_string(&mut record.hero_banner.subtitle, "subtitle", rest, value),
                other => Err(PathError::UnknownField(format!("heroBanner.{other}"))),
            }
        }
        "paymentInfo" => {
            let (leaf_step, rest) = rest
                .split_first()
                .ok_or_else(|| PathError::IncompletePath(field.to_string()))?;
            match expect_key(leaf_step)? {
                "phone" => set_string(&mut record.payment_info.phone, "phone", rest, value),
                "name" => set_string(&mut record.payment_info.name, "name", rest, value),
                "whatsapp" => set_string(&mut record.payment_info.whatsapp, "whatsapp", rest, value),
                other => Err(PathError::UnknownField(format!("paymentInfo.{other}"))),
            }
        }
        "theme" => {
            // The one open-ended container: the final key may be new.
            let (slot_step, rest) = rest
                .split_first()
                .ok_or_else(|| PathError::IncompletePath(field.to_string()))?;
            let slot = expect_key(slot_step)?;
            expect_leaf(slot, rest)?;
            let color = expect_string(value, slot)?;
            record.theme.insert(slot.to_string(), color);
            Ok(())
        }
        "products" => {
            let (index_step, rest) = rest
                .split_first()
                .ok_or_else(|| PathError::IncompletePath(field.to_string()))?;
            let PathStep::Index(index) = index_step else {
                return Err(PathError::WrongStepKind {
                    step: index_step.to_string(),
                    expected: "product index",
                });
            };
            let len = record.products.len();
            let product = record
                .products
                .get_mut(*index)
                .ok_or(PathError::IndexOutOfBounds { index: *index, len })?;

            let (leaf_step, rest) = rest
                .split_first()
                .ok_or_else(|| PathError::IncompletePath(format!("products.{index}")))?;
            match expect_key(leaf_step)? {
                "name" => set_string(&mut product.name, "name", rest, value),
                "description" => set_string(&mut product.description, "description", rest, value),
                "image" => set_string(&mut product.image, "image", rest, value),
                "price" => {
                    expect_leaf("price", rest)?;
                    product.price = expect_price(value)?;
                    Ok(())
                }
                "id" => Err(PathError::ImmutableField(format!("products.{index}.id"))),
                other => Err(PathError::UnknownField(format!("products.{index}.{other}"))),
            }
        }
        other => Err(PathError::UnknownField(other.to_string())),
    }
}

fn expect_key(step: &PathStep) -> Result<&str, PathError> {
    match step {
        PathStep::Key(k) => Ok(k),
        PathStep::Index(i) => Err(PathError::WrongStepKind {
            step: i.to_string(),
            expected: "field name",
        }),
    }
}

fn expect_leaf(field: &str, rest: &[PathStep]) -> Result<(), PathError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(PathError::NotAContainer(field.to_string()))
    }
}

fn set_string(
    slot: &mut String,
    field: &str,
    rest: &[PathStep],
    value: &Value,
) -> Result<(), PathError> {
    expect_leaf(field, rest)?;
    *slot = expect_string(value, field)?;
    Ok(())
}

fn expect_string(value: &Value, field: &str) -> Result<String, PathError> {
    value
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| PathError::InvalidValue {
            field: field.to_string(),
            expected: "a string",
        })
}

fn expect_template(value: &Value) -> Result<TemplateId, PathError> {
    let tag = expect_string(value, "templateId")?;
    match tag.as_str() {
        "classic" => Ok(TemplateId::Classic),
        "modern" => Ok(TemplateId::Modern),
        _ => Err(PathError::InvalidValue {
            field: "templateId".to_string(),
            expected: "a known template tag",
        }),
    }
}

/// Prices arrive either as JSON numbers (API callers) or numeric strings
/// (HTML form values); both are accepted, negatives are not.
fn expect_price(value: &Value) -> Result<Decimal, PathError> {
    let invalid = || PathError::InvalidValue {
        field: "price".to_string(),
        expected: "a non-negative number",
    };

    let price = match value {
        Value::String(s) => s.trim().parse::<Decimal>().map_err(|_| invalid())?,
        other => serde_json::from_value::<Decimal>(other.clone()).map_err(|_| invalid())?,
    };
    if price.is_sign_negative() {
        return Err(invalid());
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::types::{Product, ProductId, StoreRecord};

    use super::*;

    fn collection() -> StoreCollection {
        let mut record = StoreRecord {
            name: "Sacha Cacao".to_string(),
            section_title: "Chocolates".to_string(),
            ..StoreRecord::default()
        };
        record.hero_banner.title = "El Sabor".to_string();
        record.theme.insert("primary".to_string(), "#5D4037".to_string());
        record.products.push(Product {
            id: ProductId::new(1),
            name: "Tableta".to_string(),
            description: "70%".to_string(),
            price: Decimal::new(1500, 2),
            image: "img".to_string(),
        });

        let mut collection = StoreCollection::new();
        collection.insert("sachacacao".to_string(), record);
        collection.insert("cafedelvalle".to_string(), StoreRecord::default());
        collection
    }

    #[test]
    fn test_parse_dot_notation() {
        let path = FieldPath::parse("sachacacao.products.0.price").expect("parse");
        assert_eq!(
            path.steps(),
            [
                PathStep::key("sachacacao"),
                PathStep::key("products"),
                PathStep::Index(0),
                PathStep::key("price"),
            ]
        );
        assert_eq!(path.to_string(), "sachacacao.products.0.price");
    }

    #[test]
    fn test_parse_empty_path_is_an_error() {
        assert_eq!(FieldPath::parse(""), Err(PathError::EmptyPath));
        assert_eq!(FieldPath::parse("  "), Err(PathError::EmptyPath));
    }

    #[test]
    fn test_path_deserializes_from_json_array() {
        let path: FieldPath =
            serde_json::from_value(json!(["sachacacao", "products", 0, "name"])).expect("json");
        assert_eq!(path.steps()[2], PathStep::Index(0));
    }

    #[test]
    fn test_apply_sets_leaf_and_isolates_siblings() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.heroBanner.title").expect("parse");
        let updated = apply(&original, &path, &json!("Nuevo Título")).expect("apply");

        let store = updated.get("sachacacao").expect("store");
        assert_eq!(store.hero_banner.title, "Nuevo Título");

        // Sibling leaves and sibling stores untouched.
        assert_eq!(store.hero_banner.subtitle, "");
        assert_eq!(store.name, "Sacha Cacao");
        assert_eq!(
            updated.get("cafedelvalle"),
            original.get("cafedelvalle"),
        );

        // The input snapshot is unchanged.
        assert_eq!(
            original.get("sachacacao").expect("store").hero_banner.title,
            "El Sabor"
        );
    }

    #[test]
    fn test_apply_adds_new_theme_slot() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.theme.accent").expect("parse");
        let updated = apply(&original, &path, &json!("#FF00FF")).expect("apply");
        assert_eq!(
            updated.get("sachacacao").expect("store").theme.get("accent"),
            Some(&"#FF00FF".to_string())
        );
    }

    #[test]
    fn test_apply_price_accepts_form_strings() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.products.0.price").expect("parse");
        let updated = apply(&original, &path, &json!("12.50")).expect("apply");
        assert_eq!(
            updated.get("sachacacao").expect("store").products[0].price,
            Decimal::new(1250, 2)
        );
    }

    #[test]
    fn test_apply_rejects_negative_price() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.products.0.price").expect("parse");
        let err = apply(&original, &path, &json!(-1)).expect_err("negative");
        assert!(matches!(err, PathError::InvalidValue { .. }));
    }

    #[test]
    fn test_apply_unknown_store_and_field() {
        let original = collection();

        let path = FieldPath::parse("bodega.name").expect("parse");
        assert_eq!(
            apply(&original, &path, &json!("x")),
            Err(PathError::UnknownStore("bodega".to_string()))
        );

        let path = FieldPath::parse("sachacacao.banner.title").expect("parse");
        assert_eq!(
            apply(&original, &path, &json!("x")),
            Err(PathError::UnknownField("banner".to_string()))
        );
    }

    #[test]
    fn test_apply_index_out_of_bounds() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.products.4.name").expect("parse");
        assert_eq!(
            apply(&original, &path, &json!("x")),
            Err(PathError::IndexOutOfBounds { index: 4, len: 1 })
        );
    }

    #[test]
    fn test_apply_container_paths_are_rejected() {
        let original = collection();

        let path = FieldPath::parse("sachacacao.products").expect("parse");
        assert!(matches!(
            apply(&original, &path, &json!([])),
            Err(PathError::IncompletePath(_))
        ));

        let path = FieldPath::parse("sachacacao.name.first").expect("parse");
        assert!(matches!(
            apply(&original, &path, &json!("x")),
            Err(PathError::NotAContainer(_))
        ));
    }

    #[test]
    fn test_apply_product_id_is_immutable() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.products.0.id").expect("parse");
        assert!(matches!(
            apply(&original, &path, &json!(9)),
            Err(PathError::ImmutableField(_))
        ));
    }

    #[test]
    fn test_template_edit_rejects_unknown_tag() {
        let original = collection();
        let path = FieldPath::parse("sachacacao.templateId").expect("parse");

        let updated = apply(&original, &path, &json!("modern")).expect("apply");
        assert_eq!(
            updated.get("sachacacao").expect("store").template_id,
            TemplateId::Modern
        );

        assert!(matches!(
            apply(&original, &path, &json!("neon")),
            Err(PathError::InvalidValue { .. })
        ));
    }
}
