//! The built-in default store collection.
//!
//! Seeded on first load so a fresh installation renders two fully-populated
//! demo stores, one per template variant.

use rust_decimal::Decimal;

use tienditas_core::{
    HeroBanner, PaymentInfo, Product, ProductId, StoreCollection, StoreRecord, TemplateId, Theme,
};

/// Store shown when a visitor arrives without a store identifier.
pub const DEFAULT_STORE_ID: &str = "sachacacao";

fn theme(entries: &[(&str, &str)]) -> Theme {
    entries
        .iter()
        .map(|(slot, color)| ((*slot).to_string(), (*color).to_string()))
        .collect()
}

fn product(id: u64, name: &str, description: &str, price: Decimal, image: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        image: image.to_string(),
    }
}

fn sachacacao() -> StoreRecord {
    StoreRecord {
        name: "Sacha Cacao".to_string(),
        template_id: TemplateId::Classic,
        section_title: "Nuestros Chocolates Artesanales".to_string(),
        hero_banner: HeroBanner {
            image_url: "https://images.unsplash.com/photo-1578781429972-6f29a27b7b3b?q=80&w=2070&auto=format&fit=crop".to_string(),
            title: "El Sabor Auténtico de la Amazonía".to_string(),
            subtitle: "Chocolates hechos con los mejores granos de cacao de origen único.".to_string(),
        },
        products: vec![
            product(
                1,
                "Tableta de Chocolate 70%",
                "Intenso y con notas frutales, ideal para paladares exigentes.",
                Decimal::new(1500, 2),
                "https://images.unsplash.com/photo-1558501970-24a7a4358826?q=80&w=1974&auto=format&fit=crop",
            ),
            product(
                2,
                "Chocotejas de Pecanas",
                "El dulce tradicional peruano con el mejor chocolate y pecanas seleccionadas.",
                Decimal::new(250, 2),
                "https://images.unsplash.com/photo-1610452391694-95a4993f4129?q=80&w=1931&auto=format&fit=crop",
            ),
            product(
                3,
                "Bombones Rellenos",
                "Caja de 12 bombones con rellenos surtidos de frutos de la selva.",
                Decimal::new(3000, 2),
                "https://images.unsplash.com/photo-1582298242510-b34f7b3117b3?q=80&w=1935&auto=format&fit=crop",
            ),
        ],
        payment_info: PaymentInfo {
            phone: "987 654 321".to_string(),
            name: "Juanita Pérez".to_string(),
            whatsapp: "51987654321".to_string(),
        },
        theme: theme(&[
            ("primary", "#5D4037"),
            ("secondary", "#D7CCC8"),
            ("background", "#F5F5F5"),
            ("text", "#4E342E"),
            ("cardBackground", "#FFFFFF"),
            ("buttonText", "#FFFFFF"),
        ]),
        chat_instruction: "Eres \"CacaoBot\", un asistente virtual amigable y experto en los \
            chocolates de Sacha Cacao. Tu misión es ayudar a los clientes con sus preguntas sobre \
            los productos, precios, ingredientes y el proceso artesanal. Eres entusiasta, \
            conocedor y siempre usas un lenguaje cálido. La tienda se llama Sacha Cacao."
            .to_string(),
        next_product_id: 4,
    }
}

fn cafedelvalle() -> StoreRecord {
    StoreRecord {
        name: "Café del Valle".to_string(),
        template_id: TemplateId::Modern,
        section_title: "Café de Especialidad".to_string(),
        hero_banner: HeroBanner {
            image_url: "https://images.unsplash.com/photo-1559496417-e7f25cb247f3?q=80&w=1974&auto=format&fit=crop".to_string(),
            title: "El Aroma que Despierta tus Sentidos".to_string(),
            subtitle: "Granos seleccionados y tostados a la perfección.".to_string(),
        },
        products: vec![
            product(
                1,
                "Café Geisha Tostado Medio",
                "Notas florales y cítricas, una experiencia única.",
                Decimal::new(5500, 2),
                "https://images.unsplash.com/photo-1511920183353-3c7c4217a2b5?q=80&w=1974&auto=format&fit=crop",
            ),
            product(
                2,
                "Café Orgánico de la Selva",
                "Cuerpo completo con notas a chocolate y nueces.",
                Decimal::new(3500, 2),
                "https://images.unsplash.com/photo-1599160533833-8a3c89220054?q=80&w=1974&auto=format&fit=crop",
            ),
        ],
        payment_info: PaymentInfo {
            phone: "912 345 678".to_string(),
            name: "Carlos Gomez".to_string(),
            whatsapp: "51912345678".to_string(),
        },
        theme: theme(&[
            ("primary", "#1a4a3c"),
            ("secondary", "#e4d8c7"),
            ("background", "#f8f5f0"),
            ("text", "#2c1e15"),
            ("cardBackground", "#FFFFFF"),
            ("buttonText", "#FFFFFF"),
        ]),
        chat_instruction: "Eres \"CaféBot\", un barista virtual experto en café de especialidad \
            de Café del Valle. Tu tono es sofisticado pero accesible. Asesora a los clientes \
            sobre perfiles de sabor, métodos de preparación y orígenes del café."
            .to_string(),
        next_product_id: 3,
    }
}

/// Build the default collection: two complete stores, one per template.
#[must_use]
pub fn default_collection() -> StoreCollection {
    let mut collection = StoreCollection::new();
    collection.insert(DEFAULT_STORE_ID.to_string(), sachacacao());
    collection.insert("cafedelvalle".to_string(), cafedelvalle());
    collection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collection_is_fully_populated() {
        let collection = default_collection();
        assert_eq!(collection.len(), 2);

        let store = collection.get(DEFAULT_STORE_ID).expect("default store");
        assert!(!store.name.is_empty());
        assert!(!store.products.is_empty());
        assert!(!store.chat_instruction.is_empty());
        assert_eq!(store.theme.len(), 6);

        for record in collection.values() {
            assert!(!record.payment_info.whatsapp.is_empty());
            assert!(record.products.iter().all(|p| !p.name.is_empty()));
        }
    }

    #[test]
    fn test_seeded_stores_cover_both_templates() {
        let collection = default_collection();
        assert_eq!(
            collection.get("sachacacao").map(|s| s.template_id),
            Some(TemplateId::Classic)
        );
        assert_eq!(
            collection.get("cafedelvalle").map(|s| s.template_id),
            Some(TemplateId::Modern)
        );
    }
}
