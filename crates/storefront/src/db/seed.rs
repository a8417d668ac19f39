//! Default catalog loaded at startup.

use rust_decimal::Decimal;

use petal_core::Occasion;

use super::{CatalogStore, FlowerRepository};
use crate::models::{DEFAULT_FOCUS, NewFlower};

struct SeedFlower {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    occasion: Occasion,
    image: &'static str,
    focus_y: f64,
    stock: u32,
}

const SEED_FLOWERS: &[SeedFlower] = &[
    SeedFlower {
        name: "Crimson Rose Bouquet",
        description: "A dozen long-stem red roses wrapped in kraft paper.",
        price_cents: 5499,
        occasion: Occasion::Romance,
        image: "https://images.petal.shop/catalog/crimson-rose.jpg",
        focus_y: 40.0,
        stock: 24,
    },
    SeedFlower {
        name: "Sunny Gerbera Mix",
        description: "Bright gerbera daisies in yellow, orange and pink.",
        price_cents: 3299,
        occasion: Occasion::Birthday,
        image: "https://images.petal.shop/catalog/gerbera-mix.jpg",
        focus_y: DEFAULT_FOCUS,
        stock: 30,
    },
    SeedFlower {
        name: "White Peony Cascade",
        description: "Soft white peonies and eucalyptus for the big day.",
        price_cents: 8900,
        occasion: Occasion::Wedding,
        image: "https://images.petal.shop/catalog/peony-cascade.jpg",
        focus_y: 35.0,
        stock: 8,
    },
    SeedFlower {
        name: "Peaceful Lily Arrangement",
        description: "White lilies and chrysanthemums in a woven basket.",
        price_cents: 6450,
        occasion: Occasion::Sympathy,
        image: "https://images.petal.shop/catalog/lily-arrangement.jpg",
        focus_y: DEFAULT_FOCUS,
        stock: 12,
    },
    SeedFlower {
        name: "Golden Sunflower Bundle",
        description: "Five tall sunflowers to celebrate a win.",
        price_cents: 2999,
        occasion: Occasion::Congratulations,
        image: "https://images.petal.shop/catalog/sunflower-bundle.jpg",
        focus_y: 45.0,
        stock: 20,
    },
    SeedFlower {
        name: "Seasonal Tulip Jar",
        description: "Fresh-cut tulips in a reusable glass jar.",
        price_cents: 2450,
        occasion: Occasion::Everyday,
        image: "https://images.petal.shop/catalog/tulip-jar.jpg",
        focus_y: DEFAULT_FOCUS,
        stock: 40,
    },
    SeedFlower {
        name: "Lavender Field Posy",
        description: "Dried lavender and wax flowers, lasts for weeks.",
        price_cents: 1899,
        occasion: Occasion::Everyday,
        image: "https://images.petal.shop/catalog/lavender-posy.jpg",
        focus_y: DEFAULT_FOCUS,
        stock: 0,
    },
];

/// The starter catalog, already validated.
#[must_use]
pub fn default_catalog() -> Vec<NewFlower> {
    SEED_FLOWERS
        .iter()
        .map(|s| NewFlower {
            name: s.name.to_string(),
            description: s.description.to_string(),
            price: Decimal::new(s.price_cents, 2),
            occasion: s.occasion,
            image_url: s.image.to_string(),
            focus_x: DEFAULT_FOCUS,
            focus_y: s.focus_y,
            stock: s.stock,
        })
        .collect()
}

/// Insert the starter catalog into `store`. Returns the number of flowers added.
pub async fn seed_catalog(store: &CatalogStore) -> usize {
    let flowers = FlowerRepository::new(store);
    let catalog = default_catalog();
    let count = catalog.len();
    for new in catalog {
        flowers.create(new).await;
    }
    tracing::info!(count, "Seeded default catalog");
    count
}

#[cfg(test)]
mod tests {
    use petal_core::{MAX_PRICE, parse_price};

    use super::*;

    #[test]
    fn test_seed_prices_are_valid() {
        for flower in default_catalog() {
            assert_eq!(parse_price(flower.price), Ok(flower.price), "{}", flower.name);
            assert!(flower.price <= MAX_PRICE);
        }
    }

    #[test]
    fn test_seed_covers_every_occasion() {
        let catalog = default_catalog();
        for occasion in Occasion::ALL {
            assert!(
                catalog.iter().any(|f| f.occasion == occasion),
                "no seed flower for {occasion}"
            );
        }
    }

    #[tokio::test]
    async fn test_seed_catalog_fills_store() {
        let store = CatalogStore::new();
        let added = seed_catalog(&store).await;
        assert_eq!(store.counts().await.flowers, added);
    }
}
