//! Catalog flower types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petal_core::{FlowerId, Occasion};

/// Default focal point for image cropping, in percent.
pub const DEFAULT_FOCUS: f64 = 50.0;

/// A flower listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flower {
    pub id: FlowerId,
    pub name: String,
    pub description: String,
    /// Unit price, always rounded to cents.
    pub price: Decimal,
    pub occasion: Occasion,
    pub image_url: String,
    /// Horizontal focal point of the image (0-100).
    pub focus_x: f64,
    /// Vertical focal point of the image (0-100).
    pub focus_y: f64,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

impl Flower {
    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Raw flower payload for `POST /flowers` and `PATCH /flowers/{id}`.
///
/// Every field is optional at the wire level; the catalog service decides
/// which ones are required and validates their ranges.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowerInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub occasion: Option<String>,
    pub image_url: Option<String>,
    pub focus_x: Option<f64>,
    pub focus_y: Option<f64>,
    pub stock: Option<i64>,
}

/// A validated flower ready to be inserted.
///
/// Serializes to the same shape `POST /flowers` accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlower {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub occasion: Occasion,
    pub image_url: String,
    pub focus_x: f64,
    pub focus_y: f64,
    pub stock: u32,
}

impl NewFlower {
    /// Assign an id and creation time.
    #[must_use]
    pub fn into_flower(self) -> Flower {
        Flower {
            id: FlowerId::generate(),
            name: self.name,
            description: self.description,
            price: self.price,
            occasion: self.occasion,
            image_url: self.image_url,
            focus_x: self.focus_x,
            focus_y: self.focus_y,
            stock: self.stock,
            created_at: Utc::now(),
        }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowerChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub occasion: Option<Occasion>,
    pub image_url: Option<String>,
    pub focus_x: Option<f64>,
    pub focus_y: Option<f64>,
    pub stock: Option<u32>,
}

impl FlowerChanges {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.occasion.is_none()
            && self.image_url.is_none()
            && self.focus_x.is_none()
            && self.focus_y.is_none()
            && self.stock.is_none()
    }

    /// Merge the changes onto an existing record.
    pub fn apply(self, flower: &mut Flower) {
        if let Some(name) = self.name {
            flower.name = name;
        }
        if let Some(description) = self.description {
            flower.description = description;
        }
        if let Some(price) = self.price {
            flower.price = price;
        }
        if let Some(occasion) = self.occasion {
            flower.occasion = occasion;
        }
        if let Some(image_url) = self.image_url {
            flower.image_url = image_url;
        }
        if let Some(focus_x) = self.focus_x {
            flower.focus_x = focus_x;
        }
        if let Some(focus_y) = self.focus_y {
            flower.focus_y = focus_y;
        }
        if let Some(stock) = self.stock {
            flower.stock = stock;
        }
    }
}

/// Query string for `GET /flowers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowerQuery {
    pub occasion: Option<String>,
    pub q: Option<String>,
    pub in_stock: Option<bool>,
}

/// Parsed catalog filter.
#[derive(Debug, Clone, Default)]
pub struct FlowerFilter {
    pub occasion: Option<Occasion>,
    /// Lowercased search needle.
    pub text: Option<String>,
    pub in_stock_only: bool,
}

impl FlowerFilter {
    /// Whether `flower` passes every active criterion.
    #[must_use]
    pub fn matches(&self, flower: &Flower) -> bool {
        if self.occasion.is_some_and(|o| o != flower.occasion) {
            return false;
        }
        if self.in_stock_only && !flower.in_stock() {
            return false;
        }
        self.text.as_deref().is_none_or(|needle| {
            flower.name.to_lowercase().contains(needle)
                || flower.description.to_lowercase().contains(needle)
        })
    }
}
