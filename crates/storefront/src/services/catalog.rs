//! Catalog service: validated flower CRUD.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use petal_core::{FlowerId, Occasion, parse_price};

use crate::db::{CatalogStore, FlowerRepository, RepositoryError};
use crate::models::{
    DEFAULT_FOCUS, Flower, FlowerChanges, FlowerFilter, FlowerInput, FlowerQuery, NewFlower,
};

const NAME_CHARS: RangeInclusive<usize> = 2..=80;
const MAX_DESCRIPTION_CHARS: usize = 1000;
const MAX_STOCK: i64 = 100_000;
const FOCUS_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A field failed validation.
    #[error("{0}")]
    Validation(String),

    /// No flower with this id.
    #[error("flower not found: {0}")]
    NotFound(String),

    /// Store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    flowers: FlowerRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self {
            flowers: FlowerRepository::new(store),
        }
    }

    /// List flowers matching the query, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an unknown occasion.
    pub async fn list(&self, query: FlowerQuery) -> Result<Vec<Flower>, CatalogError> {
        let filter = parse_filter(query)?;
        Ok(self.flowers.list(&filter).await)
    }

    /// Get one flower.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id is malformed or unknown.
    pub async fn get(&self, id: &str) -> Result<Flower, CatalogError> {
        let flower_id = parse_flower_id(id)?;
        self.flowers
            .get(flower_id)
            .await
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Validate and insert a new flower.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` naming the first invalid field.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: FlowerInput) -> Result<Flower, CatalogError> {
        let new = validate_new_flower(input)?;
        let flower = self.flowers.create(new).await;
        tracing::info!(flower_id = %flower.id, name = %flower.name, "Flower created");
        Ok(flower)
    }

    /// Validate a partial update and merge it onto the stored flower.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id and
    /// `CatalogError::Validation` for an empty or invalid patch.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: FlowerInput) -> Result<Flower, CatalogError> {
        let flower_id = parse_flower_id(id)?;
        let changes = validate_changes(input)?;
        let flower = self
            .flowers
            .update(flower_id, changes)
            .await
            .map_err(|e| not_found_or(e, id))?;
        tracing::info!(flower_id = %flower.id, "Flower updated");
        Ok(flower)
    }

    /// Remove a flower and return it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id is malformed or unknown.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Flower, CatalogError> {
        let flower_id = parse_flower_id(id)?;
        let flower = self
            .flowers
            .delete(flower_id)
            .await
            .map_err(|e| not_found_or(e, id))?;
        tracing::info!(flower_id = %flower.id, "Flower deleted");
        Ok(flower)
    }
}

fn not_found_or(err: RepositoryError, id: &str) -> CatalogError {
    match err {
        RepositoryError::NotFound => CatalogError::NotFound(id.to_string()),
        other => CatalogError::Repository(other),
    }
}

fn parse_flower_id(id: &str) -> Result<FlowerId, CatalogError> {
    id.parse()
        .map_err(|_| CatalogError::NotFound(id.to_string()))
}

fn parse_filter(query: FlowerQuery) -> Result<FlowerFilter, CatalogError> {
    let occasion = query
        .occasion
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(validate_occasion)
        .transpose()?;
    let text = query
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    Ok(FlowerFilter {
        occasion,
        text,
        in_stock_only: query.in_stock.unwrap_or(false),
    })
}

/// Validate a create payload.
///
/// `name`, `price`, `occasion` and `imageUrl` are required. `description`
/// defaults to empty, `stock` to 0 and the focus point to the centre.
///
/// # Errors
///
/// Returns `CatalogError::Validation` naming the first invalid field.
pub fn validate_new_flower(input: FlowerInput) -> Result<NewFlower, CatalogError> {
    let name = input.name.ok_or_else(|| required("name"))?;
    let price = input.price.ok_or_else(|| required("price"))?;
    let occasion = input.occasion.ok_or_else(|| required("occasion"))?;
    let image_url = input.image_url.ok_or_else(|| required("imageUrl"))?;

    Ok(NewFlower {
        name: validate_name(&name)?,
        description: input
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?
            .unwrap_or_default(),
        price: validate_price(price)?,
        occasion: validate_occasion(&occasion)?,
        image_url: validate_image_url(&image_url)?,
        focus_x: input
            .focus_x
            .map(|v| validate_focus("focusX", v))
            .transpose()?
            .unwrap_or(DEFAULT_FOCUS),
        focus_y: input
            .focus_y
            .map(|v| validate_focus("focusY", v))
            .transpose()?
            .unwrap_or(DEFAULT_FOCUS),
        stock: input.stock.map(validate_stock).transpose()?.unwrap_or(0),
    })
}

/// Validate a partial update.
///
/// # Errors
///
/// Returns `CatalogError::Validation` if no field is present or any present
/// field is invalid.
pub fn validate_changes(input: FlowerInput) -> Result<FlowerChanges, CatalogError> {
    let changes = FlowerChanges {
        name: input.name.as_deref().map(validate_name).transpose()?,
        description: input
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?,
        price: input.price.map(validate_price).transpose()?,
        occasion: input.occasion.as_deref().map(validate_occasion).transpose()?,
        image_url: input
            .image_url
            .as_deref()
            .map(validate_image_url)
            .transpose()?,
        focus_x: input
            .focus_x
            .map(|v| validate_focus("focusX", v))
            .transpose()?,
        focus_y: input
            .focus_y
            .map(|v| validate_focus("focusY", v))
            .transpose()?,
        stock: input.stock.map(validate_stock).transpose()?,
    };

    if changes.is_empty() {
        return Err(CatalogError::Validation(
            "update must include at least one field".to_string(),
        ));
    }
    Ok(changes)
}

fn required(field: &str) -> CatalogError {
    CatalogError::Validation(format!("{field} is required"))
}

fn validate_name(raw: &str) -> Result<String, CatalogError> {
    let name = raw.trim();
    if !NAME_CHARS.contains(&name.chars().count()) {
        return Err(CatalogError::Validation(format!(
            "name must be {}-{} characters",
            NAME_CHARS.start(),
            NAME_CHARS.end()
        )));
    }
    Ok(name.to_string())
}

fn validate_description(raw: &str) -> Result<String, CatalogError> {
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(CatalogError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description.to_string())
}

fn validate_price(price: Decimal) -> Result<Decimal, CatalogError> {
    parse_price(price).map_err(|e| CatalogError::Validation(e.to_string()))
}

fn validate_occasion(raw: &str) -> Result<Occasion, CatalogError> {
    Occasion::parse(raw).map_err(|e| CatalogError::Validation(e.to_string()))
}

fn validate_stock(stock: i64) -> Result<u32, CatalogError> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(CatalogError::Validation(format!(
            "stock must be between 0 and {MAX_STOCK}"
        )));
    }
    u32::try_from(stock).map_err(|e| CatalogError::Validation(e.to_string()))
}

fn validate_image_url(raw: &str) -> Result<String, CatalogError> {
    let invalid = || CatalogError::Validation("imageUrl must be an absolute http(s) URL".to_string());
    let trimmed = raw.trim();
    let url = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

fn validate_focus(field: &str, value: f64) -> Result<f64, CatalogError> {
    if !value.is_finite() || !FOCUS_RANGE.contains(&value) {
        return Err(CatalogError::Validation(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(value)
}
