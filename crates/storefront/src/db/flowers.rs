//! Flower repository.

use petal_core::FlowerId;

use super::{CatalogStore, RepositoryError};
use crate::models::{Flower, FlowerChanges, FlowerFilter, NewFlower};

/// Repository for catalog operations.
pub struct FlowerRepository<'a> {
    store: &'a CatalogStore,
}

impl<'a> FlowerRepository<'a> {
    /// Create a new flower repository.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Flowers matching `filter`, in catalog order.
    pub async fn list(&self, filter: &FlowerFilter) -> Vec<Flower> {
        let tables = self.store.tables.read().await;
        tables
            .flowers
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect()
    }

    /// Every flower, in catalog order.
    pub async fn all(&self) -> Vec<Flower> {
        self.store.tables.read().await.flowers.clone()
    }

    /// Get a flower by its ID.
    pub async fn get(&self, id: FlowerId) -> Option<Flower> {
        let tables = self.store.tables.read().await;
        tables.flowers.iter().find(|f| f.id == id).cloned()
    }

    /// Insert a validated flower, assigning its id and creation time.
    pub async fn create(&self, new: NewFlower) -> Flower {
        let flower = new.into_flower();
        self.store.tables.write().await.flowers.push(flower.clone());
        flower
    }

    /// Merge `changes` onto the flower with `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no flower has this ID.
    pub async fn update(
        &self,
        id: FlowerId,
        changes: FlowerChanges,
    ) -> Result<Flower, RepositoryError> {
        let mut tables = self.store.tables.write().await;
        let flower = tables
            .flowers
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(RepositoryError::NotFound)?;
        changes.apply(flower);
        Ok(flower.clone())
    }

    /// Remove the flower with `id` and return it.
    ///
    /// Orders already placed keep their line snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no flower has this ID.
    pub async fn delete(&self, id: FlowerId) -> Result<Flower, RepositoryError> {
        let mut tables = self.store.tables.write().await;
        let index = tables
            .flowers
            .iter()
            .position(|f| f.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(tables.flowers.remove(index))
    }
}
