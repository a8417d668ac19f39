//! In-process data store for the storefront.
//!
//! # Tables
//!
//! - `flowers` - Catalog, kept in insertion order
//! - `orders` - Placed orders, appended in creation order
//! - `users` - Accounts with their Argon2 password hashes
//!
//! All tables sit behind one `RwLock` so that order placement can check and
//! decrement stock for every line under a single write guard. Handlers never
//! touch the tables directly; they go through the repositories below, which
//! borrow a [`CatalogStore`] the same way a SQL repository borrows a pool.

pub mod flowers;
pub mod orders;
pub mod seed;
pub mod users;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use petal_core::FlowerId;

use crate::models::{Flower, Order};

pub use flowers::FlowerRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

use users::UserRecord;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An order line references a flower that is not in the catalog.
    #[error("unknown flower: {0}")]
    UnknownFlower(FlowerId),

    /// An order line asks for more units than are in stock.
    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        flower_id: FlowerId,
        name: String,
        requested: u32,
        available: u32,
    },
}

#[derive(Debug, Default)]
struct Tables {
    flowers: Vec<Flower>,
    orders: Vec<Order>,
    users: Vec<UserRecord>,
}

/// Shared handle to the in-process tables.
///
/// Cheap to clone; every clone sees the same data.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    tables: Arc<RwLock<Tables>>,
}

/// Row counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub flowers: usize,
    pub orders: usize,
}

impl CatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of flowers and orders.
    pub async fn counts(&self) -> StoreCounts {
        let tables = self.tables.read().await;
        StoreCounts {
            flowers: tables.flowers.len(),
            orders: tables.orders.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = CatalogStore::new();
        let other = store.clone();

        FlowerRepository::new(&store)
            .create(seed::default_catalog().remove(0))
            .await;

        assert_eq!(other.counts().await, StoreCounts { flowers: 1, orders: 0 });
    }
}
