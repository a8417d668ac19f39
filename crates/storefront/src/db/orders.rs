//! Order repository.

use chrono::Utc;

use petal_core::{OrderId, PaymentStatus, UserId, line_total, sum_totals};

use super::{CatalogStore, RepositoryError};
use crate::models::{NewOrder, Order, OrderLine};

/// Repository for order operations.
pub struct OrderRepository<'a> {
    store: &'a CatalogStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Check stock for every line, then decrement it and record the order.
    ///
    /// Runs under one write guard. If any line fails, nothing is changed.
    /// `new.items` must already hold distinct flower ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownFlower` if a line references a flower
    /// that is not in the catalog, or `RepositoryError::InsufficientStock` if a
    /// line asks for more than is available.
    pub async fn place(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.store.tables.write().await;

        let mut positions = Vec::with_capacity(new.items.len());
        for &(flower_id, quantity) in &new.items {
            let (position, flower) = tables
                .flowers
                .iter()
                .enumerate()
                .find(|(_, f)| f.id == flower_id)
                .ok_or(RepositoryError::UnknownFlower(flower_id))?;
            if quantity > flower.stock {
                return Err(RepositoryError::InsufficientStock {
                    flower_id,
                    name: flower.name.clone(),
                    requested: quantity,
                    available: flower.stock,
                });
            }
            positions.push((position, quantity));
        }

        let mut items = Vec::with_capacity(positions.len());
        for (position, quantity) in positions {
            if let Some(flower) = tables.flowers.get_mut(position) {
                flower.stock -= quantity;
                items.push(OrderLine {
                    flower_id: flower.id,
                    name: flower.name.clone(),
                    unit_price: flower.price,
                    quantity,
                    line_total: line_total(flower.price, quantity),
                });
            }
        }

        let order = Order {
            id: OrderId::generate(),
            customer: new.customer,
            payment_method: new.payment_method,
            payment_status: PaymentStatus::Pending,
            total: sum_totals(items.iter().map(|line| line.line_total)),
            items,
            user_id: new.user_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.orders.push(order.clone());

        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list(&self) -> Vec<Order> {
        let tables = self.store.tables.read().await;
        tables.orders.iter().rev().cloned().collect()
    }

    /// Orders placed by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        let tables = self.store.tables.read().await;
        tables
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect()
    }

    /// Get an order by its ID.
    pub async fn get(&self, id: OrderId) -> Option<Order> {
        let tables = self.store.tables.read().await;
        tables.orders.iter().find(|o| o.id == id).cloned()
    }

    /// Set the payment status and touch `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        status: PaymentStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.store.tables.write().await;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.payment_status = status;
        order.updated_at = Some(Utc::now());
        Ok(order.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use petal_core::{Email, FlowerId, PaymentMethod, Phone};
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::FlowerRepository;
    use crate::db::seed::default_catalog;
    use crate::models::{Customer, Flower, FlowerChanges};

    fn customer() -> Customer {
        Customer {
            name: "Ana Flores".to_string(),
            email: Email::parse("ana@flores.mx").unwrap(),
            phone: Phone::parse("+52 55 1234 5678").unwrap(),
            address: "12 Rose Lane, Springfield".to_string(),
        }
    }

    fn new_order(items: Vec<(FlowerId, u32)>) -> NewOrder {
        NewOrder {
            customer: customer(),
            payment_method: PaymentMethod::Cash,
            items,
            user_id: None,
        }
    }

    async fn stocked(store: &CatalogStore, price_cents: i64, stock: u32) -> Flower {
        let mut new = default_catalog().remove(0);
        new.price = Decimal::new(price_cents, 2);
        new.stock = stock;
        FlowerRepository::new(store).create(new).await
    }

    #[tokio::test]
    async fn test_place_decrements_stock_and_totals() {
        let store = CatalogStore::new();
        let rose = stocked(&store, 1250, 10).await;
        let lily = stocked(&store, 999, 2).await;

        let order = OrderRepository::new(&store)
            .place(new_order(vec![(rose.id, 3), (lily.id, 1)]))
            .await
            .unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total, Decimal::new(4749, 2));
        assert_eq!(order.items.len(), 2);

        let flowers = FlowerRepository::new(&store);
        assert_eq!(flowers.get(rose.id).await.unwrap().stock, 7);
        assert_eq!(flowers.get(lily.id).await.unwrap().stock, 1);
        assert_eq!(store.counts().await.orders, 1);
    }

    #[tokio::test]
    async fn test_place_is_all_or_nothing() {
        let store = CatalogStore::new();
        let rose = stocked(&store, 1250, 10).await;
        let lily = stocked(&store, 999, 2).await;

        let err = OrderRepository::new(&store)
            .place(new_order(vec![(rose.id, 3), (lily.id, 5)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::InsufficientStock { requested: 5, available: 2, .. }
        ));
        let flowers = FlowerRepository::new(&store);
        assert_eq!(flowers.get(rose.id).await.unwrap().stock, 10);
        assert_eq!(store.counts().await.orders, 0);
    }

    #[tokio::test]
    async fn test_place_unknown_flower() {
        let store = CatalogStore::new();
        let missing = FlowerId::generate();

        let err = OrderRepository::new(&store)
            .place(new_order(vec![(missing, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownFlower(id) if id == missing));
    }

    #[tokio::test]
    async fn test_line_snapshot_survives_catalog_edit() {
        let store = CatalogStore::new();
        let rose = stocked(&store, 1250, 10).await;
        let orders = OrderRepository::new(&store);
        let order = orders.place(new_order(vec![(rose.id, 1)])).await.unwrap();

        FlowerRepository::new(&store)
            .update(
                rose.id,
                FlowerChanges {
                    name: Some("Renamed".to_string()),
                    price: Some(Decimal::new(9900, 2)),
                    ..FlowerChanges::default()
                },
            )
            .await
            .unwrap();

        let stored = orders.get(order.id).await.unwrap();
        assert_eq!(stored.items[0].name, rose.name);
        assert_eq!(stored.items[0].unit_price, Decimal::new(1250, 2));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let store = CatalogStore::new();
        let rose = stocked(&store, 1250, 10).await;
        let orders = OrderRepository::new(&store);
        let owner = UserId::generate();

        let mut first = new_order(vec![(rose.id, 1)]);
        first.user_id = Some(owner);
        let first = orders.place(first).await.unwrap();
        orders.place(new_order(vec![(rose.id, 1)])).await.unwrap();
        let mut third = new_order(vec![(rose.id, 1)]);
        third.user_id = Some(owner);
        let third = orders.place(third).await.unwrap();

        let mine: Vec<OrderId> = orders
            .list_for_user(owner)
            .await
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(mine, vec![third.id, first.id]);
        assert_eq!(orders.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_set_payment_status() {
        let store = CatalogStore::new();
        let rose = stocked(&store, 1250, 10).await;
        let orders = OrderRepository::new(&store);
        let order = orders.place(new_order(vec![(rose.id, 1)])).await.unwrap();

        let paid = orders
            .set_payment_status(order.id, PaymentStatus::Paid)
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert!(paid.updated_at.is_some());

        assert!(matches!(
            orders
                .set_payment_status(OrderId::generate(), PaymentStatus::Failed)
                .await,
            Err(RepositoryError::NotFound)
        ));
    }
}
