//! Order service: cart validation, placement and payment status.
//!
//! Validation runs in a fixed order so that bad input never reaches the
//! store: customer fields first, then the item list, then the stock check
//! under the store's write lock.

use std::ops::RangeInclusive;

use thiserror::Error;
use tracing::instrument;

use petal_core::{Email, FlowerId, OrderId, PaymentStatus, Phone};

use crate::db::{CatalogStore, OrderRepository, RepositoryError};
use crate::models::{
    CreateOrderInput, Customer, CustomerInput, NewOrder, Order, OrderItemInput, SessionClaims,
};

const CUSTOMER_NAME_CHARS: RangeInclusive<usize> = 2..=80;
const ADDRESS_CHARS: RangeInclusive<usize> = 5..=200;
const MAX_ITEMS: usize = 50;
const QUANTITY_RANGE: RangeInclusive<i64> = 1..=100;

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Customer or item input failed validation.
    #[error("{0}")]
    Validation(String),

    /// A cart line references an unknown flower.
    #[error("flower not found: {0}")]
    FlowerNotFound(String),

    /// A cart line asks for more than is in stock.
    #[error("only {available} left of {name} (requested {requested})")]
    OutOfStock {
        name: String,
        requested: u32,
        available: u32,
    },

    /// No order with this id.
    #[error("order not found: {0}")]
    NotFound(String),

    /// The caller may not see this order.
    #[error("this order belongs to another customer")]
    Forbidden,

    /// Store failure.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownFlower(id) => Self::FlowerNotFound(id.to_string()),
            RepositoryError::InsufficientStock {
                name,
                requested,
                available,
                ..
            } => Self::OutOfStock {
                name,
                requested,
                available,
            },
            other => Self::Repository(other),
        }
    }
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self {
            orders: OrderRepository::new(store),
        }
    }

    /// Validate a cart and place the order.
    ///
    /// When `placed_by` is set the order is attributed to that account.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for bad customer or item input,
    /// `OrderError::FlowerNotFound` for unknown or malformed flower ids and
    /// `OrderError::OutOfStock` when a line exceeds current stock. Stock is
    /// untouched in every error case.
    #[instrument(skip(self, input, placed_by), fields(items = input.items.len()))]
    pub async fn place(
        &self,
        input: CreateOrderInput,
        placed_by: Option<&SessionClaims>,
    ) -> Result<Order, OrderError> {
        let customer = validate_customer(input.customer)?;
        let items = resolve_items(&merge_items(input.items)?)?;

        let order = self
            .orders
            .place(NewOrder {
                customer,
                payment_method: input.payment_method,
                items,
                user_id: placed_by.map(|c| c.sub),
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            lines = order.items.len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Orders visible to `viewer`: everything for an admin, otherwise only
    /// the viewer's own orders. Newest first.
    pub async fn list(&self, viewer: &SessionClaims) -> Vec<Order> {
        if viewer.is_admin() {
            self.orders.list().await
        } else {
            self.orders.list_for_user(viewer.sub).await
        }
    }

    /// Get one order if `viewer` may see it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for a malformed or unknown id and
    /// `OrderError::Forbidden` when a customer asks for someone else's order.
    pub async fn get(&self, id: &str, viewer: &SessionClaims) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get(parse_order_id(id)?)
            .await
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;

        if viewer.is_admin() || order.user_id == Some(viewer.sub) {
            Ok(order)
        } else {
            Err(OrderError::Forbidden)
        }
    }

    /// Set an order's payment status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for a malformed or unknown id.
    #[instrument(skip(self))]
    pub async fn set_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .set_payment_status(parse_order_id(id)?, status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::NotFound(id.to_string()),
                other => OrderError::from(other),
            })?;
        tracing::info!(order_id = %order.id, status = ?order.payment_status, "Payment status updated");
        Ok(order)
    }
}

fn parse_order_id(id: &str) -> Result<OrderId, OrderError> {
    id.parse().map_err(|_| OrderError::NotFound(id.to_string()))
}

/// Validate and normalize the customer block.
///
/// # Errors
///
/// Returns `OrderError::Validation` naming the first invalid field.
pub fn validate_customer(input: CustomerInput) -> Result<Customer, OrderError> {
    let name = input.name.trim();
    if !CUSTOMER_NAME_CHARS.contains(&name.chars().count()) {
        return Err(OrderError::Validation(format!(
            "customer name must be {}-{} characters",
            CUSTOMER_NAME_CHARS.start(),
            CUSTOMER_NAME_CHARS.end()
        )));
    }

    let email = Email::parse(&input.email)
        .map_err(|e| OrderError::Validation(format!("invalid email: {e}")))?;
    let phone = Phone::parse(&input.phone)
        .map_err(|e| OrderError::Validation(format!("invalid phone: {e}")))?;

    let address = input.address.trim();
    if !ADDRESS_CHARS.contains(&address.chars().count()) {
        return Err(OrderError::Validation(format!(
            "address must be {}-{} characters",
            ADDRESS_CHARS.start(),
            ADDRESS_CHARS.end()
        )));
    }

    Ok(Customer {
        name: name.to_string(),
        email,
        phone,
        address: address.to_string(),
    })
}

/// Cart line key: a parsed id, or the raw text when it is not a UUID.
pub type ItemKey = Result<FlowerId, String>;

/// Check the item list and sum quantities of repeated flower ids.
///
/// Lines keep the order in which each id first appears.
///
/// # Errors
///
/// Returns `OrderError::Validation` for an empty or oversized list, or a
/// quantity outside 1-100 (per line or after merging).
pub fn merge_items(items: Vec<OrderItemInput>) -> Result<Vec<(ItemKey, u32)>, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    if items.len() > MAX_ITEMS {
        return Err(OrderError::Validation(format!(
            "order may contain at most {MAX_ITEMS} items"
        )));
    }

    let mut merged: Vec<(ItemKey, i64)> = Vec::with_capacity(items.len());
    for item in items {
        if !QUANTITY_RANGE.contains(&item.quantity) {
            return Err(quantity_error());
        }
        let raw = item.flower_id.trim();
        let key: ItemKey = raw.parse::<FlowerId>().map_err(|_| raw.to_string());
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => merged.push((key, item.quantity)),
        }
    }

    merged
        .into_iter()
        .map(|(key, quantity)| {
            if QUANTITY_RANGE.contains(&quantity) {
                u32::try_from(quantity)
                    .map(|q| (key, q))
                    .map_err(|_| quantity_error())
            } else {
                Err(quantity_error())
            }
        })
        .collect()
}

/// Turn merged keys into flower ids; malformed ids are unknown flowers.
fn resolve_items(merged: &[(ItemKey, u32)]) -> Result<Vec<(FlowerId, u32)>, OrderError> {
    merged
        .iter()
        .map(|(key, quantity)| match key {
            Ok(id) => Ok((*id, *quantity)),
            Err(raw) => Err(OrderError::FlowerNotFound(raw.clone())),
        })
        .collect()
}

fn quantity_error() -> OrderError {
    OrderError::Validation(format!(
        "quantity must be between {} and {}",
        QUANTITY_RANGE.start(),
        QUANTITY_RANGE.end()
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use petal_core::{PaymentMethod, Role, UserId};

    use super::*;
    use crate::db::FlowerRepository;
    use crate::db::seed::default_catalog;
    use crate::models::Flower;

    fn customer_input() -> CustomerInput {
        CustomerInput {
            name: " Ana Flores ".to_string(),
            email: "Ana@Flores.mx".to_string(),
            phone: "(55) 1234-5678".to_string(),
            address: "12 Rose Lane, Springfield".to_string(),
        }
    }

    fn item(flower_id: &str, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            flower_id: flower_id.to_string(),
            quantity,
        }
    }

    fn claims(role: Role) -> SessionClaims {
        SessionClaims {
            sub: UserId::generate(),
            email: Email::parse("someone@petal.shop").unwrap(),
            role,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    async fn stocked_flower(store: &CatalogStore, stock: u32) -> Flower {
        let mut new = default_catalog().remove(0);
        new.stock = stock;
        FlowerRepository::new(store).create(new).await
    }

    fn order_input(items: Vec<OrderItemInput>) -> CreateOrderInput {
        CreateOrderInput {
            customer: customer_input(),
            payment_method: PaymentMethod::Cash,
            items,
        }
    }

    #[test]
    fn test_validate_customer_normalizes() {
        let customer = validate_customer(customer_input()).unwrap();
        assert_eq!(customer.name, "Ana Flores");
        assert_eq!(customer.email.as_str(), "ana@flores.mx");
    }

    #[test]
    fn test_validate_customer_rejects_each_field() {
        let cases = [
            (CustomerInput { name: "A".to_string(), ..customer_input() }, "name"),
            (CustomerInput { email: "ana-at-flores".to_string(), ..customer_input() }, "email"),
            (CustomerInput { phone: "call me maybe".to_string(), ..customer_input() }, "phone"),
            (CustomerInput { phone: "123".to_string(), ..customer_input() }, "phone"),
            (CustomerInput { address: "Lane".to_string(), ..customer_input() }, "address"),
        ];
        for (input, field) in cases {
            match validate_customer(input) {
                Err(OrderError::Validation(message)) => {
                    assert!(message.contains(field), "{message} should mention {field}");
                }
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_merge_items_sums_in_first_seen_order() {
        let a = FlowerId::generate().to_string();
        let b = FlowerId::generate().to_string();
        let merged = merge_items(vec![item(&a, 2), item(&b, 1), item(&a, 3)]).unwrap();

        let ids: Vec<String> = merged
            .iter()
            .map(|(k, _)| k.as_ref().map(ToString::to_string).unwrap())
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(merged.iter().map(|(_, q)| *q).collect::<Vec<_>>(), vec![5, 1]);
    }

    #[test]
    fn test_merge_items_limits() {
        assert!(matches!(merge_items(Vec::new()), Err(OrderError::Validation(_))));

        let id = FlowerId::generate().to_string();
        assert!(matches!(merge_items(vec![item(&id, 0)]), Err(OrderError::Validation(_))));
        assert!(matches!(merge_items(vec![item(&id, 101)]), Err(OrderError::Validation(_))));
        assert!(matches!(
            merge_items(vec![item(&id, 60), item(&id, 41)]),
            Err(OrderError::Validation(_))
        ));

        let too_many = (0..=MAX_ITEMS).map(|_| item(&id, 1)).collect();
        assert!(matches!(merge_items(too_many), Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_flower_id_is_not_found() {
        let store = CatalogStore::new();
        let err = OrderService::new(&store)
            .place(order_input(vec![item("rose-123", 1)]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::FlowerNotFound(raw) if raw == "rose-123"));
    }

    #[tokio::test]
    async fn test_invalid_phone_leaves_stock_untouched() {
        let store = CatalogStore::new();
        let flower = stocked_flower(&store, 5).await;
        let mut input = order_input(vec![item(&flower.id.to_string(), 2)]);
        input.customer.phone = "not a phone".to_string();

        let err = OrderService::new(&store).place(input, None).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
        let stored = FlowerRepository::new(&store).get(flower.id).await.unwrap();
        assert_eq!(stored.stock, 5);
        assert_eq!(store.counts().await.orders, 0);
    }

    #[tokio::test]
    async fn test_merged_quantity_checked_against_stock() {
        let store = CatalogStore::new();
        let flower = stocked_flower(&store, 4).await;
        let id = flower.id.to_string();

        let err = OrderService::new(&store)
            .place(order_input(vec![item(&id, 3), item(&id, 2)]), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::OutOfStock { requested: 5, available: 4, .. }
        ));
    }

    #[tokio::test]
    async fn test_place_attributes_signed_in_user() {
        let store = CatalogStore::new();
        let flower = stocked_flower(&store, 4).await;
        let customer = claims(Role::Customer);
        let service = OrderService::new(&store);

        let order = service
            .place(order_input(vec![item(&flower.id.to_string(), 1)]), Some(&customer))
            .await
            .unwrap();
        assert_eq!(order.user_id, Some(customer.sub));

        assert_eq!(service.list(&customer).await.len(), 1);
        assert!(service.list(&claims(Role::Customer)).await.is_empty());
        assert_eq!(service.list(&claims(Role::Admin)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_enforces_ownership() {
        let store = CatalogStore::new();
        let flower = stocked_flower(&store, 4).await;
        let owner = claims(Role::Customer);
        let service = OrderService::new(&store);
        let order = service
            .place(order_input(vec![item(&flower.id.to_string(), 1)]), Some(&owner))
            .await
            .unwrap();
        let id = order.id.to_string();

        assert!(service.get(&id, &owner).await.is_ok());
        assert!(service.get(&id, &claims(Role::Admin)).await.is_ok());
        assert!(matches!(
            service.get(&id, &claims(Role::Customer)).await,
            Err(OrderError::Forbidden)
        ));
        assert!(matches!(
            service.get("nope", &owner).await,
            Err(OrderError::NotFound(_))
        ));
    }
}
