//! Order types.
//!
//! An order's lines are snapshots: the flower name and unit price are copied
//! at purchase time and never follow later catalog edits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petal_core::{Email, FlowerId, OrderId, PaymentMethod, PaymentStatus, Phone, UserId};

/// Validated customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub flower_id: FlowerId,
    /// Flower name at purchase time.
    pub name: String,
    /// Unit price at purchase time.
    pub unit_price: Decimal,
    pub quantity: u32,
    /// `unit_price * quantity`, rounded to cents.
    pub line_total: Decimal,
}

/// A recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    /// Signed-in account that placed the order, if any.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Raw customer block of `POST /orders`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Raw cart line of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub flower_id: String,
    pub quantity: i64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub customer: CustomerInput,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderInput {
    pub payment_status: PaymentStatus,
}

/// A validated cart handed to the store.
///
/// `items` holds distinct flower ids in first-seen order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    pub items: Vec<(FlowerId, u32)>,
    pub user_id: Option<UserId>,
}
