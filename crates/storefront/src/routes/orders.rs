//! Order route handlers.
//!
//! Checkout is open to guests. Reading orders needs a session: admins see
//! every order, customers only their own.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{OptionalSession, RequireAdmin, RequireSession};
use crate::models::{CreateOrderInput, Order, UpdateOrderInput};
use crate::services::OrderService;
use crate::state::AppState;

/// `POST /orders`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    OptionalSession(claims): OptionalSession,
    body: std::result::Result<Json<CreateOrderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(input) = body?;
    let order = OrderService::new(state.store())
        .place(input, claims.as_ref())
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_id", &order.id.to_string())],
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders`
pub async fn index(
    State(state): State<AppState>,
    RequireSession(claims): RequireSession,
) -> Json<Vec<Order>> {
    Json(OrderService::new(state.store()).list(&claims).await)
}

/// `GET /orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireSession(claims): RequireSession,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.store()).get(&id, &claims).await?;
    Ok(Json(order))
}

/// `PATCH /orders/{id}`; only the payment status can change.
#[instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateOrderInput>, JsonRejection>,
) -> Result<Json<Order>> {
    let Json(input) = body?;
    let order = OrderService::new(state.store())
        .set_payment_status(&id, input.payment_status)
        .await?;
    Ok(Json(order))
}
