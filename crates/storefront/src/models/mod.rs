//! Domain models for the storefront.
//!
//! Records held by the catalog store, the request payloads that feed them, and
//! the identity kept in the session.

pub mod chat;
pub mod flower;
pub mod order;
pub mod session;
pub mod user;

pub use chat::{ChatReply, ChatRequest, ChatTurn, ReplySource, TurnRole};
pub use flower::{
    DEFAULT_FOCUS, Flower, FlowerChanges, FlowerFilter, FlowerInput, FlowerQuery, NewFlower,
};
pub use order::{
    CreateOrderInput, Customer, CustomerInput, NewOrder, Order, OrderItemInput, OrderLine,
    UpdateOrderInput,
};
pub use session::{SessionClaims, keys as session_keys};
pub use user::User;
