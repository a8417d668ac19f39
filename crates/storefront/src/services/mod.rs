//! Business logic services.
//!
//! Services validate untrusted input, enforce ownership rules and drive the
//! repositories. Route handlers stay thin and only translate errors.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
pub use chat::{ChatError, ChatService};
pub use orders::{OrderError, OrderService};
