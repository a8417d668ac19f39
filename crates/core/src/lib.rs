//! Petal Core - Shared domain types for the flower shop.
//!
//! This crate provides the types used by every Petal component:
//! - `storefront` - The JSON API server (catalog, orders, auth, chat)
//! - `cli` - Operator tooling (password hashes, secrets, seed catalog)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no storage. Validation that can be expressed on a single value (an email,
//! a phone number, an occasion name) lives here so every layer agrees on it.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, contact newtypes, enums and money helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
