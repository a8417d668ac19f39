//! Core types for Petal.
//!
//! This module provides type-safe wrappers for the shop's domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod occasion;
pub mod phone;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{MAX_PRICE, MoneyError, line_total, parse_price, round_cents, sum_totals};
pub use occasion::{Occasion, OccasionError};
pub use phone::{Phone, PhoneError};
pub use status::*;
