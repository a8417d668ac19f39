//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use petal_core::{Email, Role, UserId};

/// A storefront account.
///
/// This is also the public view returned by the auth endpoints; the password
/// hash lives only in the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
