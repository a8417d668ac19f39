//! User repository.
//!
//! Emails are unique; lookups compare the normalized (lowercased) form.

use chrono::Utc;

use petal_core::{Email, Role, UserId};

use super::{CatalogStore, RepositoryError};
use crate::models::User;

/// Row in the user table.
#[derive(Debug, Clone)]
pub(super) struct UserRecord {
    user: User,
    password_hash: String,
}

/// Repository for account operations.
pub struct UserRepository<'a> {
    store: &'a CatalogStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Get a user by their email address.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        let tables = self.store.tables.read().await;
        tables
            .users
            .iter()
            .find(|r| &r.user.email == email)
            .map(|r| r.user.clone())
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        let tables = self.store.tables.read().await;
        tables
            .users
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.clone())
    }

    /// Get a user together with their stored password hash.
    pub async fn get_password_hash(&self, email: &Email) -> Option<(User, String)> {
        let tables = self.store.tables.read().await;
        tables
            .users
            .iter()
            .find(|r| &r.user.email == email)
            .map(|r| (r.user.clone(), r.password_hash.clone()))
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        role: Role,
        password_hash: String,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.iter().any(|r| &r.user.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email: email.clone(),
            role,
            created_at: Utc::now(),
        };
        tables.users.push(UserRecord {
            user: user.clone(),
            password_hash,
        });

        Ok(user)
    }
}
