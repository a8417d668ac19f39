//! Authentication service.
//!
//! Password login against the user table. Accounts come from signup or from
//! the fixed `ADMIN_*` / `CUSTOMER_*` environment entries, which are written
//! into the same table at startup so that every login follows one path.

mod error;

pub use error::AuthError;

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use tracing::instrument;

use petal_core::{Email, Role, UserId};

use crate::config::{AccountPassword, FixedAccount};
use crate::db::{CatalogStore, RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

const NAME_CHARS: RangeInclusive<usize> = 2..=80;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a CatalogStore) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName`, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for bad input, and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&name, &email, Role::Customer, password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Customer signed up");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await else {
            // Spend the same hashing work as a real check.
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await
            .ok_or(AuthError::UserNotFound)
    }

    /// Write an environment-configured account into the user table.
    ///
    /// An account whose email is already present is left as it is.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPasswordHash` for a malformed
    /// `*_PASSWORD_HASH`, or `AuthError::PasswordHash` if hashing fails.
    pub async fn ensure_account(&self, account: &FixedAccount) -> Result<User, AuthError> {
        if let Some(existing) = self.users.get_by_email(&account.email).await {
            return Ok(existing);
        }

        let password_hash = match &account.password {
            AccountPassword::Hash(hash) => {
                PasswordHash::new(hash)
                    .map_err(|_| AuthError::InvalidPasswordHash(account.email.to_string()))?;
                hash.clone()
            }
            AccountPassword::Plain(secret) => hash_password(secret.expose_secret())?,
        };

        let user = self
            .users
            .create(&account.name, &account.email, account.role, password_hash)
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Fixed account ready");
        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if !NAME_CHARS.contains(&name.chars().count()) {
        return Err(AuthError::InvalidName(format!(
            "name must be {}-{} characters",
            NAME_CHARS.start(),
            NAME_CHARS.end()
        )));
    }
    Ok(name.to_string())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Run a verification against a throwaway hash.
fn burn_verification(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    if let Some(hash) = DUMMY_HASH.get_or_init(|| hash_password("petal-dummy-password").ok()) {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_password("correct horse", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = CatalogStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .signup("Daisy", "Daisy@Petal.shop", "meadow-1234")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Customer);

        let logged_in = auth.login("daisy@petal.shop", "meadow-1234").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_errors_are_indistinguishable() {
        let store = CatalogStore::new();
        let auth = AuthService::new(&store);
        auth.signup("Daisy", "daisy@petal.shop", "meadow-1234")
            .await
            .unwrap();

        let wrong_password = auth.login("daisy@petal.shop", "meadow-9999").await;
        let unknown_email = auth.login("nobody@petal.shop", "meadow-1234").await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let store = CatalogStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.signup("D", "d@petal.shop", "meadow-1234").await,
            Err(AuthError::InvalidName(_))
        ));
        assert!(matches!(
            auth.signup("Daisy", "daisy", "meadow-1234").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.signup("Daisy", "daisy@petal.shop", "short").await,
            Err(AuthError::WeakPassword(_))
        ));

        auth.signup("Daisy", "daisy@petal.shop", "meadow-1234")
            .await
            .unwrap();
        assert!(matches!(
            auth.signup("Daisy Two", "daisy@petal.shop", "meadow-5678").await,
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_ensure_account_from_plain_and_hash() {
        let store = CatalogStore::new();
        let auth = AuthService::new(&store);

        let admin = FixedAccount {
            name: "Owner".to_string(),
            email: Email::parse("owner@petal.shop").unwrap(),
            role: Role::Admin,
            password: AccountPassword::Plain(SecretString::from("garden-gate-42")),
        };
        let first = auth.ensure_account(&admin).await.unwrap();
        let again = auth.ensure_account(&admin).await.unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(first.role, Role::Admin);
        assert!(auth.login("owner@petal.shop", "garden-gate-42").await.is_ok());

        let customer = FixedAccount {
            name: "Demo".to_string(),
            email: Email::parse("demo@petal.shop").unwrap(),
            role: Role::Customer,
            password: AccountPassword::Hash(hash_password("tulip-time-7").unwrap()),
        };
        auth.ensure_account(&customer).await.unwrap();
        assert!(auth.login("demo@petal.shop", "tulip-time-7").await.is_ok());

        let broken = FixedAccount {
            email: Email::parse("broken@petal.shop").unwrap(),
            password: AccountPassword::Hash("plaintext".to_string()),
            ..customer
        };
        assert!(matches!(
            auth.ensure_account(&broken).await,
            Err(AuthError::InvalidPasswordHash(_))
        ));
    }
}
