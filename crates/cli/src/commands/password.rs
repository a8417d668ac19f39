//! `hash-password`: produce a PHC string for `*_PASSWORD_HASH`.

use std::io::{self, BufRead, Write};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use petal_storefront::services::auth::{AuthError, hash_password};

/// Same floor the signup endpoint applies.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from `hash-password`.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("failed to read password: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Hash(#[from] AuthError),
}

/// Hash `password`, or the first line of stdin, and print the hash.
///
/// # Errors
///
/// Returns an error if the password is too short or stdin cannot be read.
pub fn hash(password: Option<String>) -> Result<(), PasswordError> {
    let password = match password {
        Some(p) => SecretString::from(p),
        None => read_stdin_line()?,
    };

    let hash = hash_checked(&password)?;
    writeln!(io::stdout().lock(), "{hash}")?;
    tracing::info!("Set ADMIN_PASSWORD_HASH or CUSTOMER_PASSWORD_HASH to the printed value");
    Ok(())
}

fn hash_checked(password: &SecretString) -> Result<String, PasswordError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    Ok(hash_password(password.expose_secret())?)
}

fn read_stdin_line() -> Result<SecretString, io::Error> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}
