//! `gen-secret`: random value for `STOREFRONT_SESSION_SECRET`.

use std::io::{self, Write};

use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;

/// Default secret length.
pub const DEFAULT_LENGTH: usize = 64;

/// Shortest secret the storefront accepts.
pub const MIN_LENGTH: usize = 32;

/// Errors from `gen-secret`.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("length must be at least {MIN_LENGTH}")]
    TooShort,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Print a random alphanumeric secret of `length` characters.
///
/// # Errors
///
/// Returns `SecretError::TooShort` below [`MIN_LENGTH`].
pub fn generate(length: usize) -> Result<(), SecretError> {
    let secret = random_secret(length)?;
    writeln!(io::stdout().lock(), "{secret}")?;
    Ok(())
}

fn random_secret(length: usize) -> Result<String, SecretError> {
    if length < MIN_LENGTH {
        return Err(SecretError::TooShort);
    }
    Ok(rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect())
}
