//! `seed-catalog`: print the built-in catalog.
//!
//! Each entry has the shape `POST /flowers` accepts, so the output can be
//! edited and replayed against a running server.

use std::io::{self, Write};

use petal_storefront::db::seed::default_catalog;

/// Print the default catalog as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn print() -> Result<(), Box<dyn std::error::Error>> {
    let json = render()?;
    writeln!(io::stdout().lock(), "{json}")?;
    Ok(())
}

fn render() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&default_catalog())
}
