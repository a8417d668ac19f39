//! Subcommand implementations.

pub mod catalog;
pub mod password;
pub mod secret;
